use std::sync::mpsc;
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::{header::CONTENT_TYPE, redirect, Client, Response, Url};

use crate::{EngineEvent, FailureKind, FetchError, FetchedDocument, RequestId, Stage};

/// Document fetched when nothing else is configured.
pub const DEFAULT_SOURCE_URL: &str = "https://www.terriblytinytales.com/test.txt";

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    /// Bounds the whole exchange, body included.
    pub request_timeout: Duration,
    /// Redirects followed before the fetch fails with `RedirectLimitExceeded`.
    pub redirect_limit: usize,
    pub max_bytes: u64,
    /// Media types accepted without parameters, e.g. `text/plain`.
    pub allowed_content_types: Vec<String>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            redirect_limit: 5,
            max_bytes: 5 * 1024 * 1024,
            allowed_content_types: vec!["text/plain".to_string()],
        }
    }
}

/// Receives progress events while a document downloads.
pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

impl ProgressSink for mpsc::Sender<EngineEvent> {
    fn emit(&self, event: EngineEvent) {
        // A closed receiver means nobody is listening for progress any more.
        let _ = self.send(event);
    }
}

#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(
        &self,
        request_id: RequestId,
        url: &str,
        sink: &dyn ProgressSink,
    ) -> Result<FetchedDocument, FetchError>;
}

/// HTTP GET with the limits from [`FetchSettings`] applied.
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: Client,
    settings: FetchSettings,
}

impl ReqwestFetcher {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let client = Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .redirect(redirect::Policy::limited(settings.redirect_limit))
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { client, settings })
    }

    fn check_response(&self, response: &Response) -> Result<(), FetchError> {
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }
        if let Some(declared) = response.content_length() {
            self.check_size(declared)?;
        }
        match content_type(response) {
            Some(value) if !self.accepts(&value) => Err(FetchError::new(
                FailureKind::UnsupportedContentType {
                    content_type: value,
                },
                "expected a plain text document",
            )),
            _ => Ok(()),
        }
    }

    fn accepts(&self, content_type: &str) -> bool {
        let media_type = content_type.split(';').next().unwrap_or_default().trim();
        self.settings
            .allowed_content_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(media_type))
    }

    fn check_size(&self, len: u64) -> Result<(), FetchError> {
        let max_bytes = self.settings.max_bytes;
        if len > max_bytes {
            return Err(FetchError::new(
                FailureKind::TooLarge {
                    max_bytes,
                    actual: len,
                },
                format!("got at least {len} bytes"),
            ));
        }
        Ok(())
    }

    /// Streams the body, enforcing the size cap even when no length was declared.
    async fn read_body(
        &self,
        request_id: RequestId,
        response: Response,
        sink: &dyn ProgressSink,
    ) -> Result<Vec<u8>, FetchError> {
        let downloaded = |len: usize| EngineEvent::Progress {
            request_id,
            stage: Stage::Downloading,
            bytes: Some(len as u64),
        };

        let mut body = Vec::new();
        sink.emit(downloaded(0));
        let mut chunks = response.bytes_stream();
        while let Some(chunk) = chunks.next().await {
            let chunk = chunk.map_err(classify)?;
            self.check_size((body.len() + chunk.len()) as u64)?;
            body.extend_from_slice(&chunk);
            sink.emit(downloaded(body.len()));
        }
        Ok(body)
    }
}

#[async_trait::async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch(
        &self,
        request_id: RequestId,
        url: &str,
        sink: &dyn ProgressSink,
    ) -> Result<FetchedDocument, FetchError> {
        let url =
            Url::parse(url).map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        let response = self.client.get(url).send().await.map_err(classify)?;
        self.check_response(&response)?;

        let final_url = response.url().to_string();
        let content_type = content_type(&response);
        let body = self.read_body(request_id, response, sink).await?;
        Ok(FetchedDocument {
            body,
            final_url,
            content_type,
        })
    }
}

fn content_type(response: &Response) -> Option<String> {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

fn classify(err: reqwest::Error) -> FetchError {
    let kind = if err.is_timeout() {
        FailureKind::Timeout
    } else if err.is_redirect() {
        FailureKind::RedirectLimitExceeded
    } else {
        FailureKind::Network
    };
    FetchError::new(kind, err.to_string())
}
