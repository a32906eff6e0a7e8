use std::sync::{mpsc, Arc, Mutex};
use std::thread;

use engine_logging::{engine_debug, engine_info, engine_warn};

use crate::decode::decode_text;
use crate::fetch::{FetchSettings, Fetcher, ProgressSink, ReqwestFetcher};
use crate::pipeline::{analyze, Analysis, PipelineSettings};
use crate::{EngineEvent, FailureKind, FetchError, RequestId, Stage};

#[derive(Debug, Clone, Default)]
pub struct EngineSettings {
    pub fetch: FetchSettings,
    pub pipeline: PipelineSettings,
}

struct FetchRequest {
    request_id: RequestId,
    url: String,
}

/// Runs fetch-and-analyze requests on a background thread.
///
/// Each request produces `Progress` events followed by exactly one
/// `AnalysisCompleted` carrying the same request id.
#[derive(Clone)]
pub struct EngineHandle {
    request_tx: mpsc::Sender<FetchRequest>,
    event_rx: Arc<Mutex<mpsc::Receiver<EngineEvent>>>,
}

impl EngineHandle {
    pub fn new(settings: EngineSettings) -> Result<Self, FetchError> {
        let fetcher = ReqwestFetcher::new(settings.fetch)?;
        Self::with_fetcher(Arc::new(fetcher), settings.pipeline)
    }

    pub fn with_fetcher(
        fetcher: Arc<dyn Fetcher>,
        pipeline: PipelineSettings,
    ) -> Result<Self, FetchError> {
        let runtime = tokio::runtime::Runtime::new().map_err(|err| {
            FetchError::new(
                FailureKind::EngineStopped,
                format!("cannot start runtime: {err}"),
            )
        })?;
        let (request_tx, request_rx) = mpsc::channel::<FetchRequest>();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            while let Ok(request) = request_rx.recv() {
                let fetcher = Arc::clone(&fetcher);
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    let result = run_request(fetcher.as_ref(), &pipeline, &request, &event_tx).await;
                    let _ = event_tx.send(EngineEvent::AnalysisCompleted {
                        request_id: request.request_id,
                        result,
                    });
                });
            }
            engine_debug!("Engine thread exiting");
        });

        Ok(Self {
            request_tx,
            event_rx: Arc::new(Mutex::new(event_rx)),
        })
    }

    /// Queues one fetch. Fails when the engine thread is no longer running.
    pub fn fetch(&self, request_id: RequestId, url: impl Into<String>) -> Result<(), FetchError> {
        self.request_tx
            .send(FetchRequest {
                request_id,
                url: url.into(),
            })
            .map_err(|_| {
                FetchError::new(
                    FailureKind::EngineStopped,
                    format!("request {request_id} was not queued"),
                )
            })
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.try_recv().ok()
    }

    /// Blocks until the next event or until the engine thread is gone.
    pub fn recv(&self) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.recv().ok()
    }
}

async fn run_request(
    fetcher: &dyn Fetcher,
    pipeline: &PipelineSettings,
    request: &FetchRequest,
    sink: &dyn ProgressSink,
) -> Result<Analysis, FetchError> {
    let FetchRequest { request_id, url } = request;
    let request_id = *request_id;
    engine_info!("Fetching request_id={} url={}", request_id, url);
    sink.emit(progress(request_id, Stage::Queued, None));

    let result = fetch_and_analyze(fetcher, request_id, url, pipeline, sink).await;
    match &result {
        Ok(analysis) => engine_info!(
            "Request {} done: {} tokens, {} distinct",
            request_id,
            analysis.total_tokens,
            analysis.distinct_tokens
        ),
        Err(err) => engine_warn!("Request {} failed: {}", request_id, err),
    }
    result
}

async fn fetch_and_analyze(
    fetcher: &dyn Fetcher,
    request_id: RequestId,
    url: &str,
    pipeline: &PipelineSettings,
    sink: &dyn ProgressSink,
) -> Result<Analysis, FetchError> {
    let document = fetcher.fetch(request_id, url, sink).await?;
    if document.final_url != url {
        engine_info!("Request {} served from {}", request_id, document.final_url);
    }
    let bytes = Some(document.body.len() as u64);

    sink.emit(progress(request_id, Stage::Decoding, bytes));
    let decoded = decode_text(&document.body, document.content_type.as_deref())
        .map_err(|err| FetchError::new(FailureKind::Decode, err.to_string()))?;
    engine_debug!("Request {} decoded as {}", request_id, decoded.encoding_label);

    sink.emit(progress(request_id, Stage::Analyzing, bytes));
    let analysis = analyze(&decoded.text, pipeline);

    sink.emit(progress(request_id, Stage::Done, bytes));
    Ok(analysis)
}

fn progress(request_id: RequestId, stage: Stage, bytes: Option<u64>) -> EngineEvent {
    EngineEvent::Progress {
        request_id,
        stage,
        bytes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FetchedDocument;

    struct StaticFetcher {
        body: Result<&'static [u8], FailureKind>,
    }

    #[async_trait::async_trait]
    impl Fetcher for StaticFetcher {
        async fn fetch(
            &self,
            _request_id: RequestId,
            url: &str,
            _sink: &dyn ProgressSink,
        ) -> Result<FetchedDocument, FetchError> {
            let body = self
                .body
                .clone()
                .map_err(|kind| FetchError::new(kind, "static failure"))?;
            Ok(FetchedDocument {
                body: body.to_vec(),
                final_url: url.to_string(),
                content_type: Some("text/plain; charset=utf-8".to_string()),
            })
        }
    }

    fn engine(body: Result<&'static [u8], FailureKind>) -> EngineHandle {
        EngineHandle::with_fetcher(Arc::new(StaticFetcher { body }), PipelineSettings::default())
            .expect("engine starts")
    }

    fn completion(handle: &EngineHandle) -> (RequestId, Result<Analysis, FetchError>) {
        while let Some(event) = handle.recv() {
            if let EngineEvent::AnalysisCompleted { request_id, result } = event {
                return (request_id, result);
            }
        }
        panic!("engine stopped without completing");
    }

    #[test]
    fn engine_reports_analysis() {
        let handle = engine(Ok(&b"b a b"[..]));
        handle.fetch(4, "https://example.com/doc.txt").unwrap();

        let (request_id, result) = completion(&handle);
        assert_eq!(request_id, 4);
        let analysis = result.unwrap();
        assert_eq!(analysis.total_tokens, 3);
        assert_eq!(analysis.histogram[0].word, "b");
    }

    #[test]
    fn engine_reports_decode_failure() {
        let handle = engine(Ok(&b"ok \xff\xfe\xfd"[..]));
        handle.fetch(1, "https://example.com/doc.txt").unwrap();

        let (_, result) = completion(&handle);
        assert_eq!(result.unwrap_err().kind, FailureKind::Decode);
    }

    #[test]
    fn engine_reports_fetch_failure() {
        let handle = engine(Err(FailureKind::Network));
        handle.fetch(2, "https://example.com/doc.txt").unwrap();

        let (request_id, result) = completion(&handle);
        assert_eq!(request_id, 2);
        assert_eq!(result.unwrap_err().kind, FailureKind::Network);
    }

    #[test]
    fn engine_emits_stages_in_order() {
        let handle = engine(Ok(&b"a"[..]));
        handle.fetch(3, "https://example.com/doc.txt").unwrap();

        let mut stages = Vec::new();
        while let Some(event) = handle.recv() {
            match event {
                EngineEvent::Progress { stage, .. } => stages.push(stage),
                EngineEvent::AnalysisCompleted { .. } => break,
            }
        }
        assert_eq!(
            stages,
            vec![Stage::Queued, Stage::Decoding, Stage::Analyzing, Stage::Done]
        );
    }

    #[test]
    fn fetch_fails_once_the_engine_thread_is_gone() {
        let (request_tx, request_rx) = mpsc::channel();
        drop(request_rx);
        let (_event_tx, event_rx) = mpsc::channel();
        let handle = EngineHandle {
            request_tx,
            event_rx: Arc::new(Mutex::new(event_rx)),
        };

        let err = handle.fetch(5, "https://example.com/doc.txt").unwrap_err();
        assert_eq!(err.kind, FailureKind::EngineStopped);
    }
}
