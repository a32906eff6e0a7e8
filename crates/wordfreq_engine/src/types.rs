use thiserror::Error;

use crate::pipeline::Analysis;

pub type RequestId = u64;

/// Steps a request passes through, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Queued,
    Downloading,
    Decoding,
    Analyzing,
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Progress {
        request_id: RequestId,
        stage: Stage,
        /// Body bytes received so far, once the download has started.
        bytes: Option<u64>,
    },
    AnalysisCompleted {
        request_id: RequestId,
        result: Result<Analysis, FetchError>,
    },
}

/// Raw response body plus what is needed to decode it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedDocument {
    pub body: Vec<u8>,
    /// Where the body was served from once redirects were followed.
    pub final_url: String,
    pub content_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FailureKind {
    #[error("invalid url")]
    InvalidUrl,
    #[error("http status {0}")]
    HttpStatus(u16),
    #[error("timed out")]
    Timeout,
    #[error("too many redirects")]
    RedirectLimitExceeded,
    #[error("document exceeds {max_bytes} bytes")]
    TooLarge { max_bytes: u64, actual: u64 },
    #[error("unsupported content type {content_type}")]
    UnsupportedContentType { content_type: String },
    #[error("response is not valid text")]
    Decode,
    #[error("network error")]
    Network,
    #[error("engine is not running")]
    EngineStopped,
}
