use crate::{HistogramRow, RequestId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the source URL (only honoured while idle).
    SourceUrlChanged(String),
    /// User asked for the document to be fetched.
    FetchClicked,
    /// Engine finished analyzing a fetched document.
    FetchSucceeded {
        request_id: RequestId,
        rows: Vec<HistogramRow>,
        total_tokens: u64,
        distinct_tokens: usize,
    },
    /// Engine could not fetch or decode the document.
    FetchFailed {
        request_id: RequestId,
        message: String,
    },
    /// User clicked Export.
    ExportClicked,
    /// Export effect finished; `Ok` carries the written path.
    ExportFinished(Result<String, String>),
    /// User clicked Back.
    BackClicked,
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
