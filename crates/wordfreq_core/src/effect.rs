use crate::{HistogramRow, RequestId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Fetch and analyze the document at `url`.
    FetchDocument { request_id: RequestId, url: String },
    /// Write the displayed histogram to the CSV export.
    ExportCsv {
        rows: Vec<HistogramRow>,
        total_tokens: u64,
        distinct_tokens: usize,
        source_url: String,
    },
}
