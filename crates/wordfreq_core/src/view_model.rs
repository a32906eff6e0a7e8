use crate::{ExportNotice, HistogramRow, Screen};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub screen: Screen,
    pub source_url: String,
    /// The fetch trigger is disabled while this is set.
    pub fetch_in_flight: bool,
    pub rows: Vec<HistogramRow>,
    pub total_tokens: u64,
    pub distinct_tokens: usize,
    pub last_error: Option<String>,
    pub export_notice: Option<ExportNotice>,
    pub dirty: bool,
}

impl AppViewModel {
    pub fn can_fetch(&self) -> bool {
        self.screen == Screen::Idle && !self.fetch_in_flight
    }

    pub fn max_frequency(&self) -> u64 {
        self.rows.iter().map(|row| row.frequency).max().unwrap_or(0)
    }
}
