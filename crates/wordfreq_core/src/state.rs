use crate::view_model::AppViewModel;

pub type RequestId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    /// No histogram yet; the fetch trigger is shown.
    #[default]
    Idle,
    /// Chart, table, export and back actions are shown.
    Displaying,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistogramRow {
    pub word: String,
    pub frequency: u64,
}

impl HistogramRow {
    pub fn new(word: impl Into<String>, frequency: u64) -> Self {
        Self {
            word: word.into(),
            frequency,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportNotice {
    Saved { path: String },
    Failed { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    screen: Screen,
    source_url: String,
    in_flight: Option<RequestId>,
    last_request_id: RequestId,
    rows: Vec<HistogramRow>,
    total_tokens: u64,
    distinct_tokens: usize,
    last_error: Option<String>,
    export_notice: Option<ExportNotice>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source_url(url: impl Into<String>) -> Self {
        Self {
            source_url: url.into(),
            ..Self::default()
        }
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            screen: self.screen,
            source_url: self.source_url.clone(),
            fetch_in_flight: self.in_flight.is_some(),
            rows: self.rows.clone(),
            total_tokens: self.total_tokens,
            distinct_tokens: self.distinct_tokens,
            last_error: self.last_error.clone(),
            export_notice: self.export_notice.clone(),
            dirty: self.dirty,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    pub fn in_flight(&self) -> Option<RequestId> {
        self.in_flight
    }

    pub fn rows(&self) -> &[HistogramRow] {
        &self.rows
    }

    pub fn totals(&self) -> (u64, usize) {
        (self.total_tokens, self.distinct_tokens)
    }

    /// Returns whether a re-render is needed and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_source_url(&mut self, url: String) {
        self.source_url = url;
        self.mark_dirty();
    }

    pub(crate) fn begin_fetch(&mut self) -> RequestId {
        self.last_request_id += 1;
        self.in_flight = Some(self.last_request_id);
        self.last_error = None;
        self.mark_dirty();
        self.last_request_id
    }

    pub(crate) fn show_histogram(
        &mut self,
        rows: Vec<HistogramRow>,
        total_tokens: u64,
        distinct_tokens: usize,
    ) {
        self.in_flight = None;
        self.screen = Screen::Displaying;
        self.rows = rows;
        self.total_tokens = total_tokens;
        self.distinct_tokens = distinct_tokens;
        self.export_notice = None;
        self.mark_dirty();
    }

    pub(crate) fn fail_fetch(&mut self, message: String) {
        self.in_flight = None;
        self.last_error = Some(message);
        self.mark_dirty();
    }

    pub(crate) fn set_error(&mut self, message: String) {
        self.last_error = Some(message);
        self.mark_dirty();
    }

    pub(crate) fn set_export_notice(&mut self, notice: ExportNotice) {
        self.export_notice = Some(notice);
        self.mark_dirty();
    }

    pub(crate) fn reset(&mut self) {
        self.screen = Screen::Idle;
        self.rows.clear();
        self.total_tokens = 0;
        self.distinct_tokens = 0;
        self.export_notice = None;
        self.mark_dirty();
    }
}
