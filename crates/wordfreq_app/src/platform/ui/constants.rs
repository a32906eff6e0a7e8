pub const CHART_TITLE: &str = "Word Frequency";
pub const BAR_WIDTH: usize = 40;
pub const PROMPT: &str = "> ";
pub const EMPTY_WORD_LABEL: &str = "(empty)";
