use engine_logging::engine_debug;

use crate::count::FrequencyTable;
use crate::rank::{rank, HistogramResult, DEFAULT_LIMIT};
use crate::tokenize::{EmptyTokens, Tokenizer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSettings {
    pub limit: usize,
    pub empty_tokens: EmptyTokens,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            empty_tokens: EmptyTokens::Keep,
        }
    }
}

/// Histogram plus document totals taken before truncation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Analysis {
    pub histogram: HistogramResult,
    pub total_tokens: u64,
    pub distinct_tokens: usize,
}

/// Tokenize, count and rank `text`.
pub fn analyze(text: &str, settings: &PipelineSettings) -> Analysis {
    let tokens = Tokenizer::new(settings.empty_tokens).tokenize(text);
    let table = FrequencyTable::from_tokens(tokens);
    let total_tokens = table.total();
    let distinct_tokens = table.distinct();
    let histogram = rank(table, settings.limit);
    engine_debug!(
        "Analyzed {} bytes: {} tokens, {} distinct, {} ranked",
        text.len(),
        total_tokens,
        distinct_tokens,
        histogram.len()
    );
    Analysis {
        histogram,
        total_tokens,
        distinct_tokens,
    }
}
