use serde::{Deserialize, Serialize};

use crate::count::FrequencyTable;

/// Number of words kept by default.
pub const DEFAULT_LIMIT: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub word: String,
    pub frequency: u64,
}

impl RankedEntry {
    pub fn new(word: impl Into<String>, frequency: u64) -> Self {
        Self {
            word: word.into(),
            frequency,
        }
    }
}

/// Top entries, highest frequency first.
pub type HistogramResult = Vec<RankedEntry>;

/// Sort by descending frequency and keep the first `limit` entries.
///
/// Ties keep first-seen order: the table yields entries in that order and the
/// sort is stable.
pub fn rank(table: FrequencyTable, limit: usize) -> HistogramResult {
    let mut entries = table.into_entries();
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    entries.truncate(limit);
    entries
        .into_iter()
        .map(|(word, frequency)| RankedEntry { word, frequency })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ties_keep_first_seen_order() {
        let table = FrequencyTable::from_tokens(["x", "y", "z", "y", "w"]);
        let ranked = rank(table, DEFAULT_LIMIT);
        let words: Vec<_> = ranked.iter().map(|e| e.word.as_str()).collect();
        assert_eq!(words, vec!["y", "x", "z", "w"]);
    }

    #[test]
    fn truncates_to_limit() {
        let table = FrequencyTable::from_tokens(["a", "b", "c", "a"]);
        let ranked = rank(table, 2);
        assert_eq!(ranked, vec![RankedEntry::new("a", 2), RankedEntry::new("b", 1)]);
    }

    #[test]
    fn zero_limit_and_empty_table_are_empty() {
        assert!(rank(FrequencyTable::from_tokens(["a"]), 0).is_empty());
        assert!(rank(FrequencyTable::new(), DEFAULT_LIMIT).is_empty());
    }
}
