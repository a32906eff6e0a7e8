/// Characters that separate tokens. A run of them counts as one separator.
pub const DELIMITERS: [char; 6] = [' ', ',', '.', '"', '\'', '\n'];

/// What to do with the empty tokens produced by leading or trailing delimiter runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyTokens {
    /// Count them like any other word.
    #[default]
    Keep,
    /// Discard them before counting.
    Drop,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Tokenizer {
    empty_tokens: EmptyTokens,
}

impl Tokenizer {
    pub fn new(empty_tokens: EmptyTokens) -> Self {
        Self { empty_tokens }
    }

    /// Split `text` into tokens in order of appearance.
    ///
    /// Text starting (ending) with a delimiter yields a leading (trailing) empty
    /// token unless empty tokens are dropped. The empty string yields nothing.
    pub fn tokenize<'a>(&self, text: &'a str) -> Vec<&'a str> {
        if text.is_empty() {
            return Vec::new();
        }

        let pieces: Vec<&str> = text.split(is_delimiter).collect();
        let last = pieces.len() - 1;
        pieces
            .into_iter()
            .enumerate()
            // Interior empties come from consecutive delimiters of one run.
            .filter(|(idx, piece)| !piece.is_empty() || *idx == 0 || *idx == last)
            .map(|(_, piece)| piece)
            .filter(|piece| self.empty_tokens == EmptyTokens::Keep || !piece.is_empty())
            .collect()
    }
}

pub fn is_delimiter(c: char) -> bool {
    DELIMITERS.contains(&c)
}
