//! Comma-separated `word,frequency` lines.
//!
//! Words are written verbatim unless they contain a comma, a double quote or a
//! line break; those are wrapped in double quotes with inner quotes doubled.

use thiserror::Error;

use crate::rank::{HistogramResult, RankedEntry};

pub const FIELD_SEPARATOR: char = ',';
pub const LINE_SEPARATOR: char = '\n';

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("line {line}: missing field separator")]
    MissingSeparator { line: usize },
    #[error("line {line}: unterminated quoted word")]
    UnterminatedQuote { line: usize },
    #[error("line {line}: invalid frequency {value:?}")]
    InvalidFrequency { line: usize, value: String },
}

/// One line per entry, joined by `\n`, no header and no trailing newline.
pub fn to_delimited_text(result: &[RankedEntry]) -> String {
    let mut out = String::new();
    for (idx, entry) in result.iter().enumerate() {
        if idx > 0 {
            out.push(LINE_SEPARATOR);
        }
        push_word(&mut out, &entry.word);
        out.push(FIELD_SEPARATOR);
        out.push_str(&entry.frequency.to_string());
    }
    out
}

fn push_word(out: &mut String, word: &str) {
    if !needs_quoting(word) {
        out.push_str(word);
        return;
    }
    out.push('"');
    for c in word.chars() {
        if c == '"' {
            out.push('"');
        }
        out.push(c);
    }
    out.push('"');
}

fn needs_quoting(word: &str) -> bool {
    word.contains([FIELD_SEPARATOR, '"', '\r', LINE_SEPARATOR])
}

/// Read back text produced by [`to_delimited_text`].
pub fn parse_delimited_text(text: &str) -> Result<HistogramResult, ParseError> {
    let mut entries = Vec::new();
    let mut rest = text;
    let mut line = 1;
    while !rest.is_empty() {
        let (word, after_word) = read_word(rest, line)?;
        line += newlines(&rest[..rest.len() - after_word.len()]);
        let (value, after_value) = match after_word.find(LINE_SEPARATOR) {
            Some(pos) => (&after_word[..pos], &after_word[pos + 1..]),
            None => (after_word, ""),
        };
        let frequency = value
            .parse::<u64>()
            .map_err(|_| ParseError::InvalidFrequency {
                line,
                value: value.to_string(),
            })?;
        entries.push(RankedEntry { word, frequency });
        line += 1;
        rest = after_value;
    }
    Ok(entries)
}

fn newlines(text: &str) -> usize {
    text.matches(LINE_SEPARATOR).count()
}

/// Returns the word and the text following its field separator.
///
/// `line` is the physical line the record starts on.
fn read_word(input: &str, line: usize) -> Result<(String, &str), ParseError> {
    if let Some(quoted) = input.strip_prefix('"') {
        let mut word = String::new();
        let mut chars = quoted.char_indices().peekable();
        while let Some((pos, c)) = chars.next() {
            if c != '"' {
                word.push(c);
                continue;
            }
            if let Some((_, '"')) = chars.peek() {
                chars.next();
                word.push('"');
                continue;
            }
            let after = &quoted[pos + 1..];
            return after
                .strip_prefix(FIELD_SEPARATOR)
                .map(|rest| (word, rest))
                .ok_or(ParseError::MissingSeparator {
                    line: line + newlines(&quoted[..pos]),
                });
        }
        return Err(ParseError::UnterminatedQuote { line });
    }

    let line_end = input.find(LINE_SEPARATOR).unwrap_or(input.len());
    // Frequencies never contain a comma, so the last one on the line splits.
    match input[..line_end].rfind(FIELD_SEPARATOR) {
        Some(pos) => Ok((input[..pos].to_string(), &input[pos + 1..])),
        None => Err(ParseError::MissingSeparator { line }),
    }
}
