//! Delimiter and quote sniffing for reference CSV files.

use thiserror::Error;

/// Number of leading characters inspected when sniffing a dialect.
pub const SNIFF_SAMPLE_CHARS: usize = 2048;

/// Delimiters tried, in preference order for ties.
const DELIMITER_CANDIDATES: [char; 5] = [',', ';', '\t', '|', ':'];

const QUOTE_CANDIDATES: [char; 2] = ['"', '\''];

/// Delimiter and quoting convention of a CSV resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
    pub delimiter: u8,
    pub quote: u8,
    /// Whether a doubled quote inside a quoted field is a literal quote.
    pub double_quote: bool,
}

impl Default for Dialect {
    /// Comma-separated with `"` quoting.
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            double_quote: true,
        }
    }
}

impl Dialect {
    /// Returns a CSV reader builder configured for this dialect.
    pub fn reader_builder(&self) -> csv::ReaderBuilder {
        let mut builder = csv::ReaderBuilder::new();
        builder
            .delimiter(self.delimiter)
            .quote(self.quote)
            .double_quote(self.double_quote)
            .has_headers(true)
            .flexible(true);
        builder
    }
}

/// Why a dialect could not be inferred from a sample.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SniffError {
    #[error("sample contains no complete lines")]
    EmptySample,

    #[error("no delimiter appears consistently across {lines} sample lines")]
    NoConsistentDelimiter { lines: usize },
}

/// Returns the leading sample of `text` and whether it was cut short.
pub(crate) fn leading_sample(text: &str) -> (&str, bool) {
    match text.char_indices().nth(SNIFF_SAMPLE_CHARS) {
        Some((end, _)) => (&text[..end], true),
        None => (text, false),
    }
}

/// Infers the dialect of a CSV sample.
///
/// A delimiter qualifies when it occurs the same, non-zero number of times
/// outside quotes on every complete line. The most frequent qualifying
/// delimiter wins. When `truncated` is set the final line is treated as
/// partial and ignored.
pub fn sniff_dialect(sample: &str, truncated: bool) -> Result<Dialect, SniffError> {
    let mut lines: Vec<&str> = sample
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();
    if truncated && lines.len() > 1 {
        lines.pop();
    }
    lines.retain(|line| !line.trim().is_empty());
    if lines.is_empty() {
        return Err(SniffError::EmptySample);
    }

    let quote = detect_quote(&lines);

    let mut best: Option<(char, usize)> = None;
    for candidate in DELIMITER_CANDIDATES {
        let Some(per_line) = consistent_count(&lines, candidate, quote) else {
            continue;
        };
        if best.is_none_or(|(_, count)| per_line > count) {
            best = Some((candidate, per_line));
        }
    }

    let (delimiter, _) = best.ok_or(SniffError::NoConsistentDelimiter { lines: lines.len() })?;
    Ok(Dialect {
        delimiter: delimiter as u8,
        quote: quote as u8,
        double_quote: true,
    })
}

/// Picks `'` only when it brackets fields more often than `"`.
fn detect_quote(lines: &[&str]) -> char {
    let score = |quote: char| -> usize { lines.iter().map(|line| boundary_quotes(line, quote)).sum() };
    let double = score(QUOTE_CANDIDATES[0]);
    let single = score(QUOTE_CANDIDATES[1]);
    if single > double {
        QUOTE_CANDIDATES[1]
    } else {
        QUOTE_CANDIDATES[0]
    }
}

/// Counts quote characters sitting at a field boundary: line start or end,
/// or next to a candidate delimiter (ignoring spaces).
fn boundary_quotes(line: &str, quote: char) -> usize {
    let chars: Vec<char> = line.chars().collect();
    let is_boundary = |c: Option<&char>| c.is_none_or(|c| DELIMITER_CANDIDATES.contains(c));
    let mut count = 0;
    for (idx, c) in chars.iter().enumerate() {
        if *c != quote {
            continue;
        }
        let before = chars[..idx].iter().rev().find(|c| **c != ' ');
        let after = chars[idx + 1..].iter().find(|c| **c != ' ');
        if is_boundary(before) || is_boundary(after) {
            count += 1;
        }
    }
    count
}

/// Returns the per-line count of `delimiter` when it is identical and
/// non-zero across all lines.
fn consistent_count(lines: &[&str], delimiter: char, quote: char) -> Option<usize> {
    let mut expected = None;
    for line in lines {
        let count = count_unquoted(line, delimiter, quote);
        if count == 0 {
            return None;
        }
        match expected {
            None => expected = Some(count),
            Some(previous) if previous != count => return None,
            Some(_) => {}
        }
    }
    expected
}

fn count_unquoted(line: &str, delimiter: char, quote: char) -> usize {
    let mut in_quotes = false;
    let mut count = 0;
    for c in line.chars() {
        if c == quote {
            in_quotes = !in_quotes;
        } else if c == delimiter && !in_quotes {
            count += 1;
        }
    }
    count
}
