//! Line grammar: classify decoded text line by line and build a catalog.
//!
//! Checks run in this order on each trimmed line:
//!
//! 1. empty → [`Line::Blank`]
//! 2. starts with `;` → [`Line::Comment`]
//! 3. starts with `[` and contains `]` → [`Line::Section`]
//! 4. split at the first `=` → [`Line::KeyValue`]
//!
//! A value that opens with `"` runs to the first later `"` followed only by
//! whitespace or a `;` comment, so inner quotes and semicolons are kept.
//! Other values end at the first unescaped `;`. Quotes in a key are tracked
//! only when the key itself starts with `"`.
//!
//! Anything else is [`Line::Malformed`] and is skipped without aborting.
use crate::catalog::{Item, Section, SectionCatalog};
use crate::error::{IniError, SkipReason};

/// Classification of one line of INI text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    /// Empty or whitespace-only.
    Blank,
    /// Comment-only line; holds the text after `;`.
    Comment(&'a str),
    /// Section header; holds the trimmed name between the brackets.
    Section(&'a str),
    /// A `key=value` entry.
    KeyValue {
        /// Trimmed key.
        key: &'a str,
        /// Trimmed raw value, quotes preserved.
        value: &'a str,
        /// Text after an unquoted, unescaped `;`.
        comment: Option<&'a str>,
    },
    /// A line that fits no rule.
    Malformed(SkipReason),
}

/// Classify a single line.
///
/// # Examples
///
/// ```
/// use inimap::parser::{classify, Line};
///
/// assert_eq!(classify("  [Paths] "), Line::Section("Paths"));
/// assert_eq!(
///     classify("Greeting = \"hi; there\" ; shown"),
///     Line::KeyValue { key: "Greeting", value: "\"hi; there\"", comment: Some(" shown") },
/// );
/// ```
#[must_use]
pub fn classify(line: &str) -> Line<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Line::Blank;
    }
    if let Some(text) = trimmed.strip_prefix(';') {
        return Line::Comment(text);
    }
    if let Some(rest) = trimmed.strip_prefix('[')
        && let Some((name, _)) = rest.split_once(']')
    {
        return Line::Section(name.trim());
    }
    split_key_value(trimmed)
}

fn split_key_value(line: &str) -> Line<'_> {
    let Some(at) = separator_index(line) else {
        let reason = if line.starts_with('"') {
            SkipReason::UnterminatedQuote
        } else {
            SkipReason::MissingSeparator
        };
        return Line::Malformed(reason);
    };

    let (key, rest) = line.split_at(at);
    let key = key.trim();
    if key.is_empty() {
        return Line::Malformed(SkipReason::EmptyKey);
    }
    let rest = rest.strip_prefix('=').unwrap_or(rest).trim_start();

    let (value, comment) = if rest.starts_with('"') {
        match closing_quote(rest) {
            Some(end) => {
                let (value, tail) = rest.split_at(end);
                (value, tail.trim_start().strip_prefix(';'))
            }
            None if rest.matches('"').count() > 1 => split_comment(rest),
            None => return Line::Malformed(SkipReason::UnterminatedQuote),
        }
    } else {
        split_comment(rest)
    };

    Line::KeyValue {
        key,
        value: value.trim(),
        comment,
    }
}

/// Index of the `=` ending the key. Quotes are tracked only for a key that
/// starts with `"`.
fn separator_index(line: &str) -> Option<usize> {
    if !line.starts_with('"') {
        return line.find('=');
    }
    let mut in_quotes = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            '=' if !in_quotes => return Some(i),
            _ => {}
        }
    }
    None
}

/// End (exclusive) of a value that opens with `"`: the first later quote
/// followed only by whitespace or a `;` comment.
fn closing_quote(value: &str) -> Option<usize> {
    value
        .char_indices()
        .skip(1)
        .filter(|&(_, c)| c == '"')
        .map(|(i, _)| i + 1)
        .find(|&end| {
            let (_, tail) = value.split_at(end);
            let tail = tail.trim_start();
            tail.is_empty() || tail.starts_with(';')
        })
}

/// Split an unquoted value at the first `;` not preceded by `\`.
fn split_comment(value: &str) -> (&str, Option<&str>) {
    let mut previous = None;
    for (i, c) in value.char_indices() {
        if c == ';' && previous != Some('\\') {
            let (value, comment) = value.split_at(i);
            return (value, comment.strip_prefix(';'));
        }
        previous = Some(c);
    }
    (value, None)
}

/// A line the parser rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-based line number.
    pub line: usize,
    /// Why the line was rejected.
    pub reason: SkipReason,
}

impl From<SkippedLine> for IniError {
    fn from(skipped: SkippedLine) -> Self {
        Self::ParseSkippedLine {
            line: skipped.line,
            reason: skipped.reason,
        }
    }
}

/// Result of parsing a whole text buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOutcome {
    /// The populated catalog.
    pub catalog: SectionCatalog,
    /// Rejected lines, in file order.
    pub skipped: Vec<SkippedLine>,
}

/// Parse decoded text into a fresh catalog.
///
/// Malformed lines are skipped and reported; parsing itself never fails.
#[must_use]
pub fn parse(text: &str) -> ParseOutcome {
    let mut catalog = SectionCatalog::new();
    let mut skipped = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        match classify(raw) {
            Line::Blank | Line::Comment(_) => {}
            Line::Section(name) => catalog.add_section(Section::new(name)),
            Line::KeyValue {
                key,
                value,
                comment,
            } => {
                let mut item = Item::new(key, value);
                item.comment = comment.map(str::to_string);
                catalog.last_section_mut().items_mut().add(item);
            }
            Line::Malformed(reason) => {
                let line = index + 1;
                tracing::debug!("skipping line {line}: {reason}");
                skipped.push(SkippedLine { line, reason });
            }
        }
    }

    ParseOutcome { catalog, skipped }
}
