//! Quote transforms applied to item values at read and write time.
//!
//! Stored values always keep their quotes; these helpers are the only place
//! quotes are added or removed.

/// The quote character recognised around values.
pub const QUOTE: char = '"';

/// Return `true` if `value` is wrapped in a pair of double quotes.
#[must_use]
pub fn is_quoted(value: &str) -> bool {
    value.len() >= 2 && value.starts_with(QUOTE) && value.ends_with(QUOTE)
}

/// Strip one pair of surrounding double quotes, if present.
///
/// # Examples
///
/// ```
/// use inimap::quote::unquote;
///
/// assert_eq!(unquote("\"hello world\""), "hello world");
/// assert_eq!(unquote("plain"), "plain");
/// assert_eq!(unquote("\""), "\"");
/// ```
#[must_use]
pub fn unquote(value: &str) -> &str {
    if !is_quoted(value) {
        return value;
    }
    value
        .strip_prefix(QUOTE)
        .and_then(|inner| inner.strip_suffix(QUOTE))
        .unwrap_or(value)
}

/// Wrap `value` in double quotes.
#[must_use]
pub fn to_quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push(QUOTE);
    out.push_str(value);
    out.push(QUOTE);
    out
}

/// Wrap `value` in double quotes unless it already is.
#[must_use]
pub fn ensure_quoted(value: &str) -> String {
    if is_quoted(value) {
        value.to_string()
    } else {
        to_quoted(value)
    }
}
