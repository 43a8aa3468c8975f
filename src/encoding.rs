//! Text encodings a document can be loaded from and saved to.
//!
//! Decoding is lossy: malformed sequences become U+FFFD (or `?` for ASCII)
//! rather than failing the load. A byte order mark, when present, wins
//! over the requested encoding.
use std::fmt;
use std::str::FromStr;

/// UTF-8 byte order mark.
const BOM_UTF8: &[u8] = &[0xEF, 0xBB, 0xBF];

/// UTF-16 little-endian byte order mark.
const BOM_UTF16LE: &[u8] = &[0xFF, 0xFE];

/// Supported text encodings.
///
/// # Examples
///
/// ```
/// use inimap::encoding::TextEncoding;
///
/// let enc: TextEncoding = "iso-8859-1".parse().unwrap();
/// assert_eq!(enc, TextEncoding::Latin1);
/// assert_eq!(enc.decode(&[0x63, 0x61, 0x66, 0xE9]), "café");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum TextEncoding {
    /// UTF-8 without a byte order mark on output.
    #[default]
    #[value(name = "utf8", alias = "utf-8")]
    Utf8,
    /// UTF-16 little-endian, written with a byte order mark.
    #[value(name = "utf16le", alias = "utf-16", alias = "unicode")]
    Utf16Le,
    /// 7-bit US-ASCII.
    #[value(name = "ascii", alias = "us-ascii")]
    Ascii,
    /// ISO-8859-1, the legacy default of the mapper file API.
    #[value(name = "latin1", alias = "iso-8859-1")]
    Latin1,
}

impl TextEncoding {
    /// Canonical label for this encoding.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Utf8 => "UTF-8",
            Self::Utf16Le => "UTF-16LE",
            Self::Ascii => "US-ASCII",
            Self::Latin1 => "ISO-8859-1",
        }
    }

    /// Detect an encoding from a leading byte order mark.
    #[must_use]
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(BOM_UTF16LE) {
            Some(Self::Utf16Le)
        } else if bytes.starts_with(BOM_UTF8) {
            Some(Self::Utf8)
        } else {
            None
        }
    }

    /// Decode `bytes` into a string, stripping any byte order mark.
    #[must_use]
    pub fn decode(self, bytes: &[u8]) -> String {
        let effective = Self::sniff(bytes).unwrap_or(self);
        match effective {
            Self::Utf8 => {
                let (text, had_errors) = encoding_rs::UTF_8.decode_with_bom_removal(bytes);
                if had_errors {
                    tracing::debug!("replaced malformed {} sequences", effective.name());
                }
                text.into_owned()
            }
            Self::Utf16Le => {
                let (text, had_errors) = encoding_rs::UTF_16LE.decode_with_bom_removal(bytes);
                if had_errors {
                    tracing::debug!("replaced malformed {} sequences", effective.name());
                }
                text.into_owned()
            }
            Self::Ascii => bytes
                .iter()
                .map(|&b| if b.is_ascii() { char::from(b) } else { '?' })
                .collect(),
            Self::Latin1 => encoding_rs::mem::decode_latin1(bytes).into_owned(),
        }
    }

    /// Encode `text`; characters the encoding cannot represent become `?`.
    #[must_use]
    pub fn encode(self, text: &str) -> Vec<u8> {
        match self {
            Self::Utf8 => text.as_bytes().to_vec(),
            Self::Utf16Le => {
                let mut out = Vec::with_capacity(BOM_UTF16LE.len() + text.len() * 2);
                out.extend_from_slice(BOM_UTF16LE);
                for unit in text.encode_utf16() {
                    out.extend_from_slice(&unit.to_le_bytes());
                }
                out
            }
            Self::Ascii => text
                .chars()
                .map(|c| if c.is_ascii() { u8::try_from(c).unwrap_or(b'?') } else { b'?' })
                .collect(),
            Self::Latin1 => text.chars().map(|c| u8::try_from(c).unwrap_or(b'?')).collect(),
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.name().fmt(f)
    }
}

/// Error returned when an encoding label is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown encoding '{0}' (expected utf-8, utf-16le, ascii or iso-8859-1)")]
pub struct UnknownEncoding(pub String);

impl FromStr for TextEncoding {
    type Err = UnknownEncoding;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "utf8" | "utf-8" => Ok(Self::Utf8),
            "utf16" | "utf-16" | "utf16le" | "utf-16le" | "unicode" => Ok(Self::Utf16Le),
            "ascii" | "us-ascii" => Ok(Self::Ascii),
            "latin1" | "latin-1" | "iso-8859-1" | "iso8859-1" => Ok(Self::Latin1),
            _ => Err(UnknownEncoding(s.to_string())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn utf8_strips_bom() {
        let bytes = [0xEF, 0xBB, 0xBF, b'a', b'=', b'1'];
        assert_eq!(TextEncoding::Utf8.decode(&bytes), "a=1");
    }

    #[test]
    fn utf16le_encode_writes_bom_and_decodes_back() {
        let bytes = TextEncoding::Utf16Le.encode("k=é");
        assert_eq!(&bytes[..2], BOM_UTF16LE);
        assert_eq!(bytes.len(), 2 + 3 * 2);
        assert_eq!(TextEncoding::Utf16Le.decode(&bytes), "k=é");
    }

    #[test]
    fn bom_overrides_requested_encoding() {
        let bytes = TextEncoding::Utf16Le.encode("[S]");
        assert_eq!(TextEncoding::Latin1.decode(&bytes), "[S]");
    }

    #[test]
    fn latin1_round_trips_high_bytes() {
        let bytes = TextEncoding::Latin1.encode("naïve");
        assert_eq!(bytes, vec![b'n', b'a', 0xEF, b'v', b'e']);
        assert_eq!(TextEncoding::Latin1.decode(&bytes), "naïve");
    }

    #[test]
    fn latin1_replaces_unrepresentable_chars() {
        assert_eq!(TextEncoding::Latin1.encode("€1"), b"?1".to_vec());
    }

    #[test]
    fn ascii_replaces_non_ascii_both_ways() {
        assert_eq!(TextEncoding::Ascii.encode("é"), b"?".to_vec());
        assert_eq!(TextEncoding::Ascii.decode(&[b'a', 0xE9]), "a?");
    }

    #[test]
    fn utf8_malformed_bytes_are_replaced() {
        assert_eq!(TextEncoding::Utf8.decode(&[b'a', 0xFF]), "a\u{FFFD}");
    }

    #[test]
    fn parse_labels() {
        assert_eq!("UTF-8".parse::<TextEncoding>().unwrap(), TextEncoding::Utf8);
        assert_eq!("unicode".parse::<TextEncoding>().unwrap(), TextEncoding::Utf16Le);
        assert_eq!(" ascii ".parse::<TextEncoding>().unwrap(), TextEncoding::Ascii);
        assert_eq!("Latin1".parse::<TextEncoding>().unwrap(), TextEncoding::Latin1);
        assert!("ebcdic".parse::<TextEncoding>().is_err());
    }

    #[test]
    fn display_uses_canonical_name() {
        assert_eq!(TextEncoding::Latin1.to_string(), "ISO-8859-1");
    }
}
