//! Encoding-aware load and save on top of the catalog.
//!
//! A [`Document`] owns one [`SectionCatalog`] plus the settings needed to
//! write it back: target path, encoding, quote policy and line ending.
//! Every load clears the catalog first; a failed load leaves it empty and
//! flips [`Document::is_valid`] to `false`.
use std::borrow::Cow;
use std::fmt;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::catalog::{self, Item, Section, SectionCatalog};
use crate::encoding::TextEncoding;
use crate::error::{IniError, Result};
use crate::parser::{self, SkippedLine};
use crate::quote;
use crate::retry::{self, FileSource, RetryPolicy, Sleeper, StdFileSource, ThreadSleeper};

/// How stored quotes are treated when the document is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum QuotePolicy {
    /// Write values exactly as stored.
    #[default]
    Preserve,
    /// Remove one pair of surrounding quotes.
    Strip,
    /// Quote every value that is not already quoted.
    Force,
}

impl QuotePolicy {
    /// Transform one stored value for output.
    #[must_use]
    pub fn apply(self, raw: &str) -> Cow<'_, str> {
        match self {
            Self::Preserve => Cow::Borrowed(raw),
            Self::Strip => Cow::Borrowed(quote::unquote(raw)),
            Self::Force => Cow::Owned(quote::ensure_quoted(raw)),
        }
    }
}

/// Line terminator used when writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum LineEnding {
    /// `\n`
    #[default]
    Lf,
    /// `\r\n`
    #[value(name = "crlf")]
    CrLf,
}

impl LineEnding {
    /// The terminator text.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
        }
    }
}

/// Summary of a successful load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    /// Encoding the bytes were decoded with (a byte order mark wins over
    /// the requested one).
    pub encoding: TextEncoding,
    /// Lines the parser rejected.
    pub skipped: Vec<SkippedLine>,
}

impl LoadReport {
    /// Return `true` if no line was skipped.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }

    /// Skipped lines as [`IniError::ParseSkippedLine`] warnings.
    pub fn warnings(&self) -> impl Iterator<Item = IniError> + '_ {
        self.skipped.iter().copied().map(IniError::from)
    }
}

/// An INI document: catalog plus load/save settings.
///
/// # Examples
///
/// ```
/// use inimap::document::Document;
///
/// let mut doc = Document::parse("M_K1=Main Section String\n[Section1]\nS1_K2=12345\n");
/// assert!(doc.is_valid());
/// assert_eq!(doc.get_value("", "M_K1"), "Main Section String");
/// assert_eq!(doc.get_value("section1", "s1_k2"), "12345");
///
/// assert!(doc.set_quoted_value("Section1", "Title", "a; b"));
/// assert_eq!(doc.item_value("Section1", "Title", true), "a; b");
/// assert!(doc.to_ini_string().contains("Title=\"a; b\"\n"));
/// ```
#[derive(Debug, Clone)]
pub struct Document {
    catalog: SectionCatalog,
    path: Option<PathBuf>,
    encoding: TextEncoding,
    quote_policy: QuotePolicy,
    line_ending: LineEnding,
    valid: bool,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty, valid document with UTF-8 encoding.
    #[must_use]
    pub fn new() -> Self {
        Self {
            catalog: SectionCatalog::new(),
            path: None,
            encoding: TextEncoding::default(),
            quote_policy: QuotePolicy::default(),
            line_ending: LineEnding::default(),
            valid: true,
        }
    }

    /// Load `path`, retrying while the file is locked.
    ///
    /// Never fails; check [`is_valid`](Self::is_valid) afterwards.
    #[must_use]
    pub fn open(path: impl AsRef<Path>, encoding: TextEncoding) -> Self {
        let mut doc = Self::new();
        if let Err(e) = doc.load_file(path, encoding) {
            tracing::warn!("{e}");
        }
        doc
    }

    /// Build a document from already-decoded text.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut doc = Self::new();
        doc.populate(text);
        doc
    }

    /// Set the quote policy used when writing.
    #[must_use]
    pub const fn with_quote_policy(mut self, policy: QuotePolicy) -> Self {
        self.quote_policy = policy;
        self
    }

    /// Set the line ending used when writing.
    #[must_use]
    pub const fn with_line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = line_ending;
        self
    }

    /// Set the encoding used by [`write_file`](Self::write_file) and
    /// [`write_stream`](Self::write_stream).
    #[must_use]
    pub const fn with_encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Quote policy applied on write.
    #[must_use]
    pub const fn quote_policy(&self) -> QuotePolicy {
        self.quote_policy
    }

    /// Change the quote policy applied on write.
    pub const fn set_quote_policy(&mut self, policy: QuotePolicy) {
        self.quote_policy = policy;
    }

    /// Line ending used on write.
    #[must_use]
    pub const fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    /// Change the line ending used on write.
    pub const fn set_line_ending(&mut self, line_ending: LineEnding) {
        self.line_ending = line_ending;
    }

    /// Encoding of the last load, or the one set for writing.
    #[must_use]
    pub const fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    /// Change the encoding used on write.
    pub const fn set_encoding(&mut self, encoding: TextEncoding) {
        self.encoding = encoding;
    }

    /// File this document was loaded from or last saved to.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// `true` unless the most recent load failed.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.valid
    }

    // -----------------------------------------------------------------------
    // Loading
    // -----------------------------------------------------------------------

    /// Replace the contents with the file at `path`, retrying while the file
    /// is locked by another process.
    ///
    /// # Errors
    ///
    /// Returns [`IniError::IoTransient`] or [`IniError::IoFatal`]; the
    /// catalog is then empty and the document invalid.
    pub fn load_file(&mut self, path: impl AsRef<Path>, encoding: TextEncoding) -> Result<LoadReport> {
        self.load_file_with(
            &StdFileSource,
            &ThreadSleeper,
            path.as_ref(),
            encoding,
            RetryPolicy::default(),
        )
    }

    /// [`load_file`](Self::load_file) with an explicit file source, sleeper
    /// and retry policy.
    ///
    /// # Errors
    ///
    /// See [`retry::load_with_retry`].
    pub fn load_file_with<F, S>(
        &mut self,
        source: &F,
        sleeper: &S,
        path: &Path,
        encoding: TextEncoding,
        policy: RetryPolicy,
    ) -> Result<LoadReport>
    where
        F: FileSource + ?Sized,
        S: Sleeper + ?Sized,
    {
        self.reset();
        self.path = Some(path.to_path_buf());
        let bytes = retry::load_with_retry(source, sleeper, path, policy)?;
        Ok(self.decode_and_populate(&bytes, encoding))
    }

    /// Replace the contents with everything readable from `reader`.
    ///
    /// # Errors
    ///
    /// Returns [`IniError::IoFatal`] if reading fails.
    pub fn load_reader<R: Read>(&mut self, mut reader: R, encoding: TextEncoding) -> Result<LoadReport> {
        self.reset();
        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .map_err(IniError::io_stream)?;
        Ok(self.decode_and_populate(&bytes, encoding))
    }

    /// Replace the contents with `bytes` decoded as `encoding`.
    ///
    /// # Errors
    ///
    /// Decoding is lossy, so this currently always succeeds.
    pub fn load_bytes(&mut self, bytes: &[u8], encoding: TextEncoding) -> Result<LoadReport> {
        self.reset();
        Ok(self.decode_and_populate(bytes, encoding))
    }

    /// Replace the contents with already-decoded text.
    ///
    /// # Errors
    ///
    /// Parsing skips bad lines instead of failing, so this always succeeds.
    pub fn load_str(&mut self, text: &str) -> Result<LoadReport> {
        self.reset();
        Ok(LoadReport {
            encoding: self.encoding,
            skipped: self.populate(text),
        })
    }

    fn reset(&mut self) {
        self.catalog.clear();
        self.valid = false;
    }

    fn decode_and_populate(&mut self, bytes: &[u8], encoding: TextEncoding) -> LoadReport {
        self.encoding = TextEncoding::sniff(bytes).unwrap_or(encoding);
        let text = self.encoding.decode(bytes);
        let skipped = self.populate(&text);
        LoadReport {
            encoding: self.encoding,
            skipped,
        }
    }

    fn populate(&mut self, text: &str) -> Vec<SkippedLine> {
        let outcome = parser::parse(text);
        self.catalog = outcome.catalog;
        self.valid = true;
        tracing::debug!(
            "loaded {} section(s), {} item(s), {} skipped line(s)",
            self.catalog.sections().len(),
            self.catalog.item_count(),
            outcome.skipped.len()
        );
        outcome.skipped
    }

    // -----------------------------------------------------------------------
    // Access
    // -----------------------------------------------------------------------

    /// The underlying catalog.
    #[must_use]
    pub const fn catalog(&self) -> &SectionCatalog {
        &self.catalog
    }

    /// Mutable access to the underlying catalog.
    pub const fn catalog_mut(&mut self) -> &mut SectionCatalog {
        &mut self.catalog
    }

    /// First section whose name matches case-insensitively.
    #[must_use]
    pub fn get_section(&self, name: &str) -> Option<&Section> {
        self.catalog.get_section(name)
    }

    /// Section names in file order; the main section is `""`.
    #[must_use]
    pub fn section_names(&self) -> Vec<&str> {
        self.catalog.section_names()
    }

    /// Value of `key` in `section`, or `""` if either is absent.
    #[must_use]
    pub fn item_value(&self, section: &str, key: &str, unquote: bool) -> String {
        self.catalog
            .get_section(section)
            .and_then(|s| s.items().get_item(key))
            .map(|item| item.value(unquote).to_string())
            .unwrap_or_default()
    }

    /// Raw value of `key` in `section`, or `""` if either is absent.
    #[must_use]
    pub fn get_value(&self, section: &str, key: &str) -> String {
        self.item_value(section, key, false)
    }

    /// Create or overwrite `key` in `section`, creating the section if
    /// needed.
    ///
    /// Returns `false` and changes nothing when `key` is empty, contains `=`
    /// or `;`, or starts with `[`, or when `section` contains `]` or a line
    /// break.
    pub fn set_value(&mut self, section: &str, key: &str, value: &str) -> bool {
        let key = key.trim();
        if !catalog::is_writable_key(key) || !catalog::is_writable_section(section) {
            return false;
        }
        let items = self.catalog.section_entry(section).items_mut();
        if let Some(item) = items.get_item_mut(key) {
            item.raw_value = value.to_string();
        } else {
            items.add(Item::new(key, value));
        }
        true
    }

    /// [`set_value`](Self::set_value) with `value` wrapped in double quotes.
    pub fn set_quoted_value(&mut self, section: &str, key: &str, value: &str) -> bool {
        self.set_value(section, key, &quote::to_quoted(value))
    }

    /// Remove the first `key` in `section`. Returns `false` if absent.
    pub fn remove_item(&mut self, section: &str, key: &str) -> bool {
        self.catalog
            .get_section_mut(section)
            .and_then(|s| s.items_mut().remove(key))
            .is_some()
    }

    /// Remove a section; the main section is emptied instead.
    pub fn remove_section(&mut self, name: &str) -> bool {
        self.catalog.remove_section(name)
    }

    // -----------------------------------------------------------------------
    // Writing
    // -----------------------------------------------------------------------

    /// Render the document as INI text.
    #[must_use]
    pub fn to_ini_string(&self) -> String {
        self.to_string()
    }

    /// Encode the rendered text with the document's encoding.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.encoding.encode(&self.to_ini_string())
    }

    /// Write to the file this document was loaded from.
    ///
    /// # Errors
    ///
    /// Returns [`IniError::IoFatal`] if the document has no path or the
    /// write fails.
    pub fn write_file(&self) -> Result<()> {
        let Some(path) = self.path.as_deref() else {
            let e = std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "document has no file path",
            );
            tracing::warn!("cannot write document: {e}");
            return Err(IniError::io_stream(e));
        };
        self.write_file_to(path, self.encoding)
    }

    /// Write to `path` in `encoding` without changing the document.
    ///
    /// The write is not atomic.
    ///
    /// # Errors
    ///
    /// Returns [`IniError::IoFatal`] if the write fails.
    pub fn write_file_to(&self, path: impl AsRef<Path>, encoding: TextEncoding) -> Result<()> {
        let path = path.as_ref();
        let bytes = encoding.encode(&self.to_ini_string());
        std::fs::write(path, bytes).map_err(|e| {
            tracing::warn!("failed to write {}: {e}", path.display());
            IniError::io_at(path, e)
        })
    }

    /// Write to `writer` in the document's encoding.
    ///
    /// # Errors
    ///
    /// Returns [`IniError::IoFatal`] if writing or flushing fails.
    pub fn write_stream<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
        writer
            .write_all(&self.to_bytes())
            .and_then(|()| writer.flush())
            .map_err(|e| {
                tracing::warn!("failed to write document to stream: {e}");
                IniError::io_stream(e)
            })
    }

    /// Write to `path` in `encoding` and remember both for later saves.
    ///
    /// # Errors
    ///
    /// Returns [`IniError::IoFatal`] if the write fails.
    pub fn save(&mut self, path: impl AsRef<Path>, encoding: TextEncoding) -> Result<()> {
        let path = path.as_ref();
        self.write_file_to(path, encoding)?;
        self.path = Some(path.to_path_buf());
        self.encoding = encoding;
        Ok(())
    }
}

impl From<SectionCatalog> for Document {
    fn from(catalog: SectionCatalog) -> Self {
        Self {
            catalog,
            ..Self::new()
        }
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let eol = self.line_ending.as_str();
        let mut wrote_any = false;
        for (index, section) in self.catalog.sections().iter().enumerate() {
            if index > 0 {
                if wrote_any {
                    f.write_str(eol)?;
                }
                write!(f, "[{}]{eol}", section.name())?;
                wrote_any = true;
            }
            for item in section.items() {
                write!(f, "{}={}", item.key, self.quote_policy.apply(&item.raw_value))?;
                if let Some(comment) = &item.comment {
                    write!(f, " ;{comment}")?;
                }
                f.write_str(eol)?;
                wrote_any = true;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::error::SkipReason;

    const REFERENCE: &str =
        "M_K1=Main Section String\n[Section1]\nS1_K1=Section 1 String\nS1_K2=12345\n";

    #[test]
    fn reference_scenario() {
        let doc = Document::parse(REFERENCE);
        assert!(doc.is_valid());
        assert_eq!(doc.get_value("", "M_K1"), "Main Section String");
        assert_eq!(doc.get_value("Section1", "S1_K2"), "12345");
        assert_eq!(doc.section_names(), ["", "Section1"]);
    }

    #[test]
    fn absent_and_empty_values_read_the_same() {
        let doc = Document::parse("[S]\nempty=\n");
        assert_eq!(doc.get_value("S", "empty"), "");
        assert_eq!(doc.get_value("S", "missing"), "");
        assert_eq!(doc.get_value("Nope", "empty"), "");
    }

    #[test]
    fn set_value_creates_section_and_item() {
        let mut doc = Document::new();
        assert!(doc.set_value("Net", "Port", "8080"));
        assert_eq!(doc.get_value("net", "port"), "8080");
        assert_eq!(doc.section_names(), ["", "Net"]);
    }

    #[test]
    fn set_value_rejects_empty_key() {
        let mut doc = Document::new();
        assert!(!doc.set_value("S", "", "v"));
        assert!(!doc.set_value("S", "   ", "v"));
        assert_eq!(doc.section_names(), [""]);
    }

    #[test]
    fn set_value_rejects_keys_and_sections_that_would_not_reload() {
        let mut doc = Document::parse("k=1\n");
        for key in ["a=b", "a;b", "[a]", "a\nb"] {
            assert!(!doc.set_value("", key, "v"), "{key:?}");
        }
        assert!(!doc.set_value("a]b", "k", "v"));
        assert!(!doc.set_value("a\nb", "k", "v"));
        assert_eq!(doc.to_ini_string(), "k=1\n");
    }

    #[test]
    fn set_value_overwrites_first_duplicate_only() {
        let mut doc = Document::parse("k=1 ;keep\nK=2\n");
        assert!(doc.set_value("", "k", "9"));
        assert_eq!(doc.to_ini_string(), "k=9 ;keep\nK=2\n");
    }

    #[test]
    fn quoted_value_round_trips_through_unquote() {
        let mut doc = Document::new();
        doc.set_quoted_value("S", "Greeting", "hello; world");
        assert_eq!(doc.get_value("S", "Greeting"), "\"hello; world\"");
        assert_eq!(doc.item_value("S", "Greeting", true), "hello; world");

        let reparsed = Document::parse(&doc.to_ini_string());
        assert_eq!(reparsed.item_value("S", "Greeting", true), "hello; world");
    }

    #[test]
    fn writes_main_items_first_and_blank_line_between_sections() {
        let doc = Document::parse("[A]\na=1\n[B]\nb=2\n");
        assert_eq!(doc.to_ini_string(), "[A]\na=1\n\n[B]\nb=2\n");

        let doc = Document::parse(REFERENCE);
        assert_eq!(
            doc.to_ini_string(),
            "M_K1=Main Section String\n\n[Section1]\nS1_K1=Section 1 String\nS1_K2=12345\n"
        );
    }

    #[test]
    fn comments_are_written_back() {
        let doc = Document::parse("Port=8080 ; default\n");
        assert_eq!(doc.to_ini_string(), "Port=8080 ; default\n");
    }

    #[test]
    fn quote_policies() {
        let text = "a=\"x\"\nb=y\n";
        let preserve = Document::parse(text);
        assert_eq!(preserve.to_ini_string(), "a=\"x\"\nb=y\n");
        let strip = Document::parse(text).with_quote_policy(QuotePolicy::Strip);
        assert_eq!(strip.to_ini_string(), "a=x\nb=y\n");
        let force = Document::parse(text).with_quote_policy(QuotePolicy::Force);
        assert_eq!(force.to_ini_string(), "a=\"x\"\nb=\"y\"\n");
    }

    #[test]
    fn crlf_line_endings() {
        let doc = Document::parse("[S]\nk=v\n").with_line_ending(LineEnding::CrLf);
        assert_eq!(doc.to_ini_string(), "[S]\r\nk=v\r\n");
    }

    #[test]
    fn malformed_line_keeps_document_valid() {
        let mut doc = Document::new();
        let report = doc.load_str("[S]\na=1\nnot a pair\nb=2\n").unwrap();
        assert!(doc.is_valid());
        assert_eq!(doc.get_value("S", "a"), "1");
        assert_eq!(doc.get_value("S", "b"), "2");
        assert!(!report.is_clean());
        let warnings: Vec<_> = report.warnings().collect();
        assert!(matches!(
            warnings[0],
            IniError::ParseSkippedLine {
                line: 3,
                reason: SkipReason::MissingSeparator
            }
        ));
    }

    #[test]
    fn load_replaces_previous_content() {
        let mut doc = Document::parse("[Old]\nk=v\n");
        doc.load_str("[New]\nk=w\n").unwrap();
        assert_eq!(doc.section_names(), ["", "New"]);
        assert!(doc.get_section("Old").is_none());
    }

    #[test]
    fn missing_file_leaves_empty_invalid_document() {
        let dir = tempfile::tempdir().unwrap();
        let mut doc = Document::parse("[Old]\nk=v\n");
        let err = doc
            .load_file(dir.path().join("absent.ini"), TextEncoding::Utf8)
            .unwrap_err();
        assert!(matches!(err, IniError::IoFatal { .. }));
        assert!(!doc.is_valid());
        assert_eq!(doc.catalog(), &SectionCatalog::new());
    }

    #[test]
    fn open_never_fails() {
        let dir = tempfile::tempdir().unwrap();
        let doc = Document::open(dir.path().join("absent.ini"), TextEncoding::Latin1);
        assert!(!doc.is_valid());
        assert_eq!(doc.get_value("", "anything"), "");
    }

    #[test]
    fn bom_sets_document_encoding() {
        let mut doc = Document::new();
        let bytes = TextEncoding::Utf16Le.encode("[S]\nk=v\n");
        let report = doc.load_bytes(&bytes, TextEncoding::Latin1).unwrap();
        assert_eq!(report.encoding, TextEncoding::Utf16Le);
        assert_eq!(doc.encoding(), TextEncoding::Utf16Le);
        assert_eq!(doc.get_value("S", "k"), "v");
    }

    #[test]
    fn write_stream_uses_document_encoding() {
        let doc = Document::parse("k=é\n").with_encoding(TextEncoding::Latin1);
        let mut out = Vec::new();
        doc.write_stream(&mut out).unwrap();
        assert_eq!(out, vec![b'k', b'=', 0xE9, b'\n']);
    }

    struct BrokenWriter;

    impl Write for BrokenWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::from(std::io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_stream_failure_is_returned() {
        let doc = Document::parse("k=v\n");
        let err = doc.write_stream(&mut BrokenWriter).unwrap_err();
        assert!(matches!(err, IniError::IoFatal { path: None, .. }));
    }

    #[test]
    fn write_file_without_path_fails() {
        let doc = Document::parse("k=v\n");
        assert!(doc.write_file().is_err());
    }

    #[test]
    fn save_then_write_file_reuses_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.ini");
        let mut doc = Document::parse("[S]\nk=v\n");
        doc.save(&path, TextEncoding::Utf8).unwrap();
        doc.set_value("S", "k", "w");
        doc.write_file().unwrap();

        let reloaded = Document::open(&path, TextEncoding::Utf8);
        assert_eq!(reloaded.get_value("S", "k"), "w");
        assert_eq!(reloaded.path(), Some(path.as_path()));
    }

    #[test]
    fn empty_named_section_after_others_keeps_its_header() {
        let doc = Document::parse("a=1\n[S]\nb=2\n[]\nc=3\n");
        let text = doc.to_ini_string();
        assert_eq!(text, "a=1\n\n[S]\nb=2\n\n[]\nc=3\n");

        let reloaded = Document::parse(&text);
        assert_eq!(reloaded.get_value("S", "c"), "");
        assert_eq!(reloaded.get_value("S", "b"), "2");
    }

    #[test]
    fn remove_item_and_section() {
        let mut doc = Document::parse("m=1\n[S]\na=1\nb=2\n[T]\nc=3\n");
        assert!(doc.remove_item("s", "A"));
        assert!(!doc.remove_item("s", "a"));
        assert!(doc.remove_section("T"));
        assert!(doc.remove_section(""));
        assert_eq!(doc.to_ini_string(), "[S]\nb=2\n");
    }

    #[test]
    fn load_file_with_retries_locked_file() {
        use crate::retry::{MockFileSource, MockSleeper};

        let mut locked_once = true;
        let mut source = MockFileSource::new();
        source.expect_read().times(2).returning(move |_| {
            if locked_once {
                locked_once = false;
                Err(std::io::Error::from(std::io::ErrorKind::WouldBlock))
            } else {
                Ok(b"[S]\nk=v\n".to_vec())
            }
        });
        let mut sleeper = MockSleeper::new();
        sleeper.expect_sleep().times(1).return_const(());

        let mut doc = Document::new();
        doc.load_file_with(
            &source,
            &sleeper,
            Path::new("locked.ini"),
            TextEncoding::Utf8,
            RetryPolicy::default(),
        )
        .unwrap();
        assert!(doc.is_valid());
        assert_eq!(doc.get_value("S", "k"), "v");
    }
}
