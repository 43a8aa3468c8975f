//! Schema-driven mapping between typed values and INI documents.
//!
//! Implement [`IniSchema`] for a type, then use a [`Serializer`] (or the
//! [`serialize`] / [`deserialize`] shortcuts) to move values in and out of
//! documents, strings and files.
//!
//! Field rules:
//!
//! - **Text** fields are quoted when quote handling is on, or when they
//!   would not read back otherwise. One pair of quotes is stripped on read,
//!   and a value that cannot be written raises
//!   [`Diagnostic::ValueNotWritten`].
//! - **Numeric** fields go through invariant formatting. Text that does not
//!   parse leaves the field at its default and raises
//!   [`Diagnostic::FieldDefaulted`].
//! - **Map** fields use the indexed-key convention; reading stops at the
//!   first missing index.
//! - **Section** fields hold a nested value in a named section, one level
//!   deep only.
//!
//! ```
//! use inimap::mapper::{self, Field, IniSchema, MapperOptions, Schema};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Server {
//!     host: String,
//!     port: u16,
//! }
//!
//! impl IniSchema for Server {
//!     fn schema() -> Schema<Self> {
//!         Schema::new()
//!             .field(Field::scalar("host", "Host", |s: &Self| s.host.clone(), |s, v| s.host = v))
//!             .field(Field::scalar("port", "Port", |s: &Self| s.port, |s, v| s.port = v))
//!     }
//! }
//!
//! let text = mapper::serialize(&Server { host: "db".into(), port: 5432 }, MapperOptions::default())?;
//! assert_eq!(text, "Host=db\nPort=5432\n");
//! let back: Server = mapper::deserialize(&text, MapperOptions::default())?;
//! assert_eq!(back.port, 5432);
//! # Ok::<(), inimap::error::IniError>(())
//! ```
pub mod diagnostics;
mod scalar;
mod schema;

use std::fmt;
use std::path::Path;

pub use diagnostics::{Diagnostic, DiagnosticsSink, Direction, MemorySink, NoopSink, TracingSink};
pub use scalar::{Scalar, ScalarKind, ScalarType};
pub use schema::{Binding, Field, FieldKind, IndexedMap, IniSchema, Schema};

use crate::catalog::SectionCatalog;
use crate::document::{Document, LineEnding};
use crate::encoding::TextEncoding;
use crate::error::Result;
use crate::parser;
use crate::retry::{FileSource, RetryPolicy, Sleeper, StdFileSource, ThreadSleeper};
use schema::Pass;

/// Per-call settings for a [`Serializer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapperOptions {
    /// Override the schema's quote handling flag.
    pub handle_quoted_values: Option<bool>,
    /// Override the schema's read-only serialization flag.
    pub serialize_read_only: Option<bool>,
    /// Encoding for file reads and writes.
    pub encoding: TextEncoding,
    /// Line ending for rendered text.
    pub line_ending: LineEnding,
    /// Retry policy for file reads.
    pub retry: RetryPolicy,
}

impl Default for MapperOptions {
    fn default() -> Self {
        Self {
            handle_quoted_values: None,
            serialize_read_only: None,
            encoding: TextEncoding::Latin1,
            line_ending: LineEnding::default(),
            retry: RetryPolicy::default(),
        }
    }
}

impl MapperOptions {
    /// Force quote handling on or off.
    #[must_use]
    pub const fn with_quoted_values(mut self, on: bool) -> Self {
        self.handle_quoted_values = Some(on);
        self
    }

    /// Force read-only serialization on or off.
    #[must_use]
    pub const fn with_read_only(mut self, on: bool) -> Self {
        self.serialize_read_only = Some(on);
        self
    }

    /// Use `encoding` for files.
    #[must_use]
    pub const fn with_encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = encoding;
        self
    }
}

/// Maps values of `T` to and from documents.
///
/// The field table is built and validated once in [`Serializer::new`] and
/// reused by every call.
pub struct Serializer<T: IniSchema> {
    schema: Schema<T>,
    options: MapperOptions,
    sink: Box<dyn DiagnosticsSink>,
}

impl<T: IniSchema> fmt::Debug for Serializer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Serializer")
            .field("schema", &self.schema)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<T: IniSchema> Serializer<T> {
    /// Build and validate the schema for `T`.
    ///
    /// # Errors
    ///
    /// Returns [`IniError::SchemaViolation`](crate::error::IniError::SchemaViolation)
    /// if the schema nests sections more than one level deep or names an
    /// empty key or section.
    pub fn new() -> Result<Self> {
        let schema = T::schema();
        schema.validate()?;
        Ok(Self {
            schema,
            options: MapperOptions::default(),
            sink: Box::new(NoopSink),
        })
    }

    /// Replace the options.
    #[must_use]
    pub const fn with_options(mut self, options: MapperOptions) -> Self {
        self.options = options;
        self
    }

    /// Send diagnostics to `sink` instead of discarding them.
    #[must_use]
    pub fn with_sink(mut self, sink: impl DiagnosticsSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Current options.
    #[must_use]
    pub const fn options(&self) -> &MapperOptions {
        &self.options
    }

    fn pass(&self) -> Pass<'_> {
        Pass {
            handle_quoted_values: self
                .options
                .handle_quoted_values
                .unwrap_or_else(|| self.schema.quotes_handled()),
            serialize_read_only: self
                .options
                .serialize_read_only
                .unwrap_or_else(|| self.schema.read_only_serialized()),
            sink: self.sink.as_ref(),
        }
    }

    /// Build a fresh document holding `value`.
    #[must_use]
    pub fn to_document(&self, value: &T) -> Document {
        let mut doc = Document::new()
            .with_encoding(self.options.encoding)
            .with_line_ending(self.options.line_ending);
        self.schema
            .write(value, SectionCatalog::MAIN, &mut doc, &self.pass());
        doc
    }

    /// Render `value` as INI text.
    #[must_use]
    pub fn serialize(&self, value: &T) -> String {
        self.to_document(value).to_ini_string()
    }

    /// Read a value from `doc`, starting from `T::default()`.
    #[must_use]
    pub fn from_document(&self, doc: &Document) -> T {
        let mut value = T::default();
        self.schema
            .read(&mut value, SectionCatalog::MAIN, doc, &self.pass());
        value
    }

    /// Parse `text` and read a value from it.
    ///
    /// Malformed lines are reported as [`Diagnostic::LineSkipped`].
    #[must_use]
    pub fn deserialize(&self, text: &str) -> T {
        let outcome = parser::parse(text);
        for skipped in outcome.skipped {
            self.sink.report(Diagnostic::LineSkipped(skipped));
        }
        self.from_document(&Document::from(outcome.catalog))
    }

    /// Load `path` with retries and read a value from it.
    ///
    /// A file that cannot be loaded yields `T::default()` and a
    /// [`Diagnostic::LoadFailed`].
    #[must_use]
    pub fn from_ini_file(&self, path: impl AsRef<Path>) -> T {
        self.from_ini_file_with(&StdFileSource, &ThreadSleeper, path.as_ref())
    }

    /// [`from_ini_file`](Self::from_ini_file) with an explicit file source
    /// and sleeper.
    #[must_use]
    pub fn from_ini_file_with<F, S>(&self, source: &F, sleeper: &S, path: &Path) -> T
    where
        F: FileSource + ?Sized,
        S: Sleeper + ?Sized,
    {
        let mut doc = Document::new();
        match doc.load_file_with(source, sleeper, path, self.options.encoding, self.options.retry) {
            Ok(report) => {
                for skipped in report.skipped {
                    self.sink.report(Diagnostic::LineSkipped(skipped));
                }
                self.from_document(&doc)
            }
            Err(e) => {
                self.sink.report(Diagnostic::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                });
                T::default()
            }
        }
    }

    /// Write `value` to `path` in the configured encoding.
    ///
    /// # Errors
    ///
    /// Returns [`IniError::IoFatal`](crate::error::IniError::IoFatal) if the
    /// write fails.
    pub fn to_ini_file(&self, value: &T, path: impl AsRef<Path>) -> Result<()> {
        self.to_document(value)
            .write_file_to(path, self.options.encoding)
    }
}

/// Render `value` as INI text.
///
/// # Errors
///
/// Returns [`IniError::SchemaViolation`](crate::error::IniError::SchemaViolation)
/// if `T`'s schema is invalid.
pub fn serialize<T: IniSchema>(value: &T, options: MapperOptions) -> Result<String> {
    Ok(Serializer::<T>::new()?.with_options(options).serialize(value))
}

/// Parse `text` into a `T`.
///
/// # Errors
///
/// Returns [`IniError::SchemaViolation`](crate::error::IniError::SchemaViolation)
/// if `T`'s schema is invalid.
pub fn deserialize<T: IniSchema>(text: &str, options: MapperOptions) -> Result<T> {
    Ok(Serializer::<T>::new()?.with_options(options).deserialize(text))
}
