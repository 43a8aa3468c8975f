//! Error types for the INI engine.
//!
//! This module provides a structured error type using [`thiserror`].
//! Library code returns [`IniError`] while the command handlers at the CLI
//! boundary convert it to [`anyhow::Error`] via the standard `?` operator.
//!
//! # Error taxonomy
//!
//! ```text
//! IniError
//! ├── IoTransient       file stayed locked for the whole retry budget
//! ├── IoFatal           any other I/O failure (missing file, denied, …)
//! ├── SchemaViolation   the mapper schema is structurally invalid
//! └── ParseSkippedLine  a malformed line was skipped (warning only)
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the document, the retrying loader, and the mapper.
#[derive(Error, Debug)]
pub enum IniError {
    /// The file remained locked by another process for every retry attempt.
    #[error("file {} still locked after {attempts} attempt(s): {source}", .path.display())]
    IoTransient {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Number of read attempts made before giving up.
        attempts: u32,
        /// The last transient error observed.
        source: std::io::Error,
    },

    /// A non-retryable I/O failure.
    #[error("I/O error on {}: {source}", display_path(.path.as_deref()))]
    IoFatal {
        /// Path involved, or `None` for caller-supplied streams.
        path: Option<PathBuf>,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The mapper schema for a type is invalid (e.g. nesting too deep).
    #[error("schema violation in {type_name}.{field}: {reason}")]
    SchemaViolation {
        /// Rust type name that declared the offending field.
        type_name: &'static str,
        /// Field name as declared in the schema.
        field: &'static str,
        /// Human-readable description of the violation.
        reason: String,
    },

    /// A line could not be parsed and was skipped.
    #[error("skipped line {line}: {reason}")]
    ParseSkippedLine {
        /// 1-based line number in the decoded text.
        line: usize,
        /// Why the line was rejected.
        reason: SkipReason,
    },
}

impl IniError {
    /// Build an [`IniError::IoFatal`] for a file path.
    pub(crate) fn io_at(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoFatal {
            path: Some(path.into()),
            source,
        }
    }

    /// Build an [`IniError::IoFatal`] for a caller-supplied stream.
    pub(crate) const fn io_stream(source: std::io::Error) -> Self {
        Self::IoFatal { path: None, source }
    }
}

fn display_path(path: Option<&std::path::Path>) -> String {
    path.map_or_else(|| "<stream>".to_string(), |p| p.display().to_string())
}

/// Reason a line was rejected by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The line has no `=` outside of quotes.
    MissingSeparator,
    /// The text left of `=` is blank.
    EmptyKey,
    /// A double quote was opened but never closed.
    UnterminatedQuote,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingSeparator => "no '=' separator".fmt(f),
            Self::EmptyKey => "empty key".fmt(f),
            Self::UnterminatedQuote => "unterminated quote".fmt(f),
        }
    }
}

/// A convenience `Result` alias using [`IniError`].
pub type Result<T> = std::result::Result<T, IniError>;
