//! Subcommand handlers for the `inimap` binary.
//!
//! Each handler takes the resolved [`CommandContext`], its own options and
//! the writer that receives its output.
pub mod dump;
pub mod fmt;
pub mod get;
pub mod sections;
pub mod set;

use std::path::Path;

use anyhow::{Context as _, Result};

use crate::cli::GlobalOpts;
use crate::document::{Document, LineEnding, QuotePolicy};
use crate::encoding::TextEncoding;
use crate::settings::Settings;

/// Effective settings for one command run.
///
/// Command-line options win over the settings file, which wins over the
/// built-in defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandContext {
    /// Encoding used to read files (a byte order mark still wins).
    pub encoding: TextEncoding,
    /// Line ending used when writing.
    pub line_ending: LineEnding,
    /// Quote policy used when writing.
    pub quote_policy: QuotePolicy,
}

impl CommandContext {
    /// Merge the global options with the user's settings.
    #[must_use]
    pub fn resolve(global: &GlobalOpts, settings: &Settings) -> Self {
        let ctx = Self {
            encoding: global.encoding.unwrap_or_else(|| settings.encoding()),
            line_ending: global.line_ending.unwrap_or_else(|| settings.line_ending()),
            quote_policy: global
                .quote_policy
                .unwrap_or_else(|| settings.quote_policy()),
        };
        tracing::debug!(
            "encoding: {}, line ending: {:?}, quote policy: {:?}",
            ctx.encoding,
            ctx.line_ending,
            ctx.quote_policy
        );
        ctx
    }

    /// Load `path` and apply the write settings.
    ///
    /// Skipped lines are logged as warnings.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn open(&self, path: &Path) -> Result<Document> {
        let mut doc = Document::new();
        let report = doc
            .load_file(path, self.encoding)
            .with_context(|| format!("failed to load {}", path.display()))?;
        for warning in report.warnings() {
            tracing::warn!("{}: {warning}", path.display());
        }
        if report.encoding != self.encoding {
            tracing::debug!("{}: byte order mark selects {}", path.display(), report.encoding);
        }
        Ok(doc
            .with_line_ending(self.line_ending)
            .with_quote_policy(self.quote_policy))
    }

    /// Like [`open`](Self::open), but a missing file gives an empty
    /// document in the context encoding.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read.
    pub fn open_or_new(&self, path: &Path) -> Result<Document> {
        if path.exists() {
            return self.open(path);
        }
        tracing::debug!("{} does not exist, starting empty", path.display());
        Ok(Document::new()
            .with_encoding(self.encoding)
            .with_line_ending(self.line_ending)
            .with_quote_policy(self.quote_policy))
    }
}

impl Default for CommandContext {
    fn default() -> Self {
        Self::resolve(&GlobalOpts::default(), &Settings::default())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::settings::Defaults;

    #[test]
    fn options_override_settings() {
        let settings = Settings {
            defaults: Defaults {
                encoding: "latin1".to_string(),
                line_ending: "crlf".to_string(),
                quote_policy: "strip".to_string(),
            },
        };
        let global = GlobalOpts {
            encoding: Some(TextEncoding::Ascii),
            ..GlobalOpts::default()
        };
        let ctx = CommandContext::resolve(&global, &settings);
        assert_eq!(ctx.encoding, TextEncoding::Ascii);
        assert_eq!(ctx.line_ending, LineEnding::CrLf);
        assert_eq!(ctx.quote_policy, QuotePolicy::Strip);
    }

    #[test]
    fn builtin_defaults() {
        let ctx = CommandContext::default();
        assert_eq!(ctx.encoding, TextEncoding::Utf8);
        assert_eq!(ctx.line_ending, LineEnding::Lf);
        assert_eq!(ctx.quote_policy, QuotePolicy::Preserve);
    }

    #[test]
    fn open_missing_file_fails_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.ini");
        let err = CommandContext::default().open(&path).unwrap_err();
        assert!(err.to_string().contains("missing.ini"), "{err}");
    }

    #[test]
    fn open_or_new_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = CommandContext {
            encoding: TextEncoding::Latin1,
            ..CommandContext::default()
        };
        let doc = ctx.open_or_new(&dir.path().join("new.ini")).unwrap();
        assert_eq!(doc.encoding(), TextEncoding::Latin1);
        assert_eq!(doc.catalog().item_count(), 0);
    }

    #[test]
    fn open_applies_write_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.ini");
        std::fs::write(&path, "K=\"v\"\n").unwrap();
        let ctx = CommandContext {
            line_ending: LineEnding::CrLf,
            quote_policy: QuotePolicy::Strip,
            ..CommandContext::default()
        };
        let doc = ctx.open(&path).unwrap();
        assert_eq!(doc.to_ini_string(), "K=v\r\n");
    }
}
