//! Command: create or overwrite one value.
use anyhow::{Context as _, Result, bail};

use super::CommandContext;
use crate::cli::SetOpts;

/// Set `opts.key` in `opts.section` and save the file in its own encoding.
///
/// A missing file is created in the context encoding.
///
/// # Errors
///
/// Returns an error if the key is blank or the file cannot be read or
/// written.
pub fn run(ctx: &CommandContext, opts: &SetOpts) -> Result<()> {
    let mut doc = ctx.open_or_new(&opts.file)?;
    let stored = if opts.quoted {
        doc.set_quoted_value(&opts.section, &opts.key, &opts.value)
    } else {
        doc.set_value(&opts.section, &opts.key, &opts.value)
    };
    if !stored {
        bail!("key must not be empty");
    }
    let encoding = doc.encoding();
    doc.save(&opts.file, encoding)
        .with_context(|| format!("failed to write {}", opts.file.display()))?;
    tracing::info!("set [{}] {} in {}", opts.section, opts.key, opts.file.display());
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::encoding::TextEncoding;
    use std::path::{Path, PathBuf};

    fn opts(file: &Path, section: &str, key: &str, value: &str, quoted: bool) -> SetOpts {
        SetOpts {
            file: PathBuf::from(file),
            section: section.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            quoted,
        }
    }

    #[test]
    fn overwrites_existing_value_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.ini");
        std::fs::write(&path, "[S]\nA=1\nB=2\n").unwrap();

        run(&CommandContext::default(), &opts(&path, "s", "a", "9", false)).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[S]\nA=9\nB=2\n");
    }

    #[test]
    fn creates_file_and_section() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("new.ini");

        run(&CommandContext::default(), &opts(&path, "Net", "Motto", "a; b", true)).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[Net]\nMotto=\"a; b\"\n");
    }

    #[test]
    fn keeps_utf16_encoding_of_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wide.ini");
        std::fs::write(&path, TextEncoding::Utf16Le.encode("K=1\n")).unwrap();

        run(&CommandContext::default(), &opts(&path, "", "K", "2", false)).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(TextEncoding::sniff(&bytes), Some(TextEncoding::Utf16Le));
        assert_eq!(TextEncoding::Utf16Le.decode(&bytes), "K=2\n");
    }

    #[test]
    fn blank_key_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.ini");
        assert!(run(&CommandContext::default(), &opts(&path, "", "  ", "v", false)).is_err());
        assert!(!path.exists());
    }
}
