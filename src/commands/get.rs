//! Command: print one value.
use std::io::Write;

use anyhow::{Result, bail};

use super::CommandContext;
use crate::cli::GetOpts;

/// Print the value of `opts.key` in `opts.section`.
///
/// # Errors
///
/// Returns an error if the file cannot be read, the section or key is
/// absent, or writing to `out` fails.
pub fn run(ctx: &CommandContext, opts: &GetOpts, out: &mut impl Write) -> Result<()> {
    let doc = ctx.open(&opts.file)?;
    let Some(section) = doc.get_section(&opts.section) else {
        bail!("no section [{}] in {}", opts.section, opts.file.display());
    };
    let Some(item) = section.items().get_item(&opts.key) else {
        bail!(
            "no key '{}' in section [{}] of {}",
            opts.key,
            opts.section,
            opts.file.display()
        );
    };
    writeln!(out, "{}", item.value(opts.unquote))?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};

    fn opts(file: &Path, section: &str, key: &str, unquote: bool) -> GetOpts {
        GetOpts {
            file: PathBuf::from(file),
            section: section.to_string(),
            key: key.to_string(),
            unquote,
        }
    }

    fn sample() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.ini");
        std::fs::write(&path, "M_K1=Main Section String\n[Section1]\nTitle=\"a; b\"\n").unwrap();
        (dir, path)
    }

    #[test]
    fn prints_value_case_insensitively() {
        let (_dir, path) = sample();
        let mut out = Vec::new();
        run(&CommandContext::default(), &opts(&path, "", "m_k1", false), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Main Section String\n");
    }

    #[test]
    fn unquote_strips_one_pair() {
        let (_dir, path) = sample();
        let mut out = Vec::new();
        run(&CommandContext::default(), &opts(&path, "SECTION1", "title", true), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "a; b\n");

        let mut out = Vec::new();
        run(&CommandContext::default(), &opts(&path, "Section1", "Title", false), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "\"a; b\"\n");
    }

    #[test]
    fn missing_key_is_an_error() {
        let (_dir, path) = sample();
        let err = run(&CommandContext::default(), &opts(&path, "Section1", "Nope", false), &mut Vec::new())
            .unwrap_err();
        assert!(err.to_string().contains("Nope"), "{err}");
        assert!(run(&CommandContext::default(), &opts(&path, "Other", "K", false), &mut Vec::new()).is_err());
    }
}
