//! Command: rewrite a file in canonical form.
use anyhow::{Context as _, Result};

use super::CommandContext;
use crate::cli::FmtOpts;

/// Re-render `opts.file` and write it to `opts.output` (or back in place),
/// optionally converting it to another encoding.
///
/// # Errors
///
/// Returns an error if the file cannot be read or written.
pub fn run(ctx: &CommandContext, opts: &FmtOpts) -> Result<()> {
    let doc = ctx.open(&opts.file)?;
    let target = opts.output.as_deref().unwrap_or(&opts.file);
    let encoding = opts.to_encoding.unwrap_or_else(|| doc.encoding());
    doc.write_file_to(target, encoding)
        .with_context(|| format!("failed to write {}", target.display()))?;
    tracing::info!(
        "formatted {} -> {} ({encoding})",
        opts.file.display(),
        target.display()
    );
    Ok(())
}
