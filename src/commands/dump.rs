//! Command: print the whole catalog.
use std::io::Write;

use anyhow::Result;

use super::CommandContext;
use crate::cli::DumpOpts;

/// Print the document as INI text, or as JSON with `--json`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or writing to `out` fails.
pub fn run(ctx: &CommandContext, opts: &DumpOpts, out: &mut impl Write) -> Result<()> {
    let doc = ctx.open(&opts.file)?;
    if opts.json {
        serde_json::to_writer_pretty(&mut *out, doc.catalog())?;
        writeln!(out)?;
    } else {
        write!(out, "{doc}")?;
    }
    Ok(())
}
