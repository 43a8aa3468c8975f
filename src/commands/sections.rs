//! Command: list section names.
use std::io::Write;

use anyhow::Result;

use super::CommandContext;
use crate::cli::FileOpts;

/// Print one section name per line in file order.
///
/// The main section is listed as `[]` when it holds items.
///
/// # Errors
///
/// Returns an error if the file cannot be read or writing to `out` fails.
pub fn run(ctx: &CommandContext, opts: &FileOpts, out: &mut impl Write) -> Result<()> {
    let doc = ctx.open(&opts.file)?;
    for section in doc.catalog().sections() {
        if section.is_main() && section.items().is_empty() {
            continue;
        }
        writeln!(out, "[{}]", section.name())?;
    }
    Ok(())
}
