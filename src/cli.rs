//! Command-line interface definitions.
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::document::{LineEnding, QuotePolicy};
use crate::encoding::TextEncoding;

/// Top-level CLI entry point for the INI engine.
#[derive(Parser, Debug)]
#[command(
    name = "inimap",
    about = "Read, edit and re-encode INI files",
    version
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared across all subcommands.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
///
/// Unset options fall back to the settings file, then to built-in defaults.
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Encoding used to read (and by default write) files
    #[arg(short, long, global = true, value_enum)]
    pub encoding: Option<TextEncoding>,

    /// Line ending used when writing
    #[arg(long, global = true, value_enum)]
    pub line_ending: Option<LineEnding>,

    /// How stored quotes are treated when writing
    #[arg(long, global = true, value_enum)]
    pub quote_policy: Option<QuotePolicy>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print one value
    Get(GetOpts),
    /// Create or overwrite one value and save the file (comment-only and
    /// blank lines are not kept)
    Set(SetOpts),
    /// List section names
    Sections(FileOpts),
    /// Print the whole catalog
    Dump(DumpOpts),
    /// Rewrite a file in canonical form
    Fmt(FmtOpts),
}

/// A single INI file argument.
#[derive(Parser, Debug, Clone)]
pub struct FileOpts {
    /// INI file to read
    pub file: PathBuf,
}

/// Options for the `get` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct GetOpts {
    /// INI file to read
    pub file: PathBuf,
    /// Section name (use "" for the main section)
    pub section: String,
    /// Item key
    pub key: String,
    /// Strip one pair of surrounding double quotes
    #[arg(short, long)]
    pub unquote: bool,
}

/// Options for the `set` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct SetOpts {
    /// INI file to update (created if missing)
    pub file: PathBuf,
    /// Section name (use "" for the main section)
    pub section: String,
    /// Item key
    pub key: String,
    /// New value
    pub value: String,
    /// Store the value wrapped in double quotes
    #[arg(short, long)]
    pub quoted: bool,
}

/// Options for the `dump` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct DumpOpts {
    /// INI file to read
    pub file: PathBuf,
    /// Print JSON instead of INI text
    #[arg(long)]
    pub json: bool,
}

/// Options for the `fmt` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct FmtOpts {
    /// INI file to read
    pub file: PathBuf,
    /// Write here instead of overwriting the input
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Encoding of the written file (defaults to the read encoding)
    #[arg(long, value_enum)]
    pub to_encoding: Option<TextEncoding>,
}
