//! Command-line entry point for the `inimap` INI tool.

use anyhow::Result;
use clap::Parser;

use inimap::cli::{Cli, Command};
use inimap::commands::{self, CommandContext};
use inimap::logging;
use inimap::settings::Settings;

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();
    logging::init_subscriber(args.verbose);

    let ctx = CommandContext::resolve(&args.global, &Settings::load());
    let mut out = std::io::stdout().lock();

    match args.command {
        Command::Get(opts) => commands::get::run(&ctx, &opts, &mut out),
        Command::Set(opts) => commands::set::run(&ctx, &opts),
        Command::Sections(opts) => commands::sections::run(&ctx, &opts, &mut out),
        Command::Dump(opts) => commands::dump::run(&ctx, &opts, &mut out),
        Command::Fmt(opts) => commands::fmt::run(&ctx, &opts),
    }
}
