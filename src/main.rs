//! # gsmirror CLI
//!
//! Binary entry point for the `gsmirror` command-line tool. It parses the
//! command line with `clap` and dispatches to the command implementations;
//! the mirroring logic itself lives in the `gsmirror` library crate.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
