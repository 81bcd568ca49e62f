//! CLI argument parsing and command dispatch

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands::{self, RunContext};
use gsmirror::output::OutputConfig;
use gsmirror::sources::listing::ListingFormat;

/// gsmirror - Mirror googlesource repositories onto local disk
#[derive(Parser, Debug)]
#[command(name = "gsmirror")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Directory holding the mirrors
    #[arg(
        short = 'C',
        long,
        global = true,
        value_name = "DIR",
        default_value = ".",
        env = "GSMIRROR_DIRECTORY"
    )]
    directory: PathBuf,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Mirror the repositories listed in a gclient entries file
    Entries(commands::entries::EntriesArgs),

    /// Mirror the repositories linked from the host's HTML index
    Html(commands::listing::ListingArgs),

    /// Mirror the repositories linked from the host's XML index
    Xml(commands::listing::ListingArgs),

    /// Mirror the projects of a repo manifest plus auxiliary repositories
    Manifest(commands::manifest::ManifestArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level);

        let context = RunContext {
            directory: self.directory,
            output: OutputConfig::from_env_and_flag(&self.color),
        };

        match self.command {
            Commands::Entries(args) => commands::entries::execute(args, &context),
            Commands::Html(args) => commands::listing::execute(args, ListingFormat::Html, &context),
            Commands::Xml(args) => commands::listing::execute(args, ListingFormat::Xml, &context),
            Commands::Manifest(args) => commands::manifest::execute(args, &context),
        }
    }
}

/// `RUST_LOG` takes precedence over `--log-level`.
fn init_logging(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_target(false)
        .try_init();
}
