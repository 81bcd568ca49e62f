//! Entries command implementation
//!
//! Mirrors every repository of a gclient `.gclient_entries` file except the
//! primary `src` checkout.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use super::{print_summary, RunContext};
use gsmirror::mirror::{DefaultGitOperations, MirrorUpdater};
use gsmirror::sources::entries::EntriesFileSource;
use gsmirror::{sync, workdir};

/// Arguments for the entries command
#[derive(Args, Debug)]
pub struct EntriesArgs {
    /// The `.gclient_entries` file of a gclient checkout
    #[arg(value_name = "FILE")]
    pub entries_file: PathBuf,
}

/// Execute the entries command
pub fn execute(args: EntriesArgs, context: &RunContext) -> Result<()> {
    // resolved before the run switches into the mirror directory
    let entries_file = workdir::absolutize(&args.entries_file)?;

    let git = DefaultGitOperations;
    let updater = MirrorUpdater::new(&git, context.output.clone());
    let source = EntriesFileSource::new(entries_file);

    let summary = sync::run(&context.directory, &source, &updater).with_context(|| {
        format!(
            "Failed to mirror repositories from {}",
            args.entries_file.display()
        )
    })?;
    print_summary(context, &summary);
    Ok(())
}
