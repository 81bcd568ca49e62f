//! # CLI Command Implementations
//!
//! One module per repository source. Each module contains an `Args` struct
//! derived with `clap` and an `execute` function that builds the source and
//! hands it to `gsmirror::sync::run`.

pub mod entries;
pub mod listing;
pub mod manifest;

use std::path::PathBuf;

use gsmirror::output::OutputConfig;
use gsmirror::sync::SyncSummary;

/// Settings shared by every command.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Mirror root; the working directory for the duration of the run.
    pub directory: PathBuf,
    pub output: OutputConfig,
}

/// Print the end-of-run totals.
pub fn print_summary(context: &RunContext, summary: &SyncSummary) {
    println!(
        "{} {} repositories: {} updated, {} cloned, {} replaced, {} failed, {} skipped",
        context.output.marker("🏁", "Done:"),
        summary.total(),
        summary.updated,
        summary.cloned,
        summary.replaced,
        summary.failed,
        summary.skipped
    );
}
