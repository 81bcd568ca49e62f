//! # Mirror Synchronization
//!
//! `run` ties a repository source to the mirror updater:
//!
//! 1. Switch into the mirror root directory.
//! 2. Resolve the repository list. Errors here abort the run.
//! 3. Ensure a mirror for every repository, in order. Per-repository
//!    failures are logged and do not stop the run.
//! 4. Restore the previous working directory, whether or not step 2 failed.
//!
//! Progress lives entirely on disk, so an interrupted run is resumed by
//! simply running again.

use std::path::Path;

use log::info;

use crate::error::Result;
use crate::mirror::{MirrorOutcome, MirrorUpdater};
use crate::sources::RepositorySource;
use crate::workdir::WorkingDirectory;

/// Per-outcome counts of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub updated: usize,
    pub cloned: usize,
    pub replaced: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl SyncSummary {
    fn record(&mut self, outcome: &MirrorOutcome) {
        match outcome {
            MirrorOutcome::Updated => self.updated += 1,
            MirrorOutcome::Cloned => self.cloned += 1,
            MirrorOutcome::Replaced { .. } => self.replaced += 1,
            MirrorOutcome::Failed => self.failed += 1,
            MirrorOutcome::Skipped => self.skipped += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.updated + self.cloned + self.replaced + self.failed + self.skipped
    }
}

/// Mirror every repository of `source` below `directory`.
pub fn run(
    directory: &Path,
    source: &dyn RepositorySource,
    updater: &MirrorUpdater<'_>,
) -> Result<SyncSummary> {
    let _cwd = WorkingDirectory::enter(directory)?;

    let repositories = source.resolve()?;
    info!("Mirroring {} repositories", repositories.len());
    println!("Get a cup of coffee. This will take some time.");

    let mut summary = SyncSummary::default();
    for repository in &repositories {
        summary.record(&updater.ensure_mirrored(repository));
    }

    info!(
        "Done: {} updated, {} cloned, {} replaced, {} failed, {} skipped",
        summary.updated, summary.cloned, summary.replaced, summary.failed, summary.skipped
    );
    Ok(summary)
}
