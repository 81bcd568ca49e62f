//! Manifest command implementation
//!
//! Mirrors the projects of a repo-tool manifest repository together with the
//! auxiliary repositories the manifest does not declare. Failing to clone or
//! pull the manifest aborts the command.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use super::{print_summary, RunContext};
use gsmirror::defaults::{default_manifest_dir, DEFAULT_HOST, DEFAULT_MANIFEST_URL};
use gsmirror::mirror::{DefaultGitOperations, MirrorUpdater};
use gsmirror::sources::manifest::ManifestRepositorySource;
use gsmirror::{sync, workdir};

/// Arguments for the manifest command
#[derive(Args, Debug)]
pub struct ManifestArgs {
    /// Repository containing default.xml
    #[arg(long, value_name = "URL", default_value = DEFAULT_MANIFEST_URL)]
    pub manifest_url: String,

    /// Host the manifest projects are cloned from
    #[arg(long, value_name = "URL", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Where the manifest repository is checked out
    ///
    /// Defaults to a directory under the system temporary directory.
    #[arg(long, value_name = "DIR")]
    pub scratch_dir: Option<PathBuf>,
}

/// Execute the manifest command
pub fn execute(args: ManifestArgs, context: &RunContext) -> Result<()> {
    let scratch_dir = match args.scratch_dir {
        Some(dir) => workdir::absolutize(&dir)?,
        None => default_manifest_dir(),
    };

    let git = DefaultGitOperations;
    let updater = MirrorUpdater::new(&git, context.output.clone());
    let source = ManifestRepositorySource::new(&args.manifest_url, &args.host, scratch_dir, &git);

    let summary = sync::run(&context.directory, &source, &updater)
        .with_context(|| format!("Failed to mirror projects of {}", args.manifest_url))?;
    print_summary(context, &summary);
    Ok(())
}
