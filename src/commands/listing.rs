//! Html and xml command implementation
//!
//! Both commands discover repositories from the host's directory index and
//! differ only in the index format. The discovered list is merged into a
//! JSON cache file inside the mirror directory; `--from-cache` replays that
//! file without contacting the index.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use url::Url;

use super::{print_summary, RunContext};
use gsmirror::defaults::{DEFAULT_CACHE_FILE, DEFAULT_HOST};
use gsmirror::mirror::{DefaultGitOperations, MirrorUpdater};
use gsmirror::sources::listing::{HttpFetcher, ListingFormat, RemoteListingSource};
use gsmirror::sync;

/// Arguments for the html and xml commands
#[derive(Args, Debug)]
pub struct ListingArgs {
    /// Repository list cache, relative to the mirror directory
    #[arg(value_name = "CACHE_FILE", default_value = DEFAULT_CACHE_FILE)]
    pub cache_file: PathBuf,

    /// Directory index to discover repositories from
    #[arg(long, value_name = "URL", default_value = DEFAULT_HOST)]
    pub base_url: Url,

    /// Mirror the repositories in the cache file without fetching the index
    #[arg(long)]
    pub from_cache: bool,
}

/// Execute the html or xml command
pub fn execute(args: ListingArgs, format: ListingFormat, context: &RunContext) -> Result<()> {
    let git = DefaultGitOperations;
    let fetcher = HttpFetcher::new().context("Failed to set up HTTP client")?;
    let updater = MirrorUpdater::new(&git, context.output.clone());
    let source = RemoteListingSource::new(
        args.base_url.clone(),
        format,
        &args.cache_file,
        &fetcher,
        &git,
    )
    .from_cache(args.from_cache);

    let summary = sync::run(&context.directory, &source, &updater)
        .with_context(|| format!("Failed to mirror repositories listed at {}", args.base_url))?;
    print_summary(context, &summary);
    Ok(())
}
