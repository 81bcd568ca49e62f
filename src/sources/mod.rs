//! # Repository List Resolvers
//!
//! Each submodule produces the ordered list of repository URLs for one
//! invocation mode:
//!
//! - [`entries`]: a gclient `.gclient_entries` file on disk.
//! - [`listing`]: an HTML or XML directory index served by the git host,
//!   filtered to repositories that answer `git ls-remote`.
//! - [`manifest`]: the projects of a repo-tool manifest repository plus a
//!   fixed list of auxiliary repositories.
//!
//! Lists keep the order of their source. They may contain duplicates, which
//! the mirror updater handles as repeated, harmless updates.

pub mod entries;
pub mod listing;
pub mod manifest;

use crate::error::Result;

/// A source of repository URLs for one run.
pub trait RepositorySource {
    /// Produce the repository URLs to mirror, in processing order.
    fn resolve(&self) -> Result<Vec<String>>;
}
