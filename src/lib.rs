//! # gsmirror
//!
//! Keeps local bare mirrors of the repositories hosted on a googlesource-style
//! git host. Point git at the mirrors with
//!
//! ```text
//! git config --global url.<path/to/mirrors/>.insteadOf https://chromium.googlesource.com/
//! ```
//!
//! and every clone or fetch of a mirrored repository is served locally.
//!
//! ## Quick Example
//!
//! ```
//! use gsmirror::reference::RepositoryReference;
//! use std::path::PathBuf;
//!
//! let reference = RepositoryReference::parse(
//!     "https://chromium.googlesource.com/chromium/src.git@4f2a1c",
//! );
//! assert_eq!(reference.url(), "https://chromium.googlesource.com/chromium/src.git");
//! assert_eq!(reference.relative_path().unwrap(), PathBuf::from("chromium/src.git"));
//! ```
//!
//! ## Core Concepts
//!
//! - **Sources (`sources`)**: produce the list of repositories to mirror from
//!   a gclient entries file, the host's HTML or XML directory index, or a
//!   repo-tool manifest repository.
//! - **Mirror updater (`mirror`)**: updates an existing mirror, or clones a
//!   new one after moving any stale occupant of the path aside.
//! - **Cache (`cache`)**: remembers the repositories discovered from the
//!   directory index.
//! - **Synchronization (`sync`)**: runs a source and the updater inside the
//!   mirror root directory.
//!
//! All git work is delegated to the system `git` binary.

pub mod cache;
pub mod defaults;
pub mod error;
pub mod git;
pub mod mirror;
pub mod output;
pub mod reference;
pub mod sources;
pub mod sync;
pub mod workdir;

#[cfg(test)]
mod reference_proptest;
