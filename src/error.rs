//! # Error Handling
//!
//! This module defines the error type shared by the `gsmirror` library. It
//! uses `thiserror` to build a single `Error` enum with descriptive messages.
//!
//! Errors fall into two groups:
//!
//! - **Per-entry failures** (`InvalidReference`, `GitSpawn`) are reported by
//!   the mirror updater and logged; the run continues with the next
//!   repository.
//! - **Run-level failures** (`ManifestFetch`, `EntriesParse`, `Http`, ...)
//!   propagate out of `sync::run` and abort the whole run.
//!
//! The `Result` type alias is used throughout the crate.

use thiserror::Error;

/// Main error type for gsmirror operations
#[derive(Error, Debug)]
pub enum Error {
    /// The dependency entries file could not be parsed.
    #[error("Entries file parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    EntriesParse {
        message: String,
        /// Optional hint for how to fix the entries file
        hint: Option<String>,
    },

    /// A repository URL could not be mapped to a local mirror path.
    #[error("Invalid repository reference {url}: {message}")]
    InvalidReference { url: String, message: String },

    /// The `git` executable could not be started.
    #[error("Failed to run `{command}`: {message}")]
    GitSpawn { command: String, message: String },

    /// The manifest repository could not be cloned or refreshed.
    #[error("Failed to fetch manifest repository {url}: `{command}` exited with {}", code.map(|c| c.to_string()).unwrap_or_else(|| "a signal".to_string()))]
    ManifestFetch {
        url: String,
        command: String,
        code: Option<i32>,
    },

    /// The repository list cache could not be written.
    #[error("Cache operation error: {message}")]
    Cache { message: String },

    /// An XML document (directory listing or manifest) could not be parsed.
    #[error("XML parsing error in {source_name}: {message}")]
    Xml {
        source_name: String,
        message: String,
    },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON error, wrapped from `serde_json::Error`.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A regular expression error, wrapped from `regex::Error`.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// An HTTP error while fetching a directory listing.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
