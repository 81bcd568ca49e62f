//! Repository references and their local mirror paths
//!
//! A reference is a repository URL as it appears in a dependency file,
//! optionally pinned to a revision (`https://host/a/b.git@deadbeef`). The
//! revision is irrelevant for mirroring, which always fetches everything, so
//! it is dropped when the reference is parsed.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// A repository URL with any revision marker removed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryReference {
    url: String,
    revision: Option<String>,
}

impl RepositoryReference {
    /// Parse a dependency source string, splitting off a trailing `@revision`.
    ///
    /// The marker is the first `@` inside the repository path. An `@` that
    /// belongs to the host part (`https://user@host/...`, `git@host:repo`)
    /// is kept.
    pub fn parse(source: &str) -> Self {
        let source = source.trim();
        let path_start = path_start(source);
        match source[path_start..].find('@') {
            Some(offset) => {
                let at = path_start + offset;
                Self {
                    url: source[..at].to_string(),
                    revision: Some(source[at + 1..].to_string()).filter(|r| !r.is_empty()),
                }
            }
            None => Self {
                url: source.to_string(),
                revision: None,
            },
        }
    }

    /// The URL to clone from.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The revision marker that was stripped, if any.
    pub fn revision(&self) -> Option<&str> {
        self.revision.as_deref()
    }

    /// Local directory of the mirror, relative to the mirror root.
    ///
    /// The scheme and host fields are dropped: `https://host/a/b.git` maps to
    /// `a/b.git`. Paths that would escape the mirror root are rejected.
    pub fn relative_path(&self) -> Result<PathBuf> {
        let trimmed = self.url.trim_end_matches('/');
        let segments: Vec<&str> = trimmed.split('/').skip(3).collect();

        if segments.is_empty() {
            return Err(self.invalid("URL has no repository path after the host"));
        }
        if let Some(bad) = segments
            .iter()
            .find(|s| s.is_empty() || **s == "." || **s == "..")
        {
            return Err(self.invalid(&format!("unsupported path segment {:?}", bad)));
        }

        let path: PathBuf = segments.iter().collect();
        if !path.components().all(|c| matches!(c, Component::Normal(_))) {
            return Err(self.invalid("path is not relative"));
        }
        Ok(path)
    }

    fn invalid(&self, message: &str) -> Error {
        Error::InvalidReference {
            url: self.url.clone(),
            message: message.to_string(),
        }
    }
}

impl fmt::Display for RepositoryReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

/// Byte offset where the repository path begins.
fn path_start(source: &str) -> usize {
    if let Some(scheme_end) = source.find("://") {
        let host_start = scheme_end + 3;
        return source[host_start..]
            .find('/')
            .map(|slash| host_start + slash + 1)
            .unwrap_or(source.len());
    }
    // scp-like `user@host:path`
    source.find(':').map(|colon| colon + 1).unwrap_or(0)
}

/// Final component of a mirror path, used when naming clones and backups.
pub fn basename(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
