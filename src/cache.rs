//! On-disk cache of discovered repository lists
//!
//! The listing modes record every repository they found in a small JSON
//! document next to the mirrors:
//!
//! ```json
//! {
//!   "repositories": [
//!     { "url": "https://chromium.googlesource.com/chromium/src.git" }
//!   ]
//! }
//! ```
//!
//! Each run merges the fresh list into the existing file and rewrites it in
//! full. There is no locking; concurrent runs against the same file race.

use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One cached repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryRecord {
    pub url: String,
}

/// The cache document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoListCache {
    pub repositories: Vec<RepositoryRecord>,
}

/// URLs present on only one side of a merge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// In the previous cache but not discovered this time.
    pub only_old: Vec<String>,
    /// Discovered this time but not in the previous cache.
    pub only_new: Vec<String>,
}

impl MergeReport {
    /// Both sides of the difference, old entries first.
    pub fn symmetric_difference(&self) -> Vec<String> {
        self.only_old
            .iter()
            .chain(self.only_new.iter())
            .cloned()
            .collect()
    }

    pub fn is_unchanged(&self) -> bool {
        self.only_old.is_empty() && self.only_new.is_empty()
    }
}

impl RepoListCache {
    pub fn from_urls<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            repositories: urls
                .into_iter()
                .map(|url| RepositoryRecord { url: url.into() })
                .collect(),
        }
    }

    /// Load the cache, treating a missing or unreadable file as empty.
    pub fn load(path: &Path) -> Self {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No repository cache at {}", path.display());
                return Self::default();
            }
            Err(e) => {
                warn!(
                    "Cannot read repository cache {}, starting empty: {}",
                    path.display(),
                    e
                );
                return Self::default();
            }
        };

        match serde_json::from_str(&text) {
            Ok(cache) => cache,
            Err(e) => {
                warn!(
                    "Repository cache {} is not valid, starting empty: {}",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// All cached URLs in order.
    pub fn urls(&self) -> Vec<String> {
        self.repositories.iter().map(|r| r.url.clone()).collect()
    }

    /// Merge `fresh` into this cache.
    ///
    /// Existing records keep their position, records with a URL already
    /// present are replaced by the fresh one, and new URLs are appended.
    pub fn merge(&mut self, fresh: RepoListCache) -> MergeReport {
        let old_urls: HashSet<String> = self.repositories.iter().map(|r| r.url.clone()).collect();
        let new_urls: HashSet<String> = fresh.repositories.iter().map(|r| r.url.clone()).collect();

        let report = MergeReport {
            only_old: self
                .repositories
                .iter()
                .filter(|r| !new_urls.contains(&r.url))
                .map(|r| r.url.clone())
                .collect(),
            only_new: dedup(
                fresh
                    .repositories
                    .iter()
                    .filter(|r| !old_urls.contains(&r.url))
                    .map(|r| r.url.clone()),
            ),
        };

        for record in fresh.repositories {
            match self.repositories.iter_mut().find(|r| r.url == record.url) {
                Some(existing) => *existing = record,
                None => self.repositories.push(record),
            }
        }

        report
    }

    /// Rewrite the cache file in full.
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        fs::write(path, json).map_err(|e| Error::Cache {
            message: format!("failed to write {}: {}", path.display(), e),
        })
    }
}

/// Merge `urls` into the cache at `path`, save it, and report the difference.
pub fn update(path: &Path, urls: &[String]) -> Result<MergeReport> {
    let mut cache = RepoListCache::load(path);
    let report = cache.merge(RepoListCache::from_urls(urls.iter().cloned()));
    cache.save(path)?;

    if report.is_unchanged() {
        info!("Repository cache {} unchanged", path.display());
    } else {
        for url in &report.only_old {
            info!("No longer listed: {}", url);
        }
        for url in &report.only_new {
            info!("Newly listed: {}", url);
        }
    }
    Ok(report)
}

fn dedup(urls: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    urls.filter(|url| seen.insert(url.clone())).collect()
}
