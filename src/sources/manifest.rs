//! Repositories declared by a repo-tool manifest
//!
//! The manifest repository is kept as a regular checkout in a scratch
//! directory. Each run clones it if missing or pulls it otherwise, then reads
//! the `<project name="...">` declarations of its `default.xml`:
//!
//! ```xml
//! <manifest>
//!   <remote name="cros" fetch="https://chromium.googlesource.com" />
//!   <project name="chromiumos/platform2" path="src/platform2" />
//! </manifest>
//! ```
//!
//! Every project becomes `<host>/<name>.git`. A fixed list of auxiliary
//! repositories that the manifest does not declare is appended.
//!
//! Failing to obtain the manifest is fatal: without it there is nothing
//! meaningful to mirror.

use std::fs;
use std::path::PathBuf;

use log::info;
use xot::Xot;

use super::RepositorySource;
use crate::defaults::{MANIFEST_FILE, SUPPLEMENTAL_REPOSITORIES};
use crate::error::{Error, Result};
use crate::mirror::GitOperations;

/// Projects of a manifest repository plus the supplemental repositories.
pub struct ManifestRepositorySource<'a> {
    manifest_url: String,
    host: String,
    checkout_dir: PathBuf,
    git: &'a dyn GitOperations,
}

impl<'a> ManifestRepositorySource<'a> {
    pub fn new(
        manifest_url: impl Into<String>,
        host: impl Into<String>,
        checkout_dir: impl Into<PathBuf>,
        git: &'a dyn GitOperations,
    ) -> Self {
        Self {
            manifest_url: manifest_url.into(),
            host: host.into(),
            checkout_dir: checkout_dir.into(),
            git,
        }
    }

    /// Clone the manifest repository, or pull it when already present.
    fn refresh_checkout(&self) -> Result<()> {
        let status = if self.checkout_dir.is_dir() {
            info!("Updating manifest checkout {}", self.checkout_dir.display());
            self.git.pull(&self.checkout_dir)?
        } else {
            info!(
                "Cloning manifest {} into {}",
                self.manifest_url,
                self.checkout_dir.display()
            );
            self.git.clone(&self.manifest_url, &self.checkout_dir)?
        };

        if !status.success() {
            return Err(Error::ManifestFetch {
                url: self.manifest_url.clone(),
                command: status.command,
                code: status.code,
            });
        }
        Ok(())
    }
}

impl RepositorySource for ManifestRepositorySource<'_> {
    fn resolve(&self) -> Result<Vec<String>> {
        self.refresh_checkout()?;

        let manifest_path = self.checkout_dir.join(MANIFEST_FILE);
        let text = fs::read_to_string(&manifest_path)?;
        let projects = parse_projects(&text)?;
        info!(
            "{} declares {} projects",
            manifest_path.display(),
            projects.len()
        );

        let mut urls: Vec<String> = projects
            .iter()
            .map(|name| project_url(&self.host, name))
            .collect();
        urls.extend(SUPPLEMENTAL_REPOSITORIES.iter().map(|url| url.to_string()));
        Ok(urls)
    }
}

/// Names of all `<project>` elements, in document order.
pub fn parse_projects(document: &str) -> Result<Vec<String>> {
    let mut xot = Xot::new();
    let root = xot.parse(document).map_err(|e| Error::Xml {
        source_name: MANIFEST_FILE.to_string(),
        message: e.to_string(),
    })?;

    let (Some(project), Some(name)) = (xot.name("project"), xot.name("name")) else {
        return Ok(Vec::new());
    };

    let mut projects = Vec::new();
    for node in xot.descendants(root) {
        let is_project = xot.element(node).is_some_and(|e| e.name() == project);
        if !is_project {
            continue;
        }
        if let Some(value) = xot.get_attribute(node, name) {
            projects.push(value.to_string());
        }
    }
    Ok(projects)
}

/// Clone URL of a manifest project on `host`.
pub fn project_url(host: &str, name: &str) -> String {
    let name = name.trim_matches('/');
    let suffix = if name.ends_with(".git") { "" } else { ".git" };
    format!("{}/{}{}", host.trim_end_matches('/'), name, suffix)
}
