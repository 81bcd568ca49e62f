//! # Mirror Updater
//!
//! This module makes sure a bare mirror of one repository exists on disk.
//! For every reference exactly one of three things happens:
//!
//! 1. **Update**: the mirror directory exists and `git remote update`
//!    succeeds. Nothing else is done.
//! 2. **Clone**: the directory is missing, or the update failed. Parent
//!    directories are created and a fresh `git clone --mirror` is made.
//! 3. **Replace**: before cloning, whatever still occupies the mirror path
//!    (a broken mirror, a stray checkout, a file) is renamed next to itself
//!    as `<name>.<timestamp>.bak`, so nothing is ever deleted.
//!
//! Failures are per entry: they are logged and reported as
//! [`MirrorOutcome::Failed`] or [`MirrorOutcome::Skipped`], and the caller
//! moves on to the next repository.
//!
//! ## Design
//!
//! Git access goes through the [`GitOperations`] trait. The binary uses
//! [`DefaultGitOperations`], which runs the system `git`; tests substitute a
//! mock that simulates mirrors on a temporary filesystem.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use console::Style;
use log::{error, info, warn};

use crate::error::Result;
use crate::git::GitStatus;
use crate::output::OutputConfig;
use crate::reference::{basename, RepositoryReference};

/// Trait for git operations - allows mocking in tests
pub trait GitOperations {
    /// Fetch all remotes of an existing mirror.
    fn remote_update(&self, repo_dir: &Path) -> Result<GitStatus>;

    /// Probe whether a remote repository exists.
    fn ls_remote(&self, url: &str) -> Result<GitStatus>;

    /// Clone `url` as a bare mirror named `name` inside `parent_dir`.
    fn clone_mirror(&self, url: &str, parent_dir: &Path, name: &str) -> Result<GitStatus>;

    /// Clone `url` as a regular checkout into `target_dir`.
    fn clone(&self, url: &str, target_dir: &Path) -> Result<GitStatus>;

    /// Pull the current branch of a checkout.
    fn pull(&self, repo_dir: &Path) -> Result<GitStatus>;
}

/// The default implementation of `GitOperations`, which uses the system's
/// `git` command.
pub struct DefaultGitOperations;

impl GitOperations for DefaultGitOperations {
    fn remote_update(&self, repo_dir: &Path) -> Result<GitStatus> {
        crate::git::remote_update(repo_dir)
    }

    fn ls_remote(&self, url: &str) -> Result<GitStatus> {
        crate::git::ls_remote(url)
    }

    fn clone_mirror(&self, url: &str, parent_dir: &Path, name: &str) -> Result<GitStatus> {
        crate::git::clone_mirror(url, parent_dir, name)
    }

    fn clone(&self, url: &str, target_dir: &Path) -> Result<GitStatus> {
        crate::git::clone(url, target_dir)
    }

    fn pull(&self, repo_dir: &Path) -> Result<GitStatus> {
        crate::git::pull(repo_dir)
    }
}

/// What happened to a single repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MirrorOutcome {
    /// An existing mirror was updated in place.
    Updated,
    /// A new mirror was cloned into a free path.
    Cloned,
    /// The previous occupant was moved to `backup` and a new mirror cloned.
    Replaced { backup: PathBuf },
    /// A git command or filesystem operation failed.
    Failed,
    /// The reference could not be mapped to a mirror path.
    Skipped,
}

impl MirrorOutcome {
    /// Status-line marker: emoji and its plain-text stand-in.
    fn marker(&self) -> (&'static str, &'static str) {
        match self {
            MirrorOutcome::Updated => ("✅", "[OK]"),
            MirrorOutcome::Cloned => ("📥", "[NEW]"),
            MirrorOutcome::Replaced { .. } => ("♻️", "[NEW]"),
            MirrorOutcome::Failed => ("❌", "[FAIL]"),
            MirrorOutcome::Skipped => ("⏭️", "[SKIP]"),
        }
    }

    fn label(&self) -> String {
        match self {
            MirrorOutcome::Updated => "updated".to_string(),
            MirrorOutcome::Cloned => "cloned".to_string(),
            MirrorOutcome::Replaced { backup } => {
                format!("cloned, previous content moved to {}", backup.display())
            }
            MirrorOutcome::Failed => "failed".to_string(),
            MirrorOutcome::Skipped => "skipped".to_string(),
        }
    }

    fn style(&self) -> Style {
        match self {
            MirrorOutcome::Failed | MirrorOutcome::Skipped => Style::new().red(),
            _ => Style::new().green(),
        }
    }
}

/// Brings local mirrors up to date, one reference at a time.
pub struct MirrorUpdater<'a> {
    git: &'a dyn GitOperations,
    output: OutputConfig,
}

impl<'a> MirrorUpdater<'a> {
    pub fn new(git: &'a dyn GitOperations, output: OutputConfig) -> Self {
        Self { git, output }
    }

    /// Ensure a mirror of `source` exists below the current directory.
    ///
    /// `source` may carry an `@revision` suffix, which is ignored. This never
    /// fails; problems are logged and reported through the outcome.
    pub fn ensure_mirrored(&self, source: &str) -> MirrorOutcome {
        let reference = RepositoryReference::parse(source);
        println!("repo: {}", reference);

        let path = match reference.relative_path() {
            Ok(path) => path,
            Err(e) => {
                warn!("Skipping {}: {}", source, e);
                self.report(&MirrorOutcome::Skipped, Path::new(source));
                return MirrorOutcome::Skipped;
            }
        };

        let outcome = match self.mirror(&reference, &path) {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Failed to mirror {}: {}", reference, e);
                MirrorOutcome::Failed
            }
        };
        self.report(&outcome, &path);
        outcome
    }

    fn mirror(&self, reference: &RepositoryReference, path: &Path) -> Result<MirrorOutcome> {
        if path.is_dir() {
            let status = self.git.remote_update(path)?;
            if status.success() {
                return Ok(MirrorOutcome::Updated);
            }
            info!(
                "Update of {} failed ({}), cloning a fresh mirror",
                path.display(),
                status
            );
        }

        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)?;

        let name = basename(path);
        let backup = if fs::symlink_metadata(path).is_ok() {
            Some(move_aside(path, parent, &name)?)
        } else {
            None
        };

        let status = self.git.clone_mirror(reference.url(), parent, &name)?;
        if !status.success() {
            warn!("Mirror clone of {} exited with {}", reference, status);
            return Ok(MirrorOutcome::Failed);
        }

        Ok(match backup {
            Some(backup) => MirrorOutcome::Replaced { backup },
            None => MirrorOutcome::Cloned,
        })
    }

    fn report(&self, outcome: &MirrorOutcome, path: &Path) {
        let (emoji, text) = outcome.marker();
        println!(
            "{} {}: {}",
            self.output.marker(emoji, text),
            path.display(),
            self.output.style(outcome.style()).apply_to(outcome.label())
        );
    }
}

/// Rename `path` to `<name>.<timestamp>.bak` inside `parent`.
fn move_aside(path: &Path, parent: &Path, name: &str) -> Result<PathBuf> {
    let stamp = Local::now().format("%Y-%m-%dT%H:%M:%S%.6f");
    let backup = parent.join(format!("{}.{}.bak", name, stamp));
    fs::rename(path, &backup)?;
    warn!("Moved {} aside to {}", path.display(), backup.display());
    Ok(backup)
}


#[cfg(test)]
mod tests {
    use super::mock::MockGit;
    use super::*;
    use crate::workdir::WorkingDirectory;
    use serial_test::serial;
    use tempfile::TempDir;

    const SRC: &str = "https://chromium.googlesource.com/chromium/src.git";

    fn updater(git: &MockGit) -> MirrorUpdater<'_> {
        MirrorUpdater::new(git, OutputConfig::plain())
    }

    fn backups(dir: &Path) -> Vec<String> {
        fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|n| n.ends_with(".bak"))
            .collect()
    }

    #[test]
    #[serial]
    fn test_clone_when_absent() {
        let temp = TempDir::new().unwrap();
        let _cwd = WorkingDirectory::enter(temp.path()).unwrap();
        let git = MockGit::default();

        let outcome = updater(&git).ensure_mirrored(SRC);

        assert_eq!(outcome, MirrorOutcome::Cloned);
        assert_eq!(git.count("remote update"), 0);
        assert_eq!(git.calls(), vec![format!("clone --mirror {} chromium/src.git", SRC)]);
        assert!(temp.path().join("chromium/src.git/HEAD").is_file());
    }

    #[test]
    #[serial]
    fn test_revision_is_not_passed_to_clone() {
        let temp = TempDir::new().unwrap();
        let _cwd = WorkingDirectory::enter(temp.path()).unwrap();
        let git = MockGit::default();

        updater(&git).ensure_mirrored(&format!("{}@deadbeef", SRC));

        assert_eq!(git.calls(), vec![format!("clone --mirror {} chromium/src.git", SRC)]);
    }

    #[test]
    #[serial]
    fn test_top_level_repository_clones_into_current_dir() {
        let temp = TempDir::new().unwrap();
        let _cwd = WorkingDirectory::enter(temp.path()).unwrap();
        let git = MockGit::default();

        let outcome = updater(&git).ensure_mirrored("https://host/tools.git");

        assert_eq!(outcome, MirrorOutcome::Cloned);
        assert_eq!(git.calls(), vec!["clone --mirror https://host/tools.git ./tools.git"]);
        assert!(temp.path().join("tools.git/HEAD").is_file());
    }

    #[test]
    #[serial]
    fn test_second_run_only_updates() {
        let temp = TempDir::new().unwrap();
        let _cwd = WorkingDirectory::enter(temp.path()).unwrap();
        let git = MockGit::default();
        let updater = updater(&git);

        assert_eq!(updater.ensure_mirrored(SRC), MirrorOutcome::Cloned);
        assert_eq!(updater.ensure_mirrored(SRC), MirrorOutcome::Updated);

        assert_eq!(git.count("clone"), 1);
        assert_eq!(git.count("remote update"), 1);
        assert!(backups(&temp.path().join("chromium")).is_empty());
    }

    #[test]
    #[serial]
    fn test_invalid_mirror_is_moved_aside() {
        let temp = TempDir::new().unwrap();
        let _cwd = WorkingDirectory::enter(temp.path()).unwrap();
        let stale = temp.path().join("chromium/src.git");
        fs::create_dir_all(&stale).unwrap();
        fs::write(stale.join("README"), "not a mirror").unwrap();
        let git = MockGit::default();

        let outcome = updater(&git).ensure_mirrored(SRC);

        let backup = match outcome {
            MirrorOutcome::Replaced { backup } => backup,
            other => panic!("expected Replaced, got {:?}", other),
        };
        let backup_name = basename(&backup);
        assert!(backup_name.starts_with("src.git."));
        assert!(backup_name.ends_with(".bak"));
        assert!(backup_name.contains('T'), "no timestamp in {}", backup_name);
        assert!(temp.path().join("chromium").join(&backup_name).join("README").is_file());

        assert_eq!(git.count("remote update"), 1);
        assert_eq!(git.count("clone --mirror"), 1);
        assert!(stale.join("HEAD").is_file());
        assert!(!stale.join("README").exists());
    }

    #[test]
    #[serial]
    fn test_file_in_the_way_is_moved_aside_without_update() {
        let temp = TempDir::new().unwrap();
        let _cwd = WorkingDirectory::enter(temp.path()).unwrap();
        fs::create_dir_all(temp.path().join("chromium")).unwrap();
        fs::write(temp.path().join("chromium/src.git"), "junk").unwrap();
        let git = MockGit::default();

        let outcome = updater(&git).ensure_mirrored(SRC);

        assert!(matches!(outcome, MirrorOutcome::Replaced { .. }));
        assert_eq!(git.count("remote update"), 0);
        assert_eq!(backups(&temp.path().join("chromium")).len(), 1);
    }

    #[test]
    #[serial]
    fn test_repeated_failures_create_distinct_backups() {
        let temp = TempDir::new().unwrap();
        let _cwd = WorkingDirectory::enter(temp.path()).unwrap();
        let git = MockGit {
            failing_clones: [SRC.to_string()].into_iter().collect(),
            ..Default::default()
        };
        let updater = updater(&git);
        fs::create_dir_all(temp.path().join("chromium/src.git")).unwrap();

        assert_eq!(updater.ensure_mirrored(SRC), MirrorOutcome::Failed);
        fs::create_dir_all(temp.path().join("chromium/src.git")).unwrap();
        assert_eq!(updater.ensure_mirrored(SRC), MirrorOutcome::Failed);

        assert_eq!(backups(&temp.path().join("chromium")).len(), 2);
    }

    #[test]
    #[serial]
    fn test_failed_clone_is_reported_not_raised() {
        let temp = TempDir::new().unwrap();
        let _cwd = WorkingDirectory::enter(temp.path()).unwrap();
        let git = MockGit {
            failing_clones: [SRC.to_string()].into_iter().collect(),
            ..Default::default()
        };

        assert_eq!(updater(&git).ensure_mirrored(SRC), MirrorOutcome::Failed);
        assert!(!temp.path().join("chromium/src.git").exists());
        // parent directories are created before cloning
        assert!(temp.path().join("chromium").is_dir());
    }

    #[test]
    #[serial]
    fn test_missing_git_binary_fails_entry() {
        let temp = TempDir::new().unwrap();
        let _cwd = WorkingDirectory::enter(temp.path()).unwrap();
        let git = MockGit {
            missing_binary: true,
            ..Default::default()
        };

        assert_eq!(updater(&git).ensure_mirrored(SRC), MirrorOutcome::Failed);
    }

    #[test]
    fn test_reference_without_path_is_skipped() {
        let git = MockGit::default();
        assert_eq!(
            updater(&git).ensure_mirrored("https://chromium.googlesource.com"),
            MirrorOutcome::Skipped
        );
        assert!(git.calls().is_empty());
    }

    #[test]
    fn test_outcome_status_line_parts() {
        let replaced = MirrorOutcome::Replaced {
            backup: PathBuf::from("v8/v8.git.2024-01-01T00:00:00.000000.bak"),
        };
        assert_eq!(replaced.marker().1, "[NEW]");
        assert_eq!(
            replaced.label(),
            "cloned, previous content moved to v8/v8.git.2024-01-01T00:00:00.000000.bak"
        );
        assert_eq!(MirrorOutcome::Failed.marker(), ("❌", "[FAIL]"));
        let failed = OutputConfig::plain().style(MirrorOutcome::Failed.style());
        assert_eq!(failed.apply_to(MirrorOutcome::Failed.label()).to_string(), "failed");
    }
}
