//! Scoped change of the process working directory

use std::env;
use std::path::{Path, PathBuf};

use log::{debug, error};

use crate::error::Result;

/// Changes the working directory on creation and restores the previous one
/// when dropped, including during unwinding.
#[derive(Debug)]
pub struct WorkingDirectory {
    previous: PathBuf,
}

impl WorkingDirectory {
    /// Switch into `dir`, remembering the current directory.
    pub fn enter(dir: &Path) -> Result<Self> {
        let previous = env::current_dir()?;
        env::set_current_dir(dir)?;
        debug!("Entered {} (was {})", dir.display(), previous.display());
        Ok(Self { previous })
    }

    /// The directory that will be restored on drop.
    pub fn previous(&self) -> &Path {
        &self.previous
    }
}

impl Drop for WorkingDirectory {
    fn drop(&mut self) {
        if let Err(e) = env::set_current_dir(&self.previous) {
            error!(
                "Failed to restore working directory {}: {}",
                self.previous.display(),
                e
            );
        }
    }
}

/// Make `path` absolute relative to the current directory.
pub fn absolutize(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(env::current_dir()?.join(path))
    }
}
