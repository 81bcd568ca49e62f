//! Shared test utilities for the CLI E2E tests.
//!
//! Add `mod common;` to a test file and `use common::prelude::*;`.

use std::path::{Path, PathBuf};
use std::process::Command;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::{file_url, init_bare_repo, write_entries};
}

/// Create an empty bare repository at `parent/name` and return its path.
#[allow(dead_code)]
pub fn init_bare_repo(parent: &Path, name: &str) -> PathBuf {
    let path = parent.join(name);
    let status = Command::new("git")
        .args(["init", "--quiet", "--bare"])
        .arg(&path)
        .status()
        .expect("git must be installed for integration tests");
    assert!(status.success(), "git init failed for {}", path.display());
    path
}

/// `file://` URL of a local repository.
#[allow(dead_code)]
pub fn file_url(path: &Path) -> String {
    format!("file://{}", path.display())
}

/// Write a `.gclient_entries` file mapping destinations to sources.
#[allow(dead_code)]
pub fn write_entries(path: &Path, entries: &[(&str, &str)]) {
    let mut text = String::from("entries = {\n");
    for (destination, source) in entries {
        text.push_str(&format!("  '{}': '{}',\n", destination, source));
    }
    text.push_str("}\n");
    std::fs::write(path, text).expect("failed to write entries file");
}
