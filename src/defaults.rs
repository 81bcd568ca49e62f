//! Default values for gsmirror.
//!
//! This module provides the fixed hosts, file names and repository lists
//! shared by the resolver modes and the CLI.

use std::path::PathBuf;

/// Git host every mirrored repository is fetched from.
pub const DEFAULT_HOST: &str = "https://chromium.googlesource.com/";

/// Default name of the repository list cache written by the listing modes.
pub const DEFAULT_CACHE_FILE: &str = "repo_list.json";

/// Destination name of the primary checkout in a gclient entries file.
pub const RESERVED_ENTRY: &str = "src";

/// Repository holding the `default.xml` project manifest.
pub const DEFAULT_MANIFEST_URL: &str = "https://chromium.googlesource.com/chromiumos/manifest.git";

/// Manifest document read from the manifest checkout.
pub const MANIFEST_FILE: &str = "default.xml";

/// Repositories needed next to the manifest projects that the manifest
/// itself does not declare: build tools, prebuilt binaries and SDK parts.
pub const SUPPLEMENTAL_REPOSITORIES: &[&str] = &[
    "https://chromium.googlesource.com/chromium/tools/depot_tools.git",
    "https://chromium.googlesource.com/chromium/tools/build.git",
    "https://chromium.googlesource.com/chromium/deps/gperf.git",
    "https://chromium.googlesource.com/chromiumos/platform/prebuilts.git",
    "https://chromium.googlesource.com/chromiumos/platform/sdk.git",
    "https://chromium.googlesource.com/chromiumos/chromite.git",
];

/// Returns the scratch directory holding the manifest repository checkout.
///
/// This lives under the system temporary directory so that it survives
/// between runs without cluttering the mirror directory.
pub fn default_manifest_dir() -> PathBuf {
    std::env::temp_dir().join("gsmirror-manifest")
}
