//! Property-based tests for repository reference parsing.
//!
//! These tests use proptest to generate random URLs and verify that the
//! revision stripping and mirror path derivation invariants hold.

#[cfg(test)]
mod proptest_tests {
    use crate::reference::RepositoryReference;
    use proptest::prelude::*;
    use std::path::PathBuf;

    fn segment() -> impl Strategy<Value = String> {
        "[a-zA-Z0-9_-][a-zA-Z0-9_.-]{0,15}".prop_filter("no dot segments", |s| s != "." && s != "..")
    }

    proptest! {
        /// Property: a revision marker and everything after it is stripped
        #[test]
        fn revision_marker_is_stripped(
            host in "[a-z]{1,10}\\.[a-z]{2,3}",
            segments in prop::collection::vec(segment(), 1..5),
            revision in "[0-9a-f]{7,40}",
        ) {
            let url = format!("https://{}/{}", host, segments.join("/"));
            let reference = RepositoryReference::parse(&format!("{}@{}", url, revision));
            prop_assert_eq!(reference.url(), url.as_str());
            prop_assert_eq!(reference.revision(), Some(revision.as_str()));
        }

        /// Property: a URL without a marker is returned unchanged
        #[test]
        fn url_without_marker_is_unchanged(
            host in "[a-z]{1,10}\\.[a-z]{2,3}",
            segments in prop::collection::vec(segment(), 1..5),
        ) {
            let url = format!("https://{}/{}", host, segments.join("/"));
            let reference = RepositoryReference::parse(&url);
            prop_assert_eq!(reference.url(), url.as_str());
            prop_assert!(reference.revision().is_none());
        }

        /// Property: the mirror path is exactly the segments after the host
        #[test]
        fn relative_path_is_segments_after_host(
            host in "[a-z]{1,10}\\.[a-z]{2,3}",
            segments in prop::collection::vec(segment(), 1..6),
        ) {
            let url = format!("https://{}/{}", host, segments.join("/"));
            let path = RepositoryReference::parse(&url).relative_path().unwrap();
            let expected: PathBuf = segments.iter().collect();
            prop_assert_eq!(path, expected);
        }

        /// Property: the mirror path never escapes the mirror root
        #[test]
        fn relative_path_is_always_relative(input in "https://[a-z]{1,5}/.{0,40}") {
            if let Ok(path) = RepositoryReference::parse(&input).relative_path() {
                prop_assert!(path.is_relative());
                prop_assert!(!path.components().any(|c| matches!(c, std::path::Component::ParentDir)));
            }
        }
    }
}
