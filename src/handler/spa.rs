//! Single-page-application fallback resolution
//!
//! Deep links under the configured prefix resolve to the prefix's index
//! file whenever the literally requested target is a directory or missing,
//! so the client-side router receives the entry document instead of a 404.
//! Real files under the prefix pass through untouched.

use crate::config::SpaConfig;
use std::path::{Path, PathBuf};

/// Decide whether the fallback rule applies to a request
///
/// Returns the index target to serve instead of `candidate`, or `None` to
/// delegate to normal static resolution. The decision matrix:
///
/// - path outside `spa.prefix` -> `None`
/// - candidate is a regular file -> `None` (assets under the prefix are
///   served unmodified)
/// - candidate is a directory or absent, index file exists -> `Some(index)`
/// - index file itself absent -> `None` (normal resolution yields the 404)
pub fn fallback_target(
    spa: &SpaConfig,
    root: &Path,
    decoded_path: &str,
    candidate: &Path,
) -> Option<PathBuf> {
    if !decoded_path.starts_with(spa.prefix.as_str()) {
        return None;
    }

    // An unreadable entry counts as absent; read errors on real files are
    // reported by the static resolver instead.
    let dir_or_missing = std::fs::metadata(candidate).map_or(true, |meta| meta.is_dir());
    if !dir_or_missing {
        return None;
    }

    let index = root.join(spa.prefix.trim_matches('/')).join(&spa.index);
    if index.is_file() {
        Some(index)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn spa_config() -> SpaConfig {
        SpaConfig {
            prefix: "/app/".to_string(),
            index: "index.html".to_string(),
        }
    }

    fn served_root() -> tempfile::TempDir {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir_all(root.path().join("app/assets")).unwrap();
        fs::write(root.path().join("app/index.html"), "<html>spa</html>").unwrap();
        fs::write(root.path().join("app/logo.png"), [0x89, 0x50, 0x4e, 0x47]).unwrap();
        fs::write(root.path().join("other.txt"), "plain").unwrap();
        root
    }

    #[test]
    fn test_outside_prefix_passes_through() {
        let root = served_root();
        let candidate = root.path().join("other.txt");
        assert!(fallback_target(&spa_config(), root.path(), "/other.txt", &candidate).is_none());
    }

    #[test]
    fn test_missing_deep_link_falls_back() {
        let root = served_root();
        let candidate = root.path().join("app/dashboard/settings");
        let target = fallback_target(
            &spa_config(),
            root.path(),
            "/app/dashboard/settings",
            &candidate,
        );
        assert_eq!(target, Some(root.path().join("app").join("index.html")));
    }

    #[test]
    fn test_directory_under_prefix_falls_back() {
        let root = served_root();
        let candidate = root.path().join("app/assets");
        let target = fallback_target(&spa_config(), root.path(), "/app/assets/", &candidate);
        assert_eq!(target, Some(root.path().join("app").join("index.html")));
    }

    #[test]
    fn test_real_file_under_prefix_passes_through() {
        let root = served_root();
        let candidate = root.path().join("app/logo.png");
        assert!(fallback_target(&spa_config(), root.path(), "/app/logo.png", &candidate).is_none());
    }

    #[test]
    fn test_missing_index_passes_through() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir_all(root.path().join("app")).unwrap();
        let candidate = root.path().join("app/deep/link");
        assert!(fallback_target(&spa_config(), root.path(), "/app/deep/link", &candidate).is_none());
    }

    #[test]
    fn test_prefix_without_trailing_slash_is_not_matched() {
        // "/app" (no slash) does not start with "/app/"; the static resolver
        // handles it via the directory index lookup instead.
        let root = served_root();
        let candidate = root.path().join("app");
        assert!(fallback_target(&spa_config(), root.path(), "/app", &candidate).is_none());
    }
}
