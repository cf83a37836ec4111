//! Candidate module discovery.
//!
//! Search directories come from configuration as a colon-separated
//! list and are walked recursively; files matching the requested
//! dynamic-library extension become load candidates. Discovery order
//! is significant — it fixes plugin registration order and therefore
//! hook dispatch order — so walks are sorted by file name and the
//! result is deduplicated without reordering.

use std::ffi::OsStr;
use std::path::PathBuf;

use indexmap::IndexSet;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::LoadError;

/// The platform's dynamic-library extension (`so`, `dylib`, `dll`).
pub fn default_extension() -> &'static str {
    std::env::consts::DLL_EXTENSION
}

/// Split a colon-separated search path into directory entries.
///
/// Empty segments (leading, trailing, or doubled colons) are skipped.
pub fn parse_search_path(raw: &str) -> Vec<PathBuf> {
    raw.split(':')
        .filter(|segment| !segment.is_empty())
        .map(PathBuf::from)
        .collect()
}

/// Enumerate candidate plugin modules under `dirs`.
///
/// Each directory is walked recursively in file-name order; files
/// whose extension matches `extension` are collected. A directory
/// that does not exist (or is not a directory) aborts discovery —
/// a dangling search path entry is a configuration error, not
/// something to skip quietly.
pub fn discover(dirs: &[PathBuf], extension: &str) -> Result<Vec<PathBuf>, LoadError> {
    let mut found: IndexSet<PathBuf> = IndexSet::new();
    for dir in dirs {
        if !dir.is_dir() {
            return Err(LoadError::DirectoryMissing { path: dir.clone() });
        }
        let before = found.len();
        for entry in WalkDir::new(dir).follow_links(false).sort_by_file_name() {
            let entry = entry.map_err(|e| LoadError::Walk {
                path: dir.clone(),
                reason: e.to_string(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            if entry.path().extension().and_then(OsStr::to_str) == Some(extension) {
                found.insert(entry.path().to_path_buf());
            }
        }
        debug!(
            dir = %dir.display(),
            candidates = found.len() - before,
            "scanned plugin directory"
        );
    }
    Ok(found.into_iter().collect())
}

/// Convenience: parse a search path and discover with the platform's
/// default extension.
pub fn discover_search_path(raw: &str) -> Result<Vec<PathBuf>, LoadError> {
    discover(&parse_search_path(raw), default_extension())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn parse_search_path_splits_on_colons() {
        let dirs = parse_search_path("/a/plugins:/b/plugins");
        assert_eq!(dirs, [PathBuf::from("/a/plugins"), PathBuf::from("/b/plugins")]);
    }

    #[test]
    fn parse_search_path_skips_empty_segments() {
        let dirs = parse_search_path(":/a::/b:");
        assert_eq!(dirs, [PathBuf::from("/a"), PathBuf::from("/b")]);
        assert!(parse_search_path("").is_empty());
    }

    #[test]
    fn discover_finds_matching_files_recursively() {
        let temp = tempfile::tempdir().unwrap();
        let nested = temp.path().join("nested");
        fs::create_dir(&nested).unwrap();
        fs::write(temp.path().join("beta.so"), b"x").unwrap();
        fs::write(temp.path().join("notes.txt"), b"x").unwrap();
        fs::write(nested.join("alpha.so"), b"x").unwrap();

        let found = discover(&[temp.path().to_path_buf()], "so").unwrap();
        let names: Vec<String> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["beta.so", "alpha.so"]);
    }

    #[test]
    fn discover_order_is_deterministic() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("c.so"), b"x").unwrap();
        fs::write(temp.path().join("a.so"), b"x").unwrap();
        fs::write(temp.path().join("b.so"), b"x").unwrap();

        let dirs = [temp.path().to_path_buf()];
        let first = discover(&dirs, "so").unwrap();
        let second = discover(&dirs, "so").unwrap();
        assert_eq!(first, second);

        let names: Vec<String> = first
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["a.so", "b.so", "c.so"]);
    }

    #[test]
    fn discover_deduplicates_overlapping_directories() {
        let temp = tempfile::tempdir().unwrap();
        let nested = temp.path().join("nested");
        fs::create_dir(&nested).unwrap();
        fs::write(nested.join("alpha.so"), b"x").unwrap();

        // The nested dir is reachable both directly and via its parent.
        let found = discover(&[temp.path().to_path_buf(), nested.clone()], "so").unwrap();
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn discover_missing_directory_fails() {
        let temp = tempfile::tempdir().unwrap();
        let missing = temp.path().join("absent");
        match discover(&[missing.clone()], "so") {
            Err(LoadError::DirectoryMissing { path }) => assert_eq!(path, missing),
            other => panic!("expected DirectoryMissing, got {other:?}"),
        }
    }

    #[test]
    fn discover_rejects_file_as_directory() {
        let temp = tempfile::tempdir().unwrap();
        let file = temp.path().join("plain.so");
        fs::write(&file, b"x").unwrap();
        match discover(&[file], "so") {
            Err(LoadError::DirectoryMissing { .. }) => {}
            other => panic!("expected DirectoryMissing, got {other:?}"),
        }
    }
}
