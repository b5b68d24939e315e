//! Test file discovery
//!
//! Walks a directory tree breadth-first and collects every file whose name contains the configured test file
//! extension. Matching is a case-insensitive substring test on the file name, not a strict suffix check:
//! `math.test.json.bak` and `Math.TEST.JSON` both match `.test.json`.
//!
//! Results come back in traversal order (files of a directory before files of the directories found under it).
//! Entries within one directory are visited in file-name order so a scan is reproducible across filesystems.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

/// A directory or entry that could not be read mid-scan.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("failed to read directory {}: {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to inspect {}: {source}", path.display())]
    Inspect {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Whether `file_name` counts as a test file for `suffix`.
pub fn matches_suffix(file_name: &str, suffix: &str) -> bool {
    file_name.to_lowercase().contains(&suffix.to_lowercase())
}

/// Find all test files under `root`.
///
/// Returns absolute paths. Symlinks are followed and there is no cycle protection. The first unreadable directory
/// or entry aborts the whole scan.
#[tracing::instrument(skip_all, fields(root = %root.display(), suffix = %suffix))]
pub fn scan(root: &Path, suffix: &str) -> Result<Vec<PathBuf>, ScanError> {
    let root = std::path::absolute(root).map_err(|source| ScanError::Inspect {
        path: root.to_path_buf(),
        source,
    })?;

    let mut found = Vec::new();
    let mut dirs = vec![root];
    let mut next = 0;

    while next < dirs.len() {
        let dir = dirs[next].clone();
        next += 1;

        for path in list_dir(&dir)? {
            let metadata = fs::metadata(&path).map_err(|source| ScanError::Inspect {
                path: path.clone(),
                source,
            })?;

            if metadata.is_dir() {
                dirs.push(path);
                continue;
            }

            let is_match = path
                .file_name()
                .is_some_and(|name| matches_suffix(&name.to_string_lossy(), suffix));
            if is_match {
                debug!(file = %path.display(), "matched test file");
                found.push(path);
            }
        }
    }

    debug!(count = found.len(), dirs = dirs.len(), "scan complete");
    Ok(found)
}

fn list_dir(dir: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let read_err = |source| ScanError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_err)? {
        entries.push(entry.map_err(read_err)?.path());
    }
    entries.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(entries)
}
