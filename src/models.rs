//! Core data models used throughout Remote Catalog.
//!
//! These types represent the scan targets, file records, and run results that
//! flow through the fetch pipeline.

use std::path::PathBuf;

/// One (remote, directory) pair to be listed in a run.
///
/// An empty `directory` means the remote's root. Targets are produced by the
/// resolver and consumed once by the ingestor; ordering matters only for
/// progress accounting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanTarget {
    pub remote: String,
    pub directory: String,
}

impl ScanTarget {
    pub fn new(remote: impl Into<String>, directory: impl Into<String>) -> Self {
        Self {
            remote: remote.into(),
            directory: directory.into(),
        }
    }

    /// The directory with leading/trailing separators stripped.
    pub fn clean_dir(&self) -> &str {
        self.directory.trim_matches('/')
    }

    /// The rclone-scoped identifier: `remote:dir`, or bare `remote:` when the
    /// directory is empty.
    pub fn scoped_id(&self) -> String {
        let dir = self.clean_dir();
        if dir.is_empty() {
            format!("{}:", self.remote)
        } else {
            format!("{}:{}", self.remote, dir)
        }
    }

    /// Catalog path for a relative path within this target: the remote name,
    /// the directory prefix (trailing `/` only when non-empty), and the
    /// relative path. No double slashes are produced.
    pub fn full_path(&self, relative: &str) -> String {
        let dir = self.clean_dir();
        if dir.is_empty() {
            format!("{}:{}", self.remote, relative)
        } else {
            format!("{}:{}/{}", self.remote, dir, relative)
        }
    }
}

/// A single file entry destined for the catalog.
///
/// `full_path` is the business key: re-ingesting the same path replaces the
/// existing row. `modified_date` is whatever text the listing tool emitted —
/// it is stored opaquely, never parsed as a datetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRecord {
    pub full_path: String,
    pub drive: String,
    pub size: u64,
    pub file_type: String,
    pub modified_date: Option<String>,
}

/// Summary payload returned by a completed fetch run.
#[derive(Debug, Clone)]
pub struct FetchSummary {
    /// Absolute path of the catalog file.
    pub db_path: PathBuf,
    /// Number of records written across all targets.
    pub total_indexed: u64,
    /// Distinct remote names scanned, in scan order.
    pub remotes: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scoped_id_strips_separators() {
        assert_eq!(ScanTarget::new("gdrive", "").scoped_id(), "gdrive:");
        assert_eq!(ScanTarget::new("gdrive", "/").scoped_id(), "gdrive:");
        assert_eq!(
            ScanTarget::new("gdrive", "/photos/2024/").scoped_id(),
            "gdrive:photos/2024"
        );
        assert_eq!(
            ScanTarget::new("gdrive", "docs").scoped_id(),
            "gdrive:docs"
        );
    }

    #[test]
    fn full_path_normalizes_directory_prefix() {
        let target = ScanTarget::new("r", "/a/b/");
        assert_eq!(target.full_path("c.txt"), "r:a/b/c.txt");

        let root = ScanTarget::new("r", "");
        assert_eq!(root.full_path("c.txt"), "r:c.txt");
    }

    #[test]
    fn full_path_never_doubles_slashes() {
        let target = ScanTarget::new("r", "a/b");
        assert_eq!(target.full_path("sub/c.txt"), "r:a/b/sub/c.txt");
    }
}
