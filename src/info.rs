use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::path;
use crate::stat::{self, PathType};
use crate::walk::tree_totals;

/// Point-in-time snapshot of one file.
///
/// Computed fresh on every query and never cached; it can be stale the
/// moment it returns. For a path that is missing (or not a regular file)
/// only `path` is kept; every other field is zero or empty, with `exists`
/// set to `false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
    pub exists: bool,
    /// Extension with its leading dot, or empty.
    pub extension: String,
    pub stem: String,
}

/// Point-in-time snapshot of one folder, with recursive totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderInfo {
    pub name: String,
    pub path: PathBuf,
    /// Recursive byte sum of the regular files inside.
    pub size: u64,
    pub exists: bool,
    /// Recursive count of regular files.
    pub file_count: u64,
    /// Recursive count of directories, the folder itself not included.
    pub folder_count: u64,
}

/// Size of a regular file in bytes; 0 when the path is missing or not a
/// file.
pub fn file_size(path: impl AsRef<Path>) -> u64 {
    let p = path.as_ref();
    if !stat::file_exists(p) {
        warn!("cannot size `{}`: not a file", p.display());
        return 0;
    }
    match fs::metadata(p) {
        Ok(meta) => meta.len(),
        Err(err) => {
            warn!("no metadata for `{}`: {}", p.display(), err);
            0
        }
    }
}

/// Snapshot a file. Never fails: absent targets produce a zeroed record.
pub fn file_info(path: impl AsRef<Path>) -> FileInfo {
    let p = path.as_ref();
    if !stat::file_exists(p) {
        warn!("cannot describe `{}`: not an existing file", p.display());
        return FileInfo {
            name: String::new(),
            path: p.to_path_buf(),
            size: 0,
            exists: false,
            extension: String::new(),
            stem: String::new(),
        };
    }
    FileInfo {
        name: path::name(p),
        path: p.to_path_buf(),
        size: file_size(p),
        exists: true,
        extension: path::extension(p),
        stem: path::stem(p),
    }
}

/// Snapshot a folder, deriving size and counts from a single walk.
/// Never fails: absent targets produce a zeroed record with only the
/// path kept.
pub fn folder_info(path: impl AsRef<Path>) -> FolderInfo {
    let p = path.as_ref();
    if PathType::of(p) != PathType::Directory {
        warn!("cannot describe `{}`: not an existing directory", p.display());
        return FolderInfo {
            name: String::new(),
            path: p.to_path_buf(),
            size: 0,
            exists: false,
            file_count: 0,
            folder_count: 0,
        };
    }
    let totals = tree_totals(p);
    FolderInfo {
        name: path::name(p),
        path: p.to_path_buf(),
        size: totals.bytes,
        exists: true,
        file_count: totals.files,
        folder_count: totals.dirs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn file_info_snapshot() {
        let tmp = tempdir().unwrap();
        let p = tmp.path().join("report.txt");
        fs::write(&p, b"hello").unwrap();

        let info = file_info(&p);
        assert!(info.exists);
        assert_eq!(info.size, 5);
        assert_eq!(info.name, "report.txt");
        assert_eq!(info.stem, "report");
        assert_eq!(info.extension, ".txt");
        assert_eq!(info.path, p);
    }

    #[test]
    fn missing_file_yields_zeroed_record() {
        let tmp = tempdir().unwrap();
        let p = tmp.path().join("ghost.md");

        let info = file_info(&p);
        assert!(!info.exists);
        assert_eq!(info.size, 0);
        // Only the queried path survives; the name fields stay empty.
        assert_eq!(info.path, p);
        assert_eq!(info.name, "");
        assert_eq!(info.extension, "");
        assert_eq!(info.stem, "");
        assert_eq!(file_size(&p), 0);
    }

    #[test]
    fn folder_info_counts_recursively() {
        let tmp = tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("a/b")).unwrap();
        fs::write(tmp.path().join("a/b/f.txt"), b"hi").unwrap();

        let info = folder_info(tmp.path().join("a"));
        assert!(info.exists);
        assert_eq!(info.file_count, 1);
        assert_eq!(info.folder_count, 1);
        assert_eq!(info.size, 2);
    }

    #[test]
    fn missing_folder_yields_zeroed_record() {
        let tmp = tempdir().unwrap();
        let info = folder_info(tmp.path().join("nowhere"));
        assert!(!info.exists);
        assert_eq!(info.name, "");
        assert_eq!(info.path, tmp.path().join("nowhere"));
        assert_eq!(info.file_count, 0);
        assert_eq!(info.folder_count, 0);
        assert_eq!(info.size, 0);
    }

    #[test]
    fn snapshots_serialize() {
        let tmp = tempdir().unwrap();
        let p = tmp.path().join("data.bin");
        fs::write(&p, [0u8; 3]).unwrap();

        let json = serde_json::to_string(&file_info(&p)).unwrap();
        assert!(json.contains("\"size\":3"));
        assert!(json.contains("\"exists\":true"));
    }
}
