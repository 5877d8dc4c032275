use std::fs;
use std::path::Path;

/// Lightweight classification of a filesystem path's kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathType {
    /// The path does not exist.
    NotFound,
    /// The path exists and is a directory.
    Directory,
    /// The path exists and is a regular file.
    File,
    /// The path exists but is neither a regular file nor a directory
    /// (for example: socket, FIFO, device, symlink without target).
    Other,
}

impl PathType {
    /// Classify `path` and return its `PathType`.
    ///
    /// Symlinks are followed, so a link to a file classifies as `File`. A
    /// dangling link still has link metadata of its own and classifies as
    /// `Other`.
    pub fn of<P: AsRef<Path>>(path: P) -> Self {
        let p = path.as_ref();
        if p.is_dir() {
            PathType::Directory
        } else if p.is_file() {
            PathType::File
        } else if p.exists() || fs::symlink_metadata(p).is_ok() {
            PathType::Other
        } else {
            PathType::NotFound
        }
    }
}

/// Return `true` if the provided `path` exists at all, whatever its kind.
pub fn exists<P: AsRef<Path>>(path: P) -> bool {
    PathType::of(path) != PathType::NotFound
}

/// Return `true` only when `path` exists and is a regular file.
///
/// A directory at `path` reports `false`, not an error: wrong kind is an
/// expected condition for callers probing before acting.
pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
    PathType::of(path) == PathType::File
}

/// Return `true` only when `path` exists and is a directory.
pub fn folder_exists<P: AsRef<Path>>(path: P) -> bool {
    PathType::of(path) == PathType::Directory
}

/// Return `true` when `path` is a directory with no entries at all.
///
/// Missing paths and non-directories report `false`.
pub fn is_empty_dir<P: AsRef<Path>>(path: P) -> bool {
    match fs::read_dir(path.as_ref()) {
        Ok(mut entries) => entries.next().is_none(),
        Err(_) => false,
    }
}
