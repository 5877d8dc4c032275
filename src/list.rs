use std::fs;
use std::path::{Path, PathBuf};

use globset::GlobBuilder;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{FsError, Result};
use crate::path;
use crate::stat;
use crate::walk::{walk_tree, Visit};

/// What [`list_paths`] should return.
#[derive(Debug, Clone, Copy)]
pub struct ListOptions {
    /// Walk the whole tree instead of direct children only.
    pub recursive: bool,
    /// Include files (and other non-directory entries such as symlinks).
    pub files: bool,
    /// Include directories.
    pub dirs: bool,
}

impl Default for ListOptions {
    fn default() -> Self {
        ListOptions {
            recursive: false,
            files: true,
            dirs: true,
        }
    }
}

/// Names of the files directly inside `dir`.
///
/// A missing or non-directory `dir` yields an empty list with a warning;
/// unreadable entries while iterating are a hard error. Order is whatever
/// the filesystem returns.
pub fn list_files(dir: impl AsRef<Path>) -> Result<Vec<String>> {
    shallow_names(dir.as_ref(), true)
}

/// Names of the folders directly inside `dir`. Same contract as
/// [`list_files`].
pub fn list_folders(dir: impl AsRef<Path>) -> Result<Vec<String>> {
    shallow_names(dir.as_ref(), false)
}

fn shallow_names(dir: &Path, want_files: bool) -> Result<Vec<String>> {
    if !stat::folder_exists(dir) {
        warn!("cannot list `{}`: not a directory", dir.display());
        return Ok(Vec::new());
    }
    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| FsError::io(dir, e))? {
        let entry = entry.map_err(|e| FsError::io(dir, e))?;
        // Follows symlinks, so a link to a file lists as a file.
        let is_dir = entry.path().is_dir();
        if want_files != is_dir {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    Ok(names)
}

/// Full paths of the entries under `dir`, filtered by [`ListOptions`].
///
/// Non-directory entries that are not regular files (symlinks, sockets)
/// ride with the `files` flag. A missing root yields an empty list with a
/// warning.
pub fn list_paths(dir: impl AsRef<Path>, options: &ListOptions) -> Result<Vec<PathBuf>> {
    let d = dir.as_ref();
    if !stat::folder_exists(d) {
        warn!("cannot list `{}`: not a directory", d.display());
        return Ok(Vec::new());
    }
    let mut out = Vec::new();
    if options.recursive {
        walk_tree(d, None, |entry| match entry {
            Visit::Dir(p) => {
                if options.dirs {
                    out.push(p.to_path_buf());
                }
            }
            Visit::File { path, .. } => {
                if options.files {
                    out.push(path.to_path_buf());
                }
            }
            Visit::Other(p) => {
                if options.files {
                    out.push(p.to_path_buf());
                }
            }
        });
    } else {
        for entry in fs::read_dir(d).map_err(|e| FsError::io(d, e))? {
            let entry = entry.map_err(|e| FsError::io(d, e))?;
            let p = entry.path();
            let take = if p.is_dir() { options.dirs } else { options.files };
            if take {
                out.push(p);
            }
        }
    }
    Ok(out)
}

/// Full paths of the descendants of `dir` whose path relative to `dir`
/// matches `pattern`.
///
/// `*` does not cross path separators, so `*.txt` matches only direct
/// children while `sub/*.txt` and `**/*.txt` reach deeper. An invalid
/// pattern is a hard error; a missing root is the usual soft empty list.
pub fn glob_paths(dir: impl AsRef<Path>, pattern: &str) -> Result<Vec<PathBuf>> {
    let d = dir.as_ref();
    let matcher = GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map_err(|e| FsError::Pattern {
            pattern: pattern.to_string(),
            source: e,
        })?
        .compile_matcher();

    if !stat::folder_exists(d) {
        warn!("cannot glob `{}`: not a directory", d.display());
        return Ok(Vec::new());
    }
    let mut out = Vec::new();
    walk_tree(d, None, |entry| {
        let p = entry.path();
        if let Ok(rel) = p.strip_prefix(d) {
            if matcher.is_match(rel) {
                out.push(p.to_path_buf());
            }
        }
    });
    Ok(out)
}

/// Like [`glob_paths`] but matching at any depth: `rglob_paths(d, "*.txt")`
/// is `glob_paths(d, "**/*.txt")`.
pub fn rglob_paths(dir: impl AsRef<Path>, pattern: &str) -> Result<Vec<PathBuf>> {
    glob_paths(dir, &format!("**/{}", pattern))
}

/// Recursively find regular files whose extension matches `ext` (leading
/// dot optional, case-sensitive).
pub fn find_files_by_extension(dir: impl AsRef<Path>, ext: &str) -> Vec<PathBuf> {
    let d = dir.as_ref();
    let want = format!(".{}", ext.trim_start_matches('.'));
    let mut out = Vec::new();
    walk_tree(d, None, |entry| {
        if let Visit::File { path: p, .. } = entry {
            if path::extension(p) == want {
                out.push(p.to_path_buf());
            }
        }
    });
    out
}

/// Recursively find regular files named exactly `name`.
pub fn find_files_by_name(dir: impl AsRef<Path>, name: &str) -> Vec<PathBuf> {
    let d = dir.as_ref();
    let mut out = Vec::new();
    walk_tree(d, None, |entry| {
        if let Visit::File { path: p, .. } = entry {
            if p.file_name().is_some_and(|n| n == name) {
                out.push(p.to_path_buf());
            }
        }
    });
    out
}

/// Full paths of everything under `dir` down to `max_depth` levels.
///
/// Depth 1 is the direct children. Depth 0, a missing root, or a
/// non-directory root all yield an empty list.
pub fn dir_tree(dir: impl AsRef<Path>, max_depth: usize) -> Vec<PathBuf> {
    let d = dir.as_ref();
    if !stat::folder_exists(d) {
        warn!("cannot read tree of `{}`: not a directory", d.display());
        return Vec::new();
    }
    let mut out = Vec::new();
    walk_tree(d, Some(max_depth), |entry| {
        out.push(entry.path().to_path_buf());
    });
    out
}

/// File and folder names of one directory, bundled for serialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub files: Vec<String>,
    pub folders: Vec<String>,
}

/// Files and folders of the current working directory.
pub fn list_all() -> Result<Listing> {
    let cwd = current_dir()?;
    Ok(Listing {
        files: list_files(&cwd)?,
        folders: list_folders(&cwd)?,
    })
}

/// The current working directory.
pub fn current_dir() -> Result<PathBuf> {
    std::env::current_dir().map_err(|e| FsError::io(Path::new("."), e))
}
