use std::fs;
use std::path::Path;

use tracing::warn;

use crate::stat::{self, PathType};
use crate::walk::{tree_totals, walk_tree, Visit};

/// Number of regular files under `dir`, direct children or the whole tree.
///
/// Missing and non-directory roots count 0. The counting family stays
/// silent about that; the caller asked "how many", and the answer is none.
pub fn count_files(dir: impl AsRef<Path>, recursive: bool) -> u64 {
    count(dir.as_ref(), recursive, CountKind::Files)
}

/// Number of directories under `dir`, not counting `dir` itself.
pub fn count_folders(dir: impl AsRef<Path>, recursive: bool) -> u64 {
    count(dir.as_ref(), recursive, CountKind::Folders)
}

/// Number of entries of any kind under `dir`.
pub fn count_entries(dir: impl AsRef<Path>, recursive: bool) -> u64 {
    count(dir.as_ref(), recursive, CountKind::Entries)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum CountKind {
    Files,
    Folders,
    Entries,
}

fn count(dir: &Path, recursive: bool, kind: CountKind) -> u64 {
    if !stat::folder_exists(dir) {
        return 0;
    }
    if recursive {
        let totals = tree_totals(dir);
        return match kind {
            CountKind::Files => totals.files,
            CountKind::Folders => totals.dirs,
            CountKind::Entries => totals.entries(),
        };
    }
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            warn!("cannot count entries of `{}`: {}", dir.display(), err);
            return 0;
        }
    };
    let mut n = 0;
    for entry in entries.flatten() {
        let matched = match kind {
            CountKind::Entries => true,
            // Follows symlinks, same as the shallow listings.
            CountKind::Files => PathType::of(entry.path()) == PathType::File,
            CountKind::Folders => PathType::of(entry.path()) == PathType::Directory,
        };
        if matched {
            n += 1;
        }
    }
    n
}

/// Recursive byte total of the regular files under `dir`.
///
/// Symlinks contribute nothing. A missing or non-directory root warns and
/// reports 0.
pub fn folder_size(dir: impl AsRef<Path>) -> u64 {
    let d = dir.as_ref();
    if !stat::folder_exists(d) {
        warn!("cannot size `{}`: not a directory", d.display());
        return 0;
    }
    let mut bytes = 0;
    walk_tree(d, None, |entry| {
        if let Visit::File { size, .. } = entry {
            bytes += size;
        }
    });
    bytes
}
