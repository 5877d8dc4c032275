//! The one tree-traversal primitive behind every recursive operation.
//!
//! Counting, sizing, globbing, recursive copy and the pre-delete tally all
//! walk through here so they agree on the same rules: symbolic links are
//! never followed (a link is one entry of its own, contributing zero bytes),
//! and unreadable entries are skipped with a warning rather than aborting
//! the whole traversal.

use std::io;
use std::path::Path;

use tracing::warn;
use walkdir::WalkDir;

/// One entry handed to a tree visitor. The root itself is not visited.
pub(crate) enum Visit<'a> {
    /// A directory, seen before its contents.
    Dir(&'a Path),
    /// A regular file and its size in bytes.
    File { path: &'a Path, size: u64 },
    /// Anything else: symlinks, sockets, devices.
    Other(&'a Path),
}

impl Visit<'_> {
    pub(crate) fn path(&self) -> &Path {
        match self {
            Visit::Dir(p) => p,
            Visit::File { path, .. } => path,
            Visit::Other(p) => p,
        }
    }
}

/// Aggregate counts for a tree, produced by a single walk.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TreeTotals {
    /// Regular files.
    pub files: u64,
    /// Directories, not counting the root itself.
    pub dirs: u64,
    /// Entries that are neither: symlinks and special files.
    pub others: u64,
    /// Byte sum of the regular files.
    pub bytes: u64,
}

impl TreeTotals {
    pub(crate) fn entries(&self) -> u64 {
        self.files + self.dirs + self.others
    }
}

/// Walk the tree under `root` depth-first, directories before their
/// contents, and hand each entry to `visit`. A visitor error stops the walk
/// and is returned; errors from the walk itself (unreadable directories,
/// vanished entries) only produce a warning.
pub(crate) fn try_walk_tree(
    root: &Path,
    max_depth: Option<usize>,
    mut visit: impl FnMut(Visit<'_>) -> io::Result<()>,
) -> io::Result<()> {
    // Depth 0 excludes even the direct children; walkdir would clamp it
    // back up to min_depth, so cut it off here.
    if max_depth == Some(0) {
        return Ok(());
    }
    let mut walker = WalkDir::new(root).min_depth(1).follow_links(false);
    if let Some(depth) = max_depth {
        walker = walker.max_depth(depth);
    }
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("skipping unreadable entry under `{}`: {}", root.display(), err);
                continue;
            }
        };
        let file_type = entry.file_type();
        if file_type.is_dir() {
            visit(Visit::Dir(entry.path()))?;
        } else if file_type.is_file() {
            let size = match entry.metadata() {
                Ok(meta) => meta.len(),
                Err(err) => {
                    warn!("no metadata for `{}`: {}", entry.path().display(), err);
                    0
                }
            };
            visit(Visit::File { path: entry.path(), size })?;
        } else {
            visit(Visit::Other(entry.path()))?;
        }
    }
    Ok(())
}

/// Like [`try_walk_tree`] for visitors that cannot fail.
pub(crate) fn walk_tree(root: &Path, max_depth: Option<usize>, mut visit: impl FnMut(Visit<'_>)) {
    // The closure never errors, so the result carries nothing.
    let _ = try_walk_tree(root, max_depth, |entry| {
        visit(entry);
        Ok(())
    });
}

/// Count files, directories and bytes under `root` in one pass.
pub(crate) fn tree_totals(root: &Path) -> TreeTotals {
    let mut totals = TreeTotals::default();
    walk_tree(root, None, |entry| match entry {
        Visit::Dir(_) => totals.dirs += 1,
        Visit::File { size, .. } => {
            totals.files += 1;
            totals.bytes += size;
        }
        Visit::Other(_) => totals.others += 1,
    });
    totals
}
