use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::confirm::Confirm;
use crate::error::{FsError, Result};
use crate::file::{claim_destination, clear_path, copy_file_contents, symlink_at};
use crate::meta;
use crate::outcome::Outcome;
use crate::stat::PathType;
use crate::walk::{tree_totals, try_walk_tree, Visit};

/// How [`remove_dir`] should behave around the confirmation gate.
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoveOptions {
    /// Skip the confirmation gate entirely.
    pub force: bool,
    /// Report what would be removed and stop before touching anything.
    /// Takes precedence over `force`.
    pub dry_run: bool,
}

/// Create the directory (and any missing parents) and hand the path back.
/// Already existing is fine; a file in the way is a hard error.
pub fn ensure_dir(path: impl AsRef<Path>) -> Result<PathBuf> {
    let p = path.as_ref();
    fs::create_dir_all(p).map_err(|e| FsError::io(p, e))?;
    Ok(p.to_path_buf())
}

/// [`ensure_dir`] for a batch of paths, in order.
pub fn ensure_dirs<I, P>(paths: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut created = Vec::new();
    for path in paths {
        created.push(ensure_dir(path)?);
    }
    Ok(created)
}

/// Make sure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: impl AsRef<Path>) -> Result<()> {
    let p = path.as_ref();
    if let Some(parent) = p.parent() {
        fs::create_dir_all(parent).map_err(|e| FsError::io(parent, e))?;
    }
    Ok(())
}

/// Recursively remove a directory, behind the confirmation gate.
///
/// The gate hears how much is at stake (one walk produces the counts)
/// and its no leaves the tree untouched. `force` skips the question;
/// `dry_run` reports and stops before it. A missing or non-directory
/// path is [`Outcome::SourceMissing`].
pub fn remove_dir(
    path: impl AsRef<Path>,
    options: &RemoveOptions,
    gate: &mut dyn Confirm,
) -> Result<Outcome> {
    let p = path.as_ref();
    if PathType::of(p) != PathType::Directory {
        warn!("cannot remove `{}`: not an existing directory", p.display());
        return Ok(Outcome::SourceMissing);
    }
    let totals = tree_totals(p);
    let files = totals.files + totals.others;
    if options.dry_run {
        info!(
            "dry run: would remove `{}` ({} files, {} folders)",
            p.display(),
            files,
            totals.dirs
        );
        return Ok(Outcome::DryRun);
    }
    if !options.force {
        let prompt = format!(
            "Remove '{}' and its contents ({} files, {} folders)?",
            p.display(),
            files,
            totals.dirs
        );
        if !gate.confirm(&prompt).map_err(FsError::Prompt)? {
            info!("removal of `{}` declined", p.display());
            return Ok(Outcome::Declined);
        }
    }
    fs::remove_dir_all(p).map_err(|e| FsError::io(p, e))?;
    info!(
        "removed `{}` ({} files, {} folders)",
        p.display(),
        files,
        totals.dirs
    );
    Ok(Outcome::Done)
}

/// [`remove_dir`] for a batch of paths; the gate is asked once per path.
pub fn remove_dirs<I, P>(
    paths: I,
    options: &RemoveOptions,
    gate: &mut dyn Confirm,
) -> Result<Vec<Outcome>>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut outcomes = Vec::new();
    for path in paths {
        outcomes.push(remove_dir(path, options, gate)?);
    }
    Ok(outcomes)
}

/// Delete every direct child of `path` (subfolders go recursively, without
/// the gate) but keep the directory itself.
pub fn empty_dir(path: impl AsRef<Path>) -> Result<Outcome> {
    let p = path.as_ref();
    if PathType::of(p) != PathType::Directory {
        warn!("cannot empty `{}`: not an existing directory", p.display());
        return Ok(Outcome::SourceMissing);
    }
    for entry in fs::read_dir(p).map_err(|e| FsError::io(p, e))? {
        let entry = entry.map_err(|e| FsError::io(p, e))?;
        let child = entry.path();
        clear_path(&child).map_err(|e| FsError::io(&child, e))?;
    }
    info!("emptied `{}`", p.display());
    Ok(Outcome::Done)
}

/// Recursively copy a directory tree to `dst`, carrying file metadata.
///
/// An existing destination is refused unless `overwrite` is set, in which
/// case it is cleared first; the copy never merges into leftover contents.
/// Symlinks inside the tree are recreated against their original targets,
/// unfollowed; entries that are none of file, folder or link are skipped
/// with a warning.
pub fn copy_dir(
    src: impl AsRef<Path>,
    dst: impl AsRef<Path>,
    overwrite: bool,
) -> Result<Outcome> {
    let s = src.as_ref();
    let d = dst.as_ref();
    if PathType::of(s) != PathType::Directory {
        warn!("cannot copy `{}`: not an existing directory", s.display());
        return Ok(Outcome::SourceMissing);
    }
    match claim_destination(d, overwrite)? {
        Outcome::Done => {}
        other => return Ok(other),
    }
    mirror_tree(s, d)?;
    info!("copied `{}` to `{}`", s.display(), d.display());
    Ok(Outcome::Done)
}

/// Move a directory tree to `dst`: rename when the filesystem allows it,
/// copy-then-delete when it does not. Same destination rules as
/// [`copy_dir`]. A fallback that cannot mirror every entry keeps the
/// source and fails instead.
pub fn move_dir(
    src: impl AsRef<Path>,
    dst: impl AsRef<Path>,
    overwrite: bool,
) -> Result<Outcome> {
    let s = src.as_ref();
    let d = dst.as_ref();
    if PathType::of(s) != PathType::Directory {
        warn!("cannot move `{}`: not an existing directory", s.display());
        return Ok(Outcome::SourceMissing);
    }
    match claim_destination(d, overwrite)? {
        Outcome::Done => {}
        other => return Ok(other),
    }
    ensure_parent_dir(d)?;
    if fs::rename(s, d).is_err() {
        mirror_then_remove(s, d)?;
    }
    info!("moved `{}` to `{}`", s.display(), d.display());
    Ok(Outcome::Done)
}

/// Rename a directory in place, within its parent. Refuses an existing
/// target and never falls back to copying.
pub fn rename_dir(path: impl AsRef<Path>, new_name: &str) -> Result<Outcome> {
    let p = path.as_ref();
    if PathType::of(p) != PathType::Directory {
        warn!("cannot rename `{}`: not an existing directory", p.display());
        return Ok(Outcome::SourceMissing);
    }
    let parent = p.parent().unwrap_or_else(|| Path::new(""));
    let dest = parent.join(new_name);
    if fs::symlink_metadata(&dest).is_ok() {
        warn!("cannot rename to `{}`: already exists", dest.display());
        return Ok(Outcome::DestinationExists);
    }
    fs::rename(p, &dest).map_err(|e| FsError::io(p, e))?;
    info!("renamed `{}` to `{}`", p.display(), dest.display());
    Ok(Outcome::Done)
}

// Mirror the tree under `src` into `dst`: directories first (the walk is
// pre-order), file contents with metadata, symlinks recreated against
// their original targets. Returns how many entries could not be mirrored
// (sockets, fifos, devices), each skipped with a warning.
fn mirror_tree(src: &Path, dst: &Path) -> Result<u64> {
    fs::create_dir_all(dst).map_err(|e| FsError::io(dst, e))?;
    let mut skipped = 0;
    try_walk_tree(src, None, |entry| {
        let rel = match entry.path().strip_prefix(src) {
            Ok(rel) => rel.to_path_buf(),
            // The walk stays under `src`; nothing else to mirror.
            Err(_) => return Ok(()),
        };
        let target = dst.join(rel);
        match entry {
            Visit::Dir(_) => fs::create_dir_all(&target),
            Visit::File { path, .. } => copy_file_contents(path, &target).map(|_| ()),
            Visit::Other(p) => {
                if p.is_symlink() {
                    let points_to = fs::read_link(p)?;
                    return symlink_at(&points_to, &target);
                }
                warn!("skipping `{}`: not a file, folder or symlink", p.display());
                skipped += 1;
                Ok(())
            }
        }
    })
    .map_err(|e| FsError::io(src, e))?;
    meta::preserve_metadata(src, dst);
    Ok(skipped)
}

// Cross-filesystem fallback for move_dir: mirror, then remove the source
// only when nothing stayed behind. Whatever was not mirrored would vanish
// with the source.
fn mirror_then_remove(src: &Path, dst: &Path) -> Result<()> {
    let skipped = mirror_tree(src, dst)?;
    if skipped > 0 {
        return Err(FsError::io(
            src,
            io::Error::other(format!("{} entries were not mirrored; source kept", skipped)),
        ));
    }
    fs::remove_dir_all(src).map_err(|e| FsError::io(src, e))
}
