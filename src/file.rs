use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use filetime::FileTime;
use tracing::{info, warn};

use crate::dir;
use crate::error::{FsError, Result};
use crate::meta;
use crate::outcome::Outcome;
use crate::stat::{self, PathType};

/// Create `path` as an empty file, or refresh the modification time of
/// whatever already lives there.
///
/// With `parents` set, missing parent directories are created first.
pub fn touch(path: impl AsRef<Path>, parents: bool) -> Result<()> {
    let p = path.as_ref();
    if stat::exists(p) {
        filetime::set_file_mtime(p, FileTime::now()).map_err(|e| FsError::io(p, e))?;
        return Ok(());
    }
    if parents {
        dir::ensure_parent_dir(p)?;
    }
    // Append mode so a file racing into existence is opened, not truncated.
    fs::OpenOptions::new()
        .append(true)
        .create(true)
        .open(p)
        .map_err(|e| FsError::io(p, e))?;
    Ok(())
}

/// Make sure a regular file exists at `path`, creating parents and the file
/// itself as needed, and hand the path back.
pub fn ensure_file(path: impl AsRef<Path>) -> Result<PathBuf> {
    let p = path.as_ref();
    dir::ensure_parent_dir(p)?;
    if !stat::file_exists(p) {
        fs::OpenOptions::new()
            .append(true)
            .create(true)
            .open(p)
            .map_err(|e| FsError::io(p, e))?;
    }
    Ok(p.to_path_buf())
}

/// Remove a regular file.
///
/// A missing path, or one that is not a regular file, is reported as
/// [`Outcome::SourceMissing`]; with `missing_ok` the condition is not even
/// worth a warning.
pub fn remove_file(path: impl AsRef<Path>, missing_ok: bool) -> Result<Outcome> {
    let p = path.as_ref();
    match PathType::of(p) {
        PathType::File => {
            fs::remove_file(p).map_err(|e| FsError::io(p, e))?;
            info!("removed file `{}`", p.display());
            Ok(Outcome::Done)
        }
        _ => {
            if !missing_ok {
                warn!("cannot remove `{}`: not an existing file", p.display());
            }
            Ok(Outcome::SourceMissing)
        }
    }
}

/// Copy a regular file to `dst`, carrying metadata along.
///
/// An existing destination of any kind is refused unless `overwrite` is
/// set, in which case it is deleted first (a directory in the way goes
/// recursively, without the confirmation gate).
pub fn copy_file(
    src: impl AsRef<Path>,
    dst: impl AsRef<Path>,
    overwrite: bool,
) -> Result<Outcome> {
    let s = src.as_ref();
    let d = dst.as_ref();
    if !stat::file_exists(s) {
        warn!("cannot copy `{}`: not an existing file", s.display());
        return Ok(Outcome::SourceMissing);
    }
    match claim_destination(d, overwrite)? {
        Outcome::Done => {}
        other => return Ok(other),
    }
    dir::ensure_parent_dir(d)?;
    copy_file_contents(s, d).map_err(|e| FsError::io(s, e))?;
    info!("copied `{}` to `{}`", s.display(), d.display());
    Ok(Outcome::Done)
}

/// Move a regular file to `dst`.
///
/// Tries a plain rename first and falls back to copy-plus-delete when the
/// rename fails (typically a cross-device destination). Same destination
/// rules as [`copy_file`].
pub fn move_file(
    src: impl AsRef<Path>,
    dst: impl AsRef<Path>,
    overwrite: bool,
) -> Result<Outcome> {
    let s = src.as_ref();
    let d = dst.as_ref();
    if !stat::file_exists(s) {
        warn!("cannot move `{}`: not an existing file", s.display());
        return Ok(Outcome::SourceMissing);
    }
    match claim_destination(d, overwrite)? {
        Outcome::Done => {}
        other => return Ok(other),
    }
    dir::ensure_parent_dir(d)?;
    if fs::rename(s, d).is_err() {
        copy_file_contents(s, d).map_err(|e| FsError::io(s, e))?;
        fs::remove_file(s).map_err(|e| FsError::io(s, e))?;
    }
    info!("moved `{}` to `{}`", s.display(), d.display());
    Ok(Outcome::Done)
}

/// Rename a file in place: the new name lands in the same parent
/// directory.
///
/// Unlike [`move_file`] this refuses an existing target outright and never
/// falls back to copying; a rename that the filesystem cannot do in one
/// step is a hard error.
pub fn rename_file(path: impl AsRef<Path>, new_name: &str) -> Result<Outcome> {
    let p = path.as_ref();
    if !stat::file_exists(p) {
        warn!("cannot rename `{}`: not an existing file", p.display());
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

/// Create a symbolic link at `link` pointing to `target`.
///
/// With `overwrite`, whatever currently occupies `link` is removed first.
pub fn create_symlink(
    target: impl AsRef<Path>,
    link: impl AsRef<Path>,
    overwrite: bool,
) -> Result<Outcome> {
    let t = target.as_ref();
    let l = link.as_ref();
    match claim_destination(l, overwrite)? {
        Outcome::Done => {}
        other => return Ok(other),
    }
    symlink_at(t, l).map_err(|e| FsError::io(l, e))?;
    info!("linked `{}` to `{}`", l.display(), t.display());
    Ok(Outcome::Done)
}

pub(crate) fn symlink_at(target: &Path, link: &Path) -> io::Result<()> {
    #[cfg(unix)]
    {
        std::os::unix::fs::symlink(target, link)
    }

    #[cfg(windows)]
    {
        use std::os::windows::fs::{symlink_dir, symlink_file};

        // Pick the link kind from the target when it exists; a missing
        // target defaults to a file link.
        let use_dir = target.metadata().map(|m| m.is_dir()).unwrap_or(false);
        if use_dir {
            symlink_dir(target, link)
        } else {
            symlink_file(target, link)
        }
    }
}

/// Check (and with `overwrite`, clear) the destination slot. `Done` means
/// the slot is free to use.
pub(crate) fn claim_destination(dst: &Path, overwrite: bool) -> Result<Outcome> {
    if fs::symlink_metadata(dst).is_ok() {
        if !overwrite {
            warn!("destination `{}` already exists", dst.display());
            return Ok(Outcome::DestinationExists);
        }
        clear_path(dst).map_err(|e| FsError::io(dst, e))?;
    }
    Ok(Outcome::Done)
}

/// Remove whatever sits at `path`: a directory tree, a file, or a symlink
/// (the link itself, never its target). Missing paths are a no-op.
pub(crate) fn clear_path(path: &Path) -> io::Result<()> {
    let meta = match fs::symlink_metadata(path) {
        Ok(meta) => meta,
        Err(_) => return Ok(()),
    };
    if meta.file_type().is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}

/// Buffered single-file copy, then best-effort metadata carry-over.
pub(crate) fn copy_file_contents(src: &Path, dst: &Path) -> io::Result<u64> {
    let mut options = fs_extra::file::CopyOptions::new();
    // The destination slot was already cleared or never occupied.
    options.overwrite = true;
    // 64 KiB buffer balances throughput and memory for typical files.
    options.buffer_size = 64 * 1024;
    let written = fs_extra::file::copy(src, dst, &options).map_err(io::Error::other)?;
    meta::preserve_metadata(src, dst);
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn touch_creates_then_refreshes() {
        let tmp = tempdir().unwrap();
        let p = tmp.path().join("new/levels/f.txt");
        touch(&p, true).unwrap();
        assert!(p.is_file());

        let past = FileTime::from_unix_time(1_000_000, 0);
        filetime::set_file_mtime(&p, past).unwrap();
        touch(&p, false).unwrap();
        let meta = fs::metadata(&p).unwrap();
        assert!(FileTime::from_last_modification_time(&meta) > past);
        // Still empty; touch never truncates or writes.
        assert_eq!(meta.len(), 0);
    }

    #[test]
    fn ensure_file_is_idempotent() {
        let tmp = tempdir().unwrap();
        let p = tmp.path().join("a/b/keep.txt");
        assert_eq!(ensure_file(&p).unwrap(), p);
        fs::write(&p, b"payload").unwrap();
        assert_eq!(ensure_file(&p).unwrap(), p);
        assert_eq!(fs::read(&p).unwrap(), b"payload");
    }

    #[test]
    fn remove_file_soft_conditions() {
        let tmp = tempdir().unwrap();
        let p = tmp.path().join("f.txt");
        fs::write(&p, b"x").unwrap();

        assert_eq!(remove_file(&p, false).unwrap(), Outcome::Done);
        assert!(!p.exists());
        assert_eq!(remove_file(&p, true).unwrap(), Outcome::SourceMissing);
        // A directory is not a file to remove.
        assert_eq!(remove_file(tmp.path(), false).unwrap(), Outcome::SourceMissing);
        assert!(tmp.path().exists());
    }

    #[test]
    fn copy_file_copies_bytes_and_refuses_conflicts() {
        let tmp = tempdir().unwrap();
        let src = tmp.path().join("src.txt");
        let dst = tmp.path().join("out/dst.txt");
        fs::write(&src, b"contents").unwrap();

        assert_eq!(copy_file(&src, &dst, false).unwrap(), Outcome::Done);
        assert_eq!(fs::read(&dst).unwrap(), b"contents");

        fs::write(&dst, b"stale").unwrap();
        assert_eq!(copy_file(&src, &dst, false).unwrap(), Outcome::DestinationExists);
        assert_eq!(fs::read(&dst).unwrap(), b"stale");

        assert_eq!(copy_file(&src, &dst, true).unwrap(), Outcome::Done);
        assert_eq!(fs::read(&dst).unwrap(), b"contents");
    }

    #[test]
    fn copy_file_missing_source_is_soft() {
        let tmp = tempdir().unwrap();
        let out = copy_file(tmp.path().join("no"), tmp.path().join("dst"), false).unwrap();
        assert_eq!(out, Outcome::SourceMissing);
        assert!(!tmp.path().join("dst").exists());
    }

    #[test]
    fn move_file_leaves_no_source_behind() {
        let tmp = tempdir().unwrap();
        let src = tmp.path().join("src.txt");
        let dst = tmp.path().join("moved/dst.txt");
        fs::write(&src, b"payload").unwrap();

        assert_eq!(move_file(&src, &dst, false).unwrap(), Outcome::Done);
        assert!(!src.exists());
        assert_eq!(fs::read(&dst).unwrap(), b"payload");
    }

    #[test]
    fn move_file_overwrite_replaces_destination() {
        let tmp = tempdir().unwrap();
        let src = tmp.path().join("src.txt");
        let dst = tmp.path().join("dst.txt");
        fs::write(&src, b"new").unwrap();
        fs::write(&dst, b"old").unwrap();

        assert_eq!(move_file(&src, &dst, false).unwrap(), Outcome::DestinationExists);
        assert_eq!(move_file(&src, &dst, true).unwrap(), Outcome::Done);
        assert_eq!(fs::read(&dst).unwrap(), b"new");
    }

    #[test]
    fn rename_file_stays_in_parent_and_refuses_conflicts() {
        let tmp = tempdir().unwrap();
        let p = tmp.path().join("old.txt");
        fs::write(&p, b"x").unwrap();
        fs::write(tmp.path().join("taken.txt"), b"y").unwrap();

        assert_eq!(rename_file(&p, "taken.txt").unwrap(), Outcome::DestinationExists);
        assert!(p.exists());

        assert_eq!(rename_file(&p, "new.txt").unwrap(), Outcome::Done);
        assert!(!p.exists());
        assert_eq!(fs::read(tmp.path().join("new.txt")).unwrap(), b"x");

        assert_eq!(rename_file(&p, "again.txt").unwrap(), Outcome::SourceMissing);
    }

    #[cfg(unix)]
    #[test]
    fn create_symlink_and_overwrite() {
        let tmp = tempdir().unwrap();
        let target = tmp.path().join("target.txt");
        fs::write(&target, b"t").unwrap();
        let link = tmp.path().join("link");

        assert_eq!(create_symlink(&target, &link, false).unwrap(), Outcome::Done);
        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());

        // A second link needs overwrite, even when the first is identical.
        assert_eq!(
            create_symlink(&target, &link, false).unwrap(),
            Outcome::DestinationExists
        );
        assert_eq!(create_symlink(&target, &link, true).unwrap(), Outcome::Done);
        assert_eq!(fs::read(&link).unwrap(), b"t");
    }
}
