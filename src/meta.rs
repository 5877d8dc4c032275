//! Best-effort metadata preservation for copies.
//!
//! Permissions and timestamps travel with every copied file; on Unix,
//! ownership and extended attributes are attempted too. None of it is
//! allowed to fail a copy that already moved the bytes: problems are
//! logged and the copy stands.

use std::fs;
use std::path::Path;

use filetime::FileTime;
use tracing::warn;

#[cfg(unix)]
mod unix_extra {
    use super::*;
    use nix::unistd::{chown, Gid, Uid};
    use std::os::unix::fs::MetadataExt;

    /// Copy ownership (UID/GID) and xattrs. Both regularly need privileges
    /// the process does not have, so failures are ignored.
    pub(crate) fn copy_unix_extras(src: &Path, dst: &Path) {
        if let Ok(meta) = fs::metadata(src) {
            let _ = chown(
                dst,
                Some(Uid::from_raw(meta.uid())),
                Some(Gid::from_raw(meta.gid())),
            );
        }

        if let Ok(names) = xattr::list(src) {
            for name in names {
                if let Ok(Some(value)) = xattr::get(src, &name) {
                    let _ = xattr::set(dst, &name, &value);
                }
            }
        }
    }
}

/// Carry permissions, timestamps and Unix extras from `src` to `dst`.
///
/// Logs and continues on every failure; the caller's copy has already
/// happened and stays valid either way.
pub(crate) fn preserve_metadata(src: &Path, dst: &Path) {
    match fs::metadata(src) {
        Ok(meta) => {
            if let Err(err) = fs::set_permissions(dst, meta.permissions()) {
                warn!(
                    "could not carry permissions from `{}` to `{}`: {}",
                    src.display(),
                    dst.display(),
                    err
                );
            }
            match (meta.accessed(), meta.modified()) {
                (Ok(accessed), Ok(modified)) => {
                    let accessed = FileTime::from_system_time(accessed);
                    let modified = FileTime::from_system_time(modified);
                    if let Err(err) = filetime::set_file_times(dst, accessed, modified) {
                        warn!("could not carry timestamps to `{}`: {}", dst.display(), err);
                    }
                }
                _ => warn!("source timestamps unavailable for `{}`", src.display()),
            }
        }
        Err(err) => warn!("no metadata for `{}`: {}", src.display(), err),
    }

    #[cfg(unix)]
    unix_extra::copy_unix_extras(src, dst);
}
