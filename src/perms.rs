//! Access probing and permission setting.
//!
//! The two platforms do not share a permission model and this module does
//! not pretend they do. POSIX gets mode bits; Windows gets `icacls` grants
//! for `Everyone` at four coarse levels, which is lossy on purpose (see
//! [`IcaclsAcl`]). The backend is a trait so callers and tests can slot in
//! their own.

use std::fs;
use std::io;
use std::path::Path;
use std::process::Command;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{FsError, Result};
use crate::outcome::Outcome;
use crate::stat;

/// Read/write/execute capability triplet, as answered by the OS for the
/// current process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Access {
    pub read: bool,
    pub write: bool,
    pub execute: bool,
}

impl Access {
    pub const fn new(read: bool, write: bool, execute: bool) -> Self {
        Access {
            read,
            write,
            execute,
        }
    }
}

/// Ask the OS which of read/write/execute the current process holds on
/// `path`. A missing path answers all-false.
///
/// On Unix this is the real `access(2)` check. Elsewhere it is an
/// approximation from metadata: readable and executable when the path
/// exists, writable unless marked read-only.
pub fn inspect_access(path: impl AsRef<Path>) -> Access {
    let p = path.as_ref();

    #[cfg(unix)]
    {
        use nix::unistd::{access, AccessFlags};
        Access {
            read: access(p, AccessFlags::R_OK).is_ok(),
            write: access(p, AccessFlags::W_OK).is_ok(),
            execute: access(p, AccessFlags::X_OK).is_ok(),
        }
    }

    #[cfg(not(unix))]
    {
        match fs::metadata(p) {
            Ok(meta) => Access {
                read: true,
                write: !meta.permissions().readonly(),
                execute: true,
            },
            Err(_) => Access::default(),
        }
    }
}

/// [`inspect_access`] for the current working directory.
pub fn current_dir_access() -> Access {
    inspect_access(Path::new("."))
}

/// Applies an [`Access`] triplet to a path. Implementations are free to be
/// as coarse as their platform forces them to be.
pub trait PermissionBackend {
    fn set(&self, path: &Path, access: Access) -> io::Result<()>;
}

/// POSIX mode bits: each granted capability is applied for owner, group
/// and other alike (`r -> 0o444`, `w -> 0o222`, `x -> 0o111`).
#[derive(Debug, Default)]
pub struct PosixModes;

impl PosixModes {
    fn mode_for(access: Access) -> u32 {
        let mut mode = 0;
        if access.read {
            mode |= 0o444;
        }
        if access.write {
            mode |= 0o222;
        }
        if access.execute {
            mode |= 0o111;
        }
        mode
    }
}

impl PermissionBackend for PosixModes {
    #[cfg(unix)]
    fn set(&self, path: &Path, access: Access) -> io::Result<()> {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(Self::mode_for(access)))
    }

    #[cfg(not(unix))]
    fn set(&self, _path: &Path, _access: Access) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "POSIX mode bits are not available on this platform",
        ))
    }
}

/// Windows ACLs via the `icacls` command, granting `Everyone` one of four
/// levels.
///
/// The mapping is lossy: read+write+execute grants `F`, read+write `M`,
/// anything readable `R`, write-only `W`. Execute never survives on its
/// own and alone collapses to `R`. Only the all-false triplet becomes an
/// explicit deny. Grants first clear any standing `Everyone` deny, since
/// a deny entry outranks every grant.
#[derive(Debug, Default)]
pub struct IcaclsAcl;

impl IcaclsAcl {
    /// The grant level for a triplet, or `None` for the deny case.
    fn grant_level(access: Access) -> Option<&'static str> {
        match (access.read, access.write, access.execute) {
            (true, true, true) => Some("F"),
            (true, true, false) => Some("M"),
            (true, false, _) => Some("R"),
            (false, true, _) => Some("W"),
            // Execute alone is still a grant, not a lockout.
            (false, false, true) => Some("R"),
            (false, false, false) => None,
        }
    }

    /// Argument lists for the `icacls` calls applying a triplet, in run
    /// order. Everything before the last call is best-effort cleanup.
    fn call_plan(access: Access) -> Vec<Vec<String>> {
        match Self::grant_level(access) {
            Some(level) => vec![
                vec!["/remove:d".into(), "Everyone".into()],
                vec!["/grant:r".into(), format!("Everyone:({})", level)],
            ],
            None => vec![vec!["/deny".into(), "Everyone:(F)".into()]],
        }
    }
}

impl PermissionBackend for IcaclsAcl {
    fn set(&self, path: &Path, access: Access) -> io::Result<()> {
        if !cfg!(windows) {
            return Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "icacls is only available on Windows",
            ));
        }
        let calls = Self::call_plan(access);
        for (i, args) in calls.iter().enumerate() {
            let run = Command::new("icacls").arg(path).args(args).status();
            // A cleanup call may find nothing to remove; only the final
            // call's exit status counts.
            if i + 1 < calls.len() {
                continue;
            }
            let status = run?;
            if !status.success() {
                return Err(io::Error::new(
                    io::ErrorKind::PermissionDenied,
                    format!("icacls exited with {}", status),
                ));
            }
        }
        Ok(())
    }
}

/// Apply `access` to `path` using the platform's backend.
///
/// A missing path is soft ([`Outcome::SourceMissing`]). Uniquely among the
/// operations here, an OS refusal is also soft: it is logged with a
/// remediation hint and reported as [`Outcome::AccessDenied`], because a
/// permission error while changing permissions is an answer, not an
/// accident.
pub fn change_access(path: impl AsRef<Path>, access: Access) -> Result<Outcome> {
    let backend: &dyn PermissionBackend = if cfg!(unix) { &PosixModes } else { &IcaclsAcl };
    change_access_with(path, access, backend)
}

/// [`change_access`] with an explicit backend.
pub fn change_access_with(
    path: impl AsRef<Path>,
    access: Access,
    backend: &dyn PermissionBackend,
) -> Result<Outcome> {
    let p = path.as_ref();
    if !stat::exists(p) {
        warn!("cannot change access on `{}`: no such path", p.display());
        return Ok(Outcome::SourceMissing);
    }
    match backend.set(p, access) {
        Ok(()) => Ok(Outcome::Done),
        Err(err) if err.kind() == io::ErrorKind::PermissionDenied => {
            warn!(
                "permission change on `{}` refused: {}; retry as the owner or from an elevated shell",
                p.display(),
                err
            );
            Ok(Outcome::AccessDenied)
        }
        Err(err) => Err(FsError::io(p, err)),
    }
}
