use std::io;
use std::path::Path;

use serde::Serialize;
use sysinfo::Disks;

use crate::error::{FsError, Result};
use crate::path;

/// Byte totals for the filesystem holding a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DiskUsage {
    pub total: u64,
    pub used: u64,
    pub free: u64,
}

/// Total, used and free bytes of the disk containing `path`.
///
/// The path is absolutized and matched against the mounted disks by the
/// longest mount point prefix. Not finding a disk (the path does not
/// exist, or the mount table hides it) is a hard error.
pub fn disk_usage(path: impl AsRef<Path>) -> Result<DiskUsage> {
    let p = path.as_ref();
    let abs = path::absolute(p)?;
    let disks = Disks::new_with_refreshed_list();
    let best = disks
        .list()
        .iter()
        .filter(|disk| abs.starts_with(disk.mount_point()))
        .max_by_key(|disk| disk.mount_point().as_os_str().len());
    match best {
        Some(disk) => {
            let total = disk.total_space();
            let free = disk.available_space();
            Ok(DiskUsage {
                total,
                used: total.saturating_sub(free),
                free,
            })
        }
        None => Err(FsError::io(
            p,
            io::Error::new(io::ErrorKind::NotFound, "no mounted disk contains this path"),
        )),
    }
}
