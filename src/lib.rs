//! File and folder convenience operations: path surgery, listing and
//! globbing, counting and sizing, create/remove/copy/move/rename with
//! soft-failure reporting, a confirmation gate for recursive deletion,
//! text/JSON/CSV I/O, permission handling and disk usage.

pub mod confirm;
pub mod content;
pub mod dir;
pub mod error;
pub mod file;
pub mod info;
pub mod list;
pub mod outcome;
pub mod path;
pub mod perms;
pub mod size;
pub mod space;
pub mod stat;
pub mod structured;

mod meta;
mod walk;

pub use crate::confirm::{AlwaysConfirm, AlwaysDeny, Confirm, ConsolePrompt, Scripted};
pub use crate::content::{DecodeMode, LineEnding, WriteOptions};
pub use crate::dir::RemoveOptions;
pub use crate::error::{FsError, Result};
pub use crate::info::{FileInfo, FolderInfo};
pub use crate::list::{ListOptions, Listing};
pub use crate::outcome::Outcome;
pub use crate::perms::{Access, IcaclsAcl, PermissionBackend, PosixModes};
pub use crate::space::DiskUsage;
pub use crate::stat::PathType;
pub use crate::structured::{CsvOptions, JsonOptions};
