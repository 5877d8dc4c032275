//! Pure path manipulation helpers.
//!
//! Nothing in this module touches the filesystem except [`absolute`],
//! [`resolve`] and [`to_file_uri`] (which need the current directory, and in
//! `resolve`'s case the real link targets). Everything else is lexical.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use crate::error::{FsError, Result};

/// Error returned by [`relative_to`] when the path is not under the base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutsideBase {
    pub path: PathBuf,
    pub base: PathBuf,
}

impl fmt::Display for OutsideBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "`{}` is not inside `{}`",
            self.path.display(),
            self.base.display()
        )
    }
}

impl std::error::Error for OutsideBase {}

/// Join any number of path segments into one path.
///
/// Segments are pushed left to right, so an absolute segment restarts the
/// path, exactly like `PathBuf::push`. An empty iterator yields an empty
/// path.
pub fn join<I, S>(parts: I) -> PathBuf
where
    I: IntoIterator<Item = S>,
    S: AsRef<Path>,
{
    let mut out = PathBuf::new();
    for part in parts {
        out.push(part.as_ref());
    }
    out
}

/// Split a path into `(parent, file name)`.
///
/// The name is empty for paths without a final component (the root, or a
/// path ending in `..`).
pub fn split(path: impl AsRef<Path>) -> (PathBuf, String) {
    let p = path.as_ref();
    let parent = p.parent().unwrap_or_else(|| Path::new("")).to_path_buf();
    let name = p
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    (parent, name)
}

/// Split a path's file name into `(stem, extension)`.
///
/// The extension keeps its leading dot and is empty when there is none, so
/// the two halves concatenate back to the file name:
/// `dir/report.txt` -> `("report", ".txt")`.
pub fn split_extension(path: impl AsRef<Path>) -> (String, String) {
    let p = path.as_ref();
    (strip_extension(p), extension(p))
}

/// Ordered components of a path, as strings.
pub fn parts(path: impl AsRef<Path>) -> Vec<String> {
    path.as_ref()
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect()
}

/// Final component of the path, or an empty string when there is none.
pub fn name(path: impl AsRef<Path>) -> String {
    path.as_ref()
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// File name without its final extension.
pub fn stem(path: impl AsRef<Path>) -> String {
    path.as_ref()
        .file_stem()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// The extension including its leading dot (`".txt"`), or an empty string.
pub fn extension(path: impl AsRef<Path>) -> String {
    match path.as_ref().extension() {
        Some(ext) => format!(".{}", ext.to_string_lossy()),
        None => String::new(),
    }
}

/// Parent of the path, or an empty path when there is none.
pub fn parent(path: impl AsRef<Path>) -> PathBuf {
    path.as_ref()
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .to_path_buf()
}

/// Drive or UNC prefix of the path (`C:`, `\\server\share`), or an empty
/// string when there is none. Only Windows paths carry one.
pub fn drive(path: impl AsRef<Path>) -> String {
    match path.as_ref().components().next() {
        Some(Component::Prefix(prefix)) => prefix.as_os_str().to_string_lossy().into_owned(),
        _ => String::new(),
    }
}

/// File name without its final extension: `dir/report.txt` -> `report`.
/// Directory segments do not survive; this answers with the name alone.
pub fn strip_extension(path: impl AsRef<Path>) -> String {
    stem(path)
}

/// Replace (or add) the final extension. A leading dot on `new_ext` is
/// optional: `change_extension("report.txt", "md")` and
/// `change_extension("report.txt", ".md")` both give `report.md`.
pub fn change_extension(path: impl AsRef<Path>, new_ext: &str) -> PathBuf {
    path.as_ref()
        .with_extension(new_ext.trim_start_matches('.'))
}

/// Make sure the path carries the given extension, replacing any other.
/// Paths that already have it are returned unchanged.
pub fn ensure_extension(path: impl AsRef<Path>, ext: &str) -> PathBuf {
    let p = path.as_ref();
    let want = ext.trim_start_matches('.');
    if extension(p) == format!(".{}", want) {
        p.to_path_buf()
    } else {
        change_extension(p, want)
    }
}

/// Absolutize a path against the current directory without touching
/// symlinks or requiring the path to exist.
pub fn absolute(path: impl AsRef<Path>) -> Result<PathBuf> {
    let p = path.as_ref();
    std::path::absolute(p).map_err(|e| FsError::io(p, e))
}

/// Canonicalize a path: absolutize and resolve symlinks. The path must
/// exist. This is the only helper in the module that follows links.
pub fn resolve(path: impl AsRef<Path>) -> Result<PathBuf> {
    let p = path.as_ref();
    std::fs::canonicalize(p).map_err(|e| FsError::io(p, e))
}

/// Expand a leading `~` into the user's home directory.
///
/// Uses `HOME` (Unix) or `USERPROFILE` (Windows). Paths without a leading
/// tilde, and any path when no home directory can be determined, come back
/// unchanged.
pub fn expand(path: impl AsRef<Path>) -> PathBuf {
    let p = path.as_ref();
    let text = p.to_string_lossy();
    if let Some(rest) = text.strip_prefix('~') {
        if let Some(home) = home_dir() {
            let trimmed = rest.trim_start_matches(['/', '\\']);
            return if trimmed.is_empty() {
                home
            } else {
                home.join(trimmed)
            };
        }
    }
    p.to_path_buf()
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}

/// Compute `path` relative to `base` by strict prefix removal.
///
/// No `..` segments are invented: when `path` does not sit lexically under
/// `base` this fails with [`OutsideBase`].
pub fn relative_to(
    path: impl AsRef<Path>,
    base: impl AsRef<Path>,
) -> Result<PathBuf, OutsideBase> {
    let p = path.as_ref();
    let b = base.as_ref();
    p.strip_prefix(b)
        .map(Path::to_path_buf)
        .map_err(|_| OutsideBase {
            path: p.to_path_buf(),
            base: b.to_path_buf(),
        })
}

/// Render the path with forward slashes regardless of platform.
pub fn to_posix(path: impl AsRef<Path>) -> String {
    let s = path.as_ref().to_string_lossy().into_owned();
    if cfg!(windows) {
        s.replace('\\', "/")
    } else {
        s
    }
}

/// Render the path as a `file://` URI.
///
/// The path is absolutized first; bytes outside the URI-safe set are
/// percent-encoded.
pub fn to_file_uri(path: impl AsRef<Path>) -> Result<String> {
    let abs = absolute(path)?;
    let posix = to_posix(&abs);
    let mut uri = String::from("file://");
    if !posix.starts_with('/') {
        // Windows drive paths need a separating slash: file:///C:/...
        uri.push('/');
    }
    for byte in posix.bytes() {
        if is_uri_safe(byte) {
            uri.push(byte as char);
        } else {
            uri.push_str(&format!("%{:02X}", byte));
        }
    }
    Ok(uri)
}

// Unreserved URI characters plus `/` and `:`, matching the usual quoting
// rules for file URIs.
fn is_uri_safe(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~' | b'/' | b':')
}
