//! Text, byte and line I/O.
//!
//! Text is UTF-8. Reads take a [`DecodeMode`] so the caller decides whether
//! malformed bytes are a hard error or get the replacement character.
//! Writes are single plain calls: no temp files, no rename dance, no
//! atomicity promises.

use std::fs;
use std::io::Write;
use std::path::Path;

use crate::dir::ensure_parent_dir;
use crate::error::{FsError, Result};

/// What to do with bytes that are not valid UTF-8.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DecodeMode {
    /// Fail with [`FsError::Encoding`].
    #[default]
    Strict,
    /// Substitute U+FFFD and carry on.
    Lossy,
}

/// Terminator used by [`write_lines`], after every line including the last.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
    Cr,
}

impl LineEnding {
    fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
            LineEnding::Cr => "\r",
        }
    }
}

/// Knobs shared by the writing helpers.
#[derive(Debug, Clone, Copy)]
pub struct WriteOptions {
    /// Create missing parent directories before writing. On by default.
    pub parents: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        WriteOptions { parents: true }
    }
}

/// Read a whole file as UTF-8 text.
pub fn read_text(path: impl AsRef<Path>, mode: DecodeMode) -> Result<String> {
    let p = path.as_ref();
    let bytes = fs::read(p).map_err(|e| FsError::io(p, e))?;
    decode(bytes, p, mode)
}

/// Read a whole file as raw bytes.
pub fn read_bytes(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let p = path.as_ref();
    fs::read(p).map_err(|e| FsError::io(p, e))
}

/// Write text, replacing any previous contents.
pub fn write_text(path: impl AsRef<Path>, contents: &str, options: &WriteOptions) -> Result<()> {
    write_bytes(path, contents.as_bytes(), options)
}

/// Write raw bytes, replacing any previous contents.
pub fn write_bytes(path: impl AsRef<Path>, data: &[u8], options: &WriteOptions) -> Result<()> {
    let p = path.as_ref();
    if options.parents {
        ensure_parent_dir(p)?;
    }
    fs::write(p, data).map_err(|e| FsError::io(p, e))
}

/// Append text to the end of a file, creating it when missing.
pub fn append_text(path: impl AsRef<Path>, contents: &str, options: &WriteOptions) -> Result<()> {
    append_bytes(path, contents.as_bytes(), options)
}

/// Append raw bytes to the end of a file, creating it when missing.
pub fn append_bytes(path: impl AsRef<Path>, data: &[u8], options: &WriteOptions) -> Result<()> {
    let p = path.as_ref();
    if options.parents {
        ensure_parent_dir(p)?;
    }
    let mut file = fs::OpenOptions::new()
        .append(true)
        .create(true)
        .open(p)
        .map_err(|e| FsError::io(p, e))?;
    file.write_all(data).map_err(|e| FsError::io(p, e))
}

/// Read a file as lines, splitting on `\n`, `\r\n` or lone `\r`.
///
/// Terminators are not part of the lines and a trailing terminator does
/// not produce a final empty line.
pub fn read_lines(path: impl AsRef<Path>, mode: DecodeMode) -> Result<Vec<String>> {
    let text = read_text(path, mode)?;
    if text.is_empty() {
        return Ok(Vec::new());
    }
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    let mut lines: Vec<String> = normalized.split('\n').map(str::to_string).collect();
    if lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    Ok(lines)
}

/// Write lines with the chosen terminator after every one, the last
/// included.
pub fn write_lines<I, S>(
    path: impl AsRef<Path>,
    lines: I,
    ending: LineEnding,
    options: &WriteOptions,
) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut buf = String::new();
    for line in lines {
        buf.push_str(line.as_ref());
        buf.push_str(ending.as_str());
    }
    write_text(path, &buf, options)
}

fn decode(bytes: Vec<u8>, path: &Path, mode: DecodeMode) -> Result<String> {
    match mode {
        DecodeMode::Strict => String::from_utf8(bytes).map_err(|_| FsError::Encoding {
            path: path.to_path_buf(),
        }),
        DecodeMode::Lossy => Ok(String::from_utf8_lossy(&bytes).into_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn text_round_trip_with_parent_creation() {
        let tmp = tempdir().unwrap();
        let p = tmp.path().join("deep/nested/f.txt");
        write_text(&p, "hello there", &WriteOptions::default()).unwrap();
        assert_eq!(read_text(&p, DecodeMode::Strict).unwrap(), "hello there");
    }

    #[test]
    fn parents_off_fails_on_missing_directory() {
        let tmp = tempdir().unwrap();
        let p = tmp.path().join("no_dir/f.txt");
        let err = write_text(&p, "x", &WriteOptions { parents: false }).unwrap_err();
        assert!(matches!(err, FsError::NotFound { .. }));
    }

    #[test]
    fn strict_rejects_invalid_utf8_lossy_replaces_it() {
        let tmp = tempdir().unwrap();
        let p = tmp.path().join("mixed.bin");
        write_bytes(&p, b"ok \xff\xfe tail", &WriteOptions::default()).unwrap();

        let err = read_text(&p, DecodeMode::Strict).unwrap_err();
        assert!(matches!(err, FsError::Encoding { .. }));

        let text = read_text(&p, DecodeMode::Lossy).unwrap();
        assert!(text.starts_with("ok "));
        assert!(text.contains('\u{FFFD}'));
        assert!(text.ends_with(" tail"));
    }

    #[test]
    fn append_accumulates() {
        let tmp = tempdir().unwrap();
        let p = tmp.path().join("log.txt");
        append_text(&p, "one", &WriteOptions::default()).unwrap();
        append_text(&p, " two", &WriteOptions::default()).unwrap();
        assert_eq!(read_text(&p, DecodeMode::Strict).unwrap(), "one two");
    }

    #[test]
    fn read_lines_handles_all_terminators() {
        let tmp = tempdir().unwrap();
        let p = tmp.path().join("mixed.txt");
        write_bytes(&p, b"unix\nwindows\r\nold mac\rlast", &WriteOptions::default()).unwrap();
        assert_eq!(
            read_lines(&p, DecodeMode::Strict).unwrap(),
            vec!["unix", "windows", "old mac", "last"]
        );
    }

    #[test]
    fn trailing_terminator_adds_no_empty_line() {
        let tmp = tempdir().unwrap();
        let p = tmp.path().join("f.txt");
        write_bytes(&p, b"a\nb\n", &WriteOptions::default()).unwrap();
        assert_eq!(read_lines(&p, DecodeMode::Strict).unwrap(), vec!["a", "b"]);

        // Blank lines in the middle survive.
        write_bytes(&p, b"a\n\nb\n", &WriteOptions::default()).unwrap();
        assert_eq!(read_lines(&p, DecodeMode::Strict).unwrap(), vec!["a", "", "b"]);

        write_bytes(&p, b"", &WriteOptions::default()).unwrap();
        assert!(read_lines(&p, DecodeMode::Strict).unwrap().is_empty());
    }

    #[test]
    fn write_lines_terminates_every_line() {
        let tmp = tempdir().unwrap();
        let p = tmp.path().join("out.txt");
        write_lines(&p, ["a", "b"], LineEnding::CrLf, &WriteOptions::default()).unwrap();
        assert_eq!(fs::read(&p).unwrap(), b"a\r\nb\r\n");

        write_lines(&p, ["solo"], LineEnding::default(), &WriteOptions::default()).unwrap();
        assert_eq!(fs::read(&p).unwrap(), b"solo\n");
    }

    #[test]
    fn lines_round_trip() {
        let tmp = tempdir().unwrap();
        let p = tmp.path().join("roundtrip.txt");
        let lines = vec!["first", "second", "", "fourth"];
        write_lines(&p, &lines, LineEnding::Lf, &WriteOptions::default()).unwrap();
        assert_eq!(read_lines(&p, DecodeMode::Strict).unwrap(), lines);
    }
}
