use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T, E = FsError> = std::result::Result<T, E>;

/// Errors produced by filesystem operation helpers.
///
/// Expected conditions (missing sources, existing destinations, declined
/// confirmations) are not errors; they come back as [`crate::Outcome`]
/// values or benign defaults. `FsError` is reserved for failures the caller
/// did not sign up for: I/O faults, malformed data, bad patterns.
#[derive(Error, Debug)]
pub enum FsError {
    /// Wrapper for underlying IO errors, with the path that was being touched.
    #[error("I/O error on `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The path was expected to exist for this operation but does not.
    #[error("path not found: `{path}`")]
    NotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The operating system refused access to the path.
    #[error("permission denied on `{path}`: {source}")]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// File contents were not valid UTF-8 and strict decoding was requested.
    #[error("`{path}` is not valid UTF-8")]
    Encoding { path: PathBuf },

    /// JSON could not be parsed or serialized.
    #[error("JSON error in `{path}`: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// CSV could not be parsed or written.
    #[error("CSV error in `{path}`: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A row handed to the CSV writer carries a key missing from the field list.
    #[error("unknown CSV field `{field}` in row for `{path}`")]
    CsvField { path: PathBuf, field: String },

    /// A glob pattern failed to compile.
    #[error("invalid glob pattern `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    /// The confirmation prompt itself failed (for example: no terminal).
    #[error("confirmation prompt failed: {0}")]
    Prompt(#[source] io::Error),
}

impl FsError {
    /// Wrap an `io::Error`, classifying the common kinds so they render
    /// with a more useful message.
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            io::ErrorKind::NotFound => FsError::NotFound { path, source },
            io::ErrorKind::PermissionDenied => FsError::PermissionDenied { path, source },
            _ => FsError::Io { path, source },
        }
    }
}
