use std::fmt;

/// Report of which arm a mutating operation took.
///
/// The mutating helpers in this crate treat a lot of conditions as expected
/// rather than exceptional: a source that is not there, a destination that
/// already is, a declined confirmation. Those come back as `Outcome` variants
/// instead of errors so callers can branch without unwrapping. `Done` is the
/// only variant that means the filesystem changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "the outcome says whether anything actually happened"]
pub enum Outcome {
    /// The operation ran and the filesystem was changed as requested.
    Done,
    /// The source path was missing or not the expected kind; nothing to do.
    SourceMissing,
    /// The destination already exists and overwriting was not requested.
    DestinationExists,
    /// The confirmation gate answered no; nothing was touched.
    Declined,
    /// Dry run: the operation reported what it would do and stopped.
    DryRun,
    /// The operating system refused the permission change.
    AccessDenied,
}

impl Outcome {
    /// `true` only when the filesystem was actually modified.
    pub fn is_done(self) -> bool {
        matches!(self, Outcome::Done)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Outcome::Done => "done",
            Outcome::SourceMissing => "source missing or not the expected kind",
            Outcome::DestinationExists => "destination already exists",
            Outcome::Declined => "declined at the confirmation gate",
            Outcome::DryRun => "dry run, nothing was changed",
            Outcome::AccessDenied => "permission change refused by the operating system",
        };
        write!(f, "{}", msg)
    }
}
