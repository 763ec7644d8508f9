//! Per-file units of work and their terminal outcomes.

use crate::options::CopyOptions;
use std::fmt;
use std::path::{Path, PathBuf};

/// Identifies a task within one invocation.
///
/// Directory copies number tasks in enumeration order starting at 0;
/// single-file copies use `TaskId(0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One file transfer: source, destination, and the resume/verify policy.
///
/// Immutable once constructed.
///
/// # Example
///
/// ```
/// use beastcp::{CopyTask, TaskId};
///
/// let task = CopyTask::new(TaskId(0), "data.bin", "backup/data.bin").with_verify(false);
/// assert!(task.resume());
/// assert!(!task.verify());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyTask {
    id: TaskId,
    source: PathBuf,
    destination: PathBuf,
    resume: bool,
    verify: bool,
}

impl CopyTask {
    /// Create a task with resume and verify enabled.
    pub fn new(id: TaskId, source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            id,
            source: source.into(),
            destination: destination.into(),
            resume: true,
            verify: true,
        }
    }

    /// Create a task taking its resume/verify policy from `options`.
    pub fn from_options(
        id: TaskId,
        source: impl Into<PathBuf>,
        destination: impl Into<PathBuf>,
        options: &CopyOptions,
    ) -> Self {
        Self::new(id, source, destination)
            .with_resume(options.resume)
            .with_verify(options.verify)
    }

    /// Set whether an existing destination is appended to instead of overwritten.
    #[must_use]
    pub fn with_resume(mut self, resume: bool) -> Self {
        self.resume = resume;
        self
    }

    /// Set whether the result is checked by content digest.
    #[must_use]
    pub fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    /// Position of this task in enumeration order.
    #[must_use]
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// File to read.
    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// File to create, resume or skip.
    #[must_use]
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Whether an existing destination may be resumed.
    #[must_use]
    pub fn resume(&self) -> bool {
        self.resume
    }

    /// Whether digests are compared after streaming.
    #[must_use]
    pub fn verify(&self) -> bool {
        self.verify
    }
}

/// Successful terminal state of a [`CopyTask`].
///
/// Failures are reported as [`Error::Io`](crate::Error::Io) or
/// [`Error::HashMismatch`](crate::Error::HashMismatch).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    /// Bytes were streamed into the destination
    Copied {
        /// Bytes written during this run
        bytes_written: u64,
        /// Offset the transfer started from (0 unless resumed)
        resumed_from: u64,
        /// Whether the digests were compared
        verified: bool,
    },
    /// Destination was already at least as large as the source; nothing was
    /// read or written
    SkippedAlreadyComplete,
}

impl CopyOutcome {
    /// Whether any bytes were transferred.
    #[must_use]
    pub fn is_copied(&self) -> bool {
        matches!(self, Self::Copied { .. })
    }

    /// Bytes written during this run (0 when skipped).
    #[must_use]
    pub fn bytes_written(&self) -> u64 {
        match self {
            Self::Copied { bytes_written, .. } => *bytes_written,
            Self::SkippedAlreadyComplete => 0,
        }
    }
}
