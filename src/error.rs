//! Error types for beastcp.
//!
//! This module provides the [`Error`] enum containing all possible errors
//! that can occur during copy operations, the [`Result`] type alias, and
//! [`ErrorCode`] for stable machine-readable classification.
//!
//! # Error Categories
//!
//! | Category | Errors |
//! |----------|--------|
//! | IO | [`Error::Io`] |
//! | Integrity | [`Error::HashMismatch`] |
//! | Validation | [`Error::SourceNotFound`], [`Error::NotADirectory`], [`Error::IsADirectory`] |
//! | Pre-flight | [`Error::DestinationExists`] |
//! | Aggregate | [`Error::PartialCopy`] |
//! | Runtime | [`Error::ThreadPool`] |

use crate::digest::FileDigest;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for beastcp operations.
///
/// This is a type alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

/// Check if an IO error indicates "no space left on device".
///
/// # Platform Support
///
/// | Platform | Error Detection |
/// |----------|-----------------|
/// | Unix | `ENOSPC` (errno 28) |
/// | Windows | `ERROR_DISK_FULL` (0x70) |
///
/// # Example
///
/// ```
/// use std::io;
/// use beastcp::is_no_space_error;
///
/// let error = io::Error::new(io::ErrorKind::StorageFull, "disk full");
/// assert!(is_no_space_error(&error));
/// ```
pub fn is_no_space_error(error: &io::Error) -> bool {
    if error.kind() == io::ErrorKind::StorageFull {
        return true;
    }

    #[cfg(unix)]
    {
        if let Some(raw_error) = error.raw_os_error() {
            const ENOSPC: i32 = 28;
            return raw_error == ENOSPC;
        }
    }

    #[cfg(windows)]
    {
        if let Some(raw_error) = error.raw_os_error() {
            const ERROR_DISK_FULL: i32 = 112;
            return raw_error == ERROR_DISK_FULL;
        }
    }

    false
}

/// Stable classification of an [`Error`], suitable for exit messages and
/// JSON output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorCode {
    /// Generic read/write failure
    IoError,
    /// Destination storage is full
    NoSpace,
    /// Insufficient permissions on source or destination
    PermissionDenied,
    /// Post-copy digests differ
    HashMismatch,
    /// Destination root exists and overwrite was not confirmed
    DestinationExists,
    /// Source path does not exist
    SourceNotFound,
    /// Path has the wrong type for the requested operation
    InvalidInput,
    /// One or more files of a directory copy failed
    PartialCopy,
    /// Runtime setup failed (e.g. worker pool)
    Internal,
}

impl ErrorCode {
    /// Snake-case identifier of this code.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::IoError => "io_error",
            Self::NoSpace => "no_space",
            Self::PermissionDenied => "permission_denied",
            Self::HashMismatch => "hash_mismatch",
            Self::DestinationExists => "destination_exists",
            Self::SourceNotFound => "source_not_found",
            Self::InvalidInput => "invalid_input",
            Self::PartialCopy => "partial_copy",
            Self::Internal => "internal",
        }
    }

    /// Classify an underlying IO error.
    #[must_use]
    pub fn from_io(error: &io::Error) -> Self {
        if is_no_space_error(error) {
            return Self::NoSpace;
        }
        if error.kind() == io::ErrorKind::PermissionDenied {
            return Self::PermissionDenied;
        }
        Self::IoError
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single failed file inside a directory copy.
#[derive(Debug)]
pub struct FileFailure {
    /// Source file of the failed task
    pub source: PathBuf,
    /// Destination file of the failed task
    pub destination: PathBuf,
    /// Why the task failed
    pub error: Error,
}

impl fmt::Display for FileFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.source.display(), self.error)
    }
}

/// Errors that can occur during copy operations.
///
/// All errors include relevant path information to aid debugging.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// IO error while operating on `path`
    ///
    /// The task is aborted as-is: a partially written destination stays on
    /// disk so a later resumed run can continue from it.
    #[error("IO error on {path}: {source}")]
    Io {
        /// File or directory whose operation failed
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// Source and destination digests differ after the copy
    ///
    /// The destination is left in place for inspection or a later attempt.
    #[error(
        "Hash mismatch for {source_file}: source sha256 {source_digest}, destination {destination} sha256 {destination_digest}"
    )]
    HashMismatch {
        /// Source file
        source_file: PathBuf,
        /// Destination file (not deleted)
        destination: PathBuf,
        /// Digest of the source file
        source_digest: FileDigest,
        /// Digest of the destination file
        destination_digest: FileDigest,
    },

    /// Destination root already exists and overwrite was not confirmed
    #[error("Destination exists: {0} (use force to overwrite)")]
    DestinationExists(PathBuf),

    /// Source path does not exist
    #[error("Source path does not exist: {0}")]
    SourceNotFound(PathBuf),

    /// Source is not a directory
    #[error("Source is not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Path is a directory where a regular file is required
    #[error("Path is a directory, expected a file: {0}")]
    IsADirectory(PathBuf),

    /// The worker pool could not be started
    #[error("Failed to build worker pool: {0}")]
    ThreadPool(String),

    /// One or more files of a directory copy failed
    ///
    /// Every task ran to completion; `failures` lists each failed file in
    /// enumeration order.
    #[error("Failed to copy {failed} of {total} files{}", first_failure_suffix(.failures))]
    PartialCopy {
        /// Number of files that failed to copy
        failed: usize,
        /// Total number of files
        total: usize,
        /// Every failed file, in enumeration order
        failures: Vec<FileFailure>,
    },
}

fn first_failure_suffix(failures: &[FileFailure]) -> String {
    failures
        .first()
        .map(|first| format!("; first failure: {first}"))
        .unwrap_or_default()
}

impl Error {
    /// Wrap an IO error with the path it happened on.
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Stable classification of this error.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Io { source, .. } => ErrorCode::from_io(source),
            Self::HashMismatch { .. } => ErrorCode::HashMismatch,
            Self::DestinationExists(_) => ErrorCode::DestinationExists,
            Self::SourceNotFound(_) => ErrorCode::SourceNotFound,
            Self::NotADirectory(_) | Self::IsADirectory(_) => ErrorCode::InvalidInput,
            Self::PartialCopy { .. } => ErrorCode::PartialCopy,
            Self::ThreadPool(_) => ErrorCode::Internal,
        }
    }

    /// The offending path, when the error concerns a single path.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Io { path, .. } => Some(path),
            Self::HashMismatch { destination, .. } => Some(destination),
            Self::DestinationExists(path)
            | Self::SourceNotFound(path)
            | Self::NotADirectory(path)
            | Self::IsADirectory(path) => Some(path),
            Self::PartialCopy { .. } | Self::ThreadPool(_) => None,
        }
    }

    /// Every failed file of a directory copy (empty for other errors).
    #[must_use]
    pub fn failures(&self) -> &[FileFailure] {
        match self {
            Self::PartialCopy { failures, .. } => failures,
            _ => &[],
        }
    }
}
