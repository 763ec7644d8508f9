//! Builder API for ergonomic copying operations.
//!
//! The builder pattern provides a fluent interface for configuring and
//! executing copy operations, including the whole-path pre-flight check
//! that refuses to touch an existing destination unless forced.
//!
//! # Examples
//!
//! ## Basic Usage
//!
//! ```no_run
//! use beastcp::CopyBuilder;
//!
//! // Fresh destination, resume + verify enabled
//! let stats = CopyBuilder::new("src", "dst").run()?;
//! println!("{} files processed", stats.files_processed());
//! # Ok::<(), beastcp::Error>(())
//! ```
//!
//! ## Resuming an Interrupted Copy
//!
//! ```no_run
//! use beastcp::CopyBuilder;
//!
//! // The destination exists from the interrupted run, so force is required
//! let stats = CopyBuilder::new("dataset", "/mnt/backup/dataset")
//!     .threads(8)
//!     .force()
//!     .run()?;
//! println!("{} files were already complete", stats.files_skipped);
//! # Ok::<(), beastcp::Error>(())
//! ```

use crate::copy::{CopyStats, copy_dir, copy_file};
use crate::error::{Error, Result};
use crate::options::CopyOptions;
use crate::progress::{ProgressSink, SharedSink};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// A builder for configuring and executing copy operations.
///
/// `CopyBuilder` automatically detects whether the source is a file or
/// directory and calls the appropriate function.
#[derive(Debug, Clone)]
pub struct CopyBuilder {
    src: PathBuf,
    dst: PathBuf,
    options: CopyOptions,
    force: bool,
}

impl CopyBuilder {
    /// Create a new `CopyBuilder` with the given source and destination paths.
    ///
    /// Uses default options (4 workers, resume and verify enabled, not forced).
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(src: P, dst: Q) -> Self {
        Self {
            src: src.as_ref().to_path_buf(),
            dst: dst.as_ref().to_path_buf(),
            options: CopyOptions::default(),
            force: false,
        }
    }

    /// Set the number of worker threads for directory copies.
    #[must_use]
    pub fn threads(mut self, threads: usize) -> Self {
        self.options = self.options.with_parallel(threads);
        self
    }

    /// Always rewrite destination files from the beginning.
    #[must_use]
    pub fn no_resume(mut self) -> Self {
        self.options = self.options.without_resume();
        self
    }

    /// Skip post-copy SHA-256 verification.
    #[must_use]
    pub fn no_verify(mut self) -> Self {
        self.options = self.options.without_verify();
        self
    }

    /// Also verify files that already look complete.
    #[must_use]
    pub fn verify_skipped(mut self) -> Self {
        self.options = self.options.with_verify_skipped();
        self
    }

    /// Set the streaming/hashing block size.
    #[must_use]
    pub fn block_size(mut self, bytes: usize) -> Self {
        self.options = self.options.with_block_size(bytes);
        self
    }

    /// Disable fsync after writing files.
    #[must_use]
    pub fn no_fsync(mut self) -> Self {
        self.options = self.options.without_fsync();
        self
    }

    /// Proceed even though the destination already exists.
    ///
    /// Existing files are then resumed or overwritten according to the
    /// resume setting.
    #[must_use]
    pub fn force(mut self) -> Self {
        self.force = true;
        self
    }

    /// Register a progress observer.
    #[must_use]
    pub fn progress<S: ProgressSink + 'static>(mut self, sink: S) -> Self {
        self.options = self.options.with_progress(sink);
        self
    }

    /// Register an already-shared progress observer.
    #[must_use]
    pub fn shared_progress(mut self, sink: SharedSink) -> Self {
        self.options = self.options.with_shared_progress(sink);
        self
    }

    /// Set a warning handler.
    #[must_use]
    pub fn warn_handler(mut self, handler: fn(&str)) -> Self {
        self.options = self.options.with_warn_handler(handler);
        self
    }

    /// Get a reference to the current options.
    pub fn options(&self) -> &CopyOptions {
        &self.options
    }

    /// Execute the copy operation.
    ///
    /// Checks the destination first: if it exists and [`force`](Self::force)
    /// was not set, nothing is copied. A directory source goes to
    /// [`copy_dir`], anything else to [`copy_file`].
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Source doesn't exist ([`Error::SourceNotFound`])
    /// - Destination exists without `force()` ([`Error::DestinationExists`])
    /// - Any file fails to copy or verify (see [`copy_file`] / [`copy_dir`])
    pub fn run(self) -> Result<CopyStats> {
        let src_meta = match fs::metadata(&self.src) {
            Ok(meta) => meta,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::SourceNotFound(self.src));
            }
            Err(e) => return Err(Error::io(&self.src, e)),
        };

        if !self.force && fs::symlink_metadata(&self.dst).is_ok() {
            return Err(Error::DestinationExists(self.dst));
        }

        if src_meta.is_dir() {
            copy_dir(&self.src, &self.dst, &self.options)
        } else {
            let start = Instant::now();
            let result = copy_file(&self.src, &self.dst, &self.options);
            let mut stats = CopyStats::default();
            stats.record(&result);
            result?;
            stats.duration = start.elapsed();
            Ok(stats)
        }
    }
}
