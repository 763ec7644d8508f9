//! Configuration options for copy operations.
//!
//! This module provides [`CopyOptions`], the single configuration surface
//! shared by the copy engine, the directory orchestrator and the builder.
//!
//! # Example
//!
//! ```
//! use beastcp::CopyOptions;
//!
//! let options = CopyOptions::default()
//!     .with_parallel(8)
//!     .without_resume()
//!     .with_block_size(64 * 1024);
//! ```

use crate::progress::{ProgressEvent, ProgressSink, SharedSink};

/// Default block size for streaming and hashing (1 MiB).
pub const DEFAULT_BLOCK_SIZE: usize = 1024 * 1024;

/// Default number of directory-copy workers.
pub const DEFAULT_PARALLEL: usize = 4;

/// Options for copy operations.
///
/// Use [`Default::default()`] to get sensible defaults, then customize
/// using the builder methods.
///
/// # Default Values
///
/// | Field | Default | Description |
/// |-------|---------|-------------|
/// | `parallel` | 4 | Directory-copy worker threads |
/// | `resume` | `true` | Append to a shorter existing destination |
/// | `verify` | `true` | Compare SHA-256 digests after copying |
/// | `verify_skipped` | `false` | Also hash files hit by the size fast-path |
/// | `block_size` | 1 MiB | Read/write/hash block size |
/// | `fsync` | `true` | Sync destination to disk before verifying |
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(clippy::struct_excessive_bools)]
pub struct CopyOptions {
    /// Number of worker threads for directory copies (default: 4)
    pub parallel: usize,

    /// Resume from the current destination size when it exists (default: true)
    ///
    /// When false, an existing destination is truncated and rewritten.
    pub resume: bool,

    /// Verify source and destination digests after copying (default: true)
    pub verify: bool,

    /// Hash a destination that already looks complete (default: false)
    ///
    /// Without this, a resumed task whose destination is at least as large
    /// as the source is accepted on size alone and never re-read.
    pub verify_skipped: bool,

    /// Block size used for streaming and hashing (default: 1 MiB)
    pub block_size: usize,

    /// Whether to sync the destination to disk after writing (default: true)
    pub fsync: bool,

    /// Callback for warnings (optional)
    ///
    /// If not set and `tracing` feature is enabled, warnings are logged via tracing.
    /// Otherwise, warnings are silently ignored.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub warn_handler: Option<fn(&str)>,

    /// Observer receiving per-task progress events (optional)
    #[cfg_attr(feature = "serde", serde(skip))]
    pub progress: Option<SharedSink>,
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self {
            parallel: DEFAULT_PARALLEL,
            resume: true,
            verify: true,
            verify_skipped: false,
            block_size: DEFAULT_BLOCK_SIZE,
            fsync: true,
            warn_handler: None,
            progress: None,
        }
    }
}

impl CopyOptions {
    /// Create options with a warning handler
    #[must_use]
    pub fn with_warn_handler(mut self, handler: fn(&str)) -> Self {
        self.warn_handler = Some(handler);
        self
    }

    /// Set the number of directory-copy workers
    ///
    /// Value is clamped to at least 1.
    #[must_use]
    pub fn with_parallel(mut self, n: usize) -> Self {
        self.parallel = n.max(1);
        self
    }

    /// Always rewrite destinations from offset 0
    #[must_use]
    pub fn without_resume(mut self) -> Self {
        self.resume = false;
        self
    }

    /// Skip post-copy digest comparison
    #[must_use]
    pub fn without_verify(mut self) -> Self {
        self.verify = false;
        self
    }

    /// Hash destinations accepted by the size fast-path as well
    ///
    /// Only has an effect while `verify` is enabled.
    #[must_use]
    pub fn with_verify_skipped(mut self) -> Self {
        self.verify_skipped = true;
        self
    }

    /// Set the streaming/hashing block size
    ///
    /// Value is clamped to at least 1 byte.
    #[must_use]
    pub fn with_block_size(mut self, bytes: usize) -> Self {
        self.block_size = bytes.max(1);
        self
    }

    /// Disable fsync for faster (but less durable) copies
    #[must_use]
    pub fn without_fsync(mut self) -> Self {
        self.fsync = false;
        self
    }

    /// Register a progress observer
    #[must_use]
    pub fn with_progress<S: ProgressSink + 'static>(mut self, sink: S) -> Self {
        self.progress = Some(SharedSink::new(sink));
        self
    }

    /// Register an already-shared progress observer
    #[must_use]
    pub fn with_shared_progress(mut self, sink: SharedSink) -> Self {
        self.progress = Some(sink);
        self
    }

    pub(crate) fn emit(&self, event: &ProgressEvent<'_>) {
        if let Some(sink) = &self.progress {
            sink.on_event(event);
        }
    }

    pub(crate) fn warn(&self, msg: &str) {
        if let Some(handler) = self.warn_handler {
            handler(msg);
        } else {
            #[cfg(feature = "tracing")]
            tracing::warn!("{}", msg);
        }
    }

    #[allow(clippy::unused_self)]
    pub(crate) fn verbose(&self, msg: &str) {
        #[cfg(feature = "tracing")]
        tracing::debug!("{}", msg);
        #[cfg(not(feature = "tracing"))]
        let _ = msg;
    }
}
