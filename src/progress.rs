//! Progress reporting through an observer interface.
//!
//! The copy engine never renders anything itself. It emits
//! [`ProgressEvent`]s to the [`ProgressSink`] registered in
//! [`CopyOptions`](crate::CopyOptions); a terminal progress bar is just one
//! possible sink (see `TerminalProgress`, behind the `progress` feature).
//!
//! Events are delivered synchronously on the worker thread executing the
//! task, so a sink sees the events of one task in order.

use crate::error::Error;
use crate::task::{CopyOutcome, TaskId};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// A progress notification for one task.
#[derive(Debug)]
pub enum ProgressEvent<'a> {
    /// Streaming is about to begin
    Started {
        task: TaskId,
        source: &'a Path,
        destination: &'a Path,
        bytes_total: u64,
        /// Resume offset (0 for a fresh copy)
        bytes_done: u64,
    },
    /// One block was written
    Transferred {
        task: TaskId,
        bytes_done: u64,
        bytes_total: u64,
    },
    /// Streaming finished; digests are about to be computed
    Verifying { task: TaskId, destination: &'a Path },
    /// Task resolved successfully
    Finished { task: TaskId, outcome: CopyOutcome },
    /// Task resolved with an error
    Failed { task: TaskId, error: &'a Error },
}

impl ProgressEvent<'_> {
    /// Task this event belongs to.
    #[must_use]
    pub fn task(&self) -> TaskId {
        match self {
            Self::Started { task, .. }
            | Self::Transferred { task, .. }
            | Self::Verifying { task, .. }
            | Self::Finished { task, .. }
            | Self::Failed { task, .. } => *task,
        }
    }
}

/// Receives progress events. Must tolerate calls from several worker
/// threads at once.
pub trait ProgressSink: Send + Sync {
    fn on_event(&self, event: &ProgressEvent<'_>);
}

impl<F> ProgressSink for F
where
    F: Fn(&ProgressEvent<'_>) + Send + Sync,
{
    fn on_event(&self, event: &ProgressEvent<'_>) {
        self(event);
    }
}

/// Cloneable handle to a registered [`ProgressSink`].
#[derive(Clone)]
pub struct SharedSink(Arc<dyn ProgressSink>);

impl SharedSink {
    pub fn new<S: ProgressSink + 'static>(sink: S) -> Self {
        Self(Arc::new(sink))
    }

    pub fn from_arc(sink: Arc<dyn ProgressSink>) -> Self {
        Self(sink)
    }
}

impl ProgressSink for SharedSink {
    fn on_event(&self, event: &ProgressEvent<'_>) {
        self.0.on_event(event);
    }
}

impl fmt::Debug for SharedSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedSink(..)")
    }
}

/// Byte counters for one in-flight transfer.
///
/// `bytes_done` never decreases and never exceeds `bytes_total`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TransferProgress {
    bytes_total: u64,
    bytes_done: u64,
}

impl TransferProgress {
    pub(crate) fn new(bytes_total: u64, bytes_done: u64) -> Self {
        Self {
            bytes_total,
            bytes_done: bytes_done.min(bytes_total),
        }
    }

    pub(crate) fn advance(&mut self, n: u64) {
        self.bytes_done = self.bytes_done.saturating_add(n).min(self.bytes_total);
    }

    pub(crate) fn bytes_total(&self) -> u64 {
        self.bytes_total
    }

    pub(crate) fn bytes_done(&self) -> u64 {
        self.bytes_done
    }

    pub(crate) fn remaining(&self) -> u64 {
        self.bytes_total - self.bytes_done
    }
}

#[cfg(feature = "progress")]
pub use terminal::{TerminalProgress, create_progress_bar};

#[cfg(feature = "progress")]
mod terminal {
    use super::{ProgressEvent, ProgressSink};
    use crate::task::TaskId;
    use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Create a default progress bar counting finished files
    #[must_use]
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} files ({eta})")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        pb
    }

    fn byte_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{msg:30!} [{bar:30.green/dim}] {bytes}/{total_bytes} {bytes_per_sec} ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    /// Console sink: one byte bar per in-flight file, plus an optional
    /// files bar for directory copies.
    pub struct TerminalProgress {
        multi: MultiProgress,
        files: Option<ProgressBar>,
        bars: Mutex<HashMap<TaskId, ProgressBar>>,
    }

    impl TerminalProgress {
        /// Sink for a single-file copy.
        #[must_use]
        pub fn new() -> Self {
            Self {
                multi: MultiProgress::new(),
                files: None,
                bars: Mutex::new(HashMap::new()),
            }
        }

        /// Sink for a directory copy of `total_files` files.
        #[must_use]
        pub fn with_file_count(total_files: u64) -> Self {
            let multi = MultiProgress::new();
            let files = multi.add(create_progress_bar(total_files));
            Self {
                multi,
                files: Some(files),
                bars: Mutex::new(HashMap::new()),
            }
        }

        /// Clear every bar from the terminal.
        pub fn finish(&self) {
            if let Ok(mut bars) = self.bars.lock() {
                for (_, pb) in bars.drain() {
                    pb.finish_and_clear();
                }
            }
            if let Some(files) = &self.files {
                files.finish_and_clear();
            }
        }

        fn file_done(&self) {
            if let Some(files) = &self.files {
                files.inc(1);
            }
        }

        fn remove_bar(&self, task: TaskId) {
            let bar = self.bars.lock().ok().and_then(|mut bars| bars.remove(&task));
            if let Some(pb) = bar {
                pb.finish_and_clear();
                self.multi.remove(&pb);
            }
        }
    }

    impl Default for TerminalProgress {
        fn default() -> Self {
            Self::new()
        }
    }

    impl ProgressSink for TerminalProgress {
        fn on_event(&self, event: &ProgressEvent<'_>) {
            match event {
                ProgressEvent::Started {
                    task,
                    source,
                    bytes_total,
                    bytes_done,
                    ..
                } => {
                    let pb = self.multi.add(ProgressBar::new(*bytes_total));
                    pb.set_style(byte_style());
                    let name = source
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| source.display().to_string());
                    pb.set_message(format!("Copying {name}"));
                    pb.set_position(*bytes_done);
                    if let Ok(mut bars) = self.bars.lock() {
                        bars.insert(*task, pb);
                    }
                }
                ProgressEvent::Transferred {
                    task, bytes_done, ..
                } => {
                    if let Ok(bars) = self.bars.lock() {
                        if let Some(pb) = bars.get(task) {
                            pb.set_position(*bytes_done);
                        }
                    }
                }
                ProgressEvent::Verifying { task, .. } => {
                    if let Ok(bars) = self.bars.lock() {
                        if let Some(pb) = bars.get(task) {
                            let message = pb.message();
                            let name = message.trim_start_matches("Copying ");
                            pb.set_message(format!("Verifying {name}"));
                        }
                    }
                }
                ProgressEvent::Finished { task, .. } | ProgressEvent::Failed { task, .. } => {
                    self.remove_bar(*task);
                    self.file_done();
                }
            }
        }
    }
}
