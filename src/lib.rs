//! # beastcp
//!
//! Resumable, verified, parallel file/directory copying for Rust.
//!
//! ## Core Features
//!
//! - **Resumable**: An existing, shorter destination is treated as a valid
//!   prefix and appended to; a destination that is already complete is
//!   skipped on size alone
//! - **Verified**: Source and destination are compared by streaming SHA-256
//!   digests after the copy
//! - **Parallel**: Directory copies run one task per file on a bounded
//!   rayon worker pool (default 4 workers)
//! - **Fully reported**: Every file's outcome is collected; failures are
//!   reported as a complete list, never just "something failed"
//! - **Observable**: Progress is delivered to a pluggable [`ProgressSink`]
//!
//! ## Quick Start with Builder API
//!
//! ```no_run
//! use beastcp::CopyBuilder;
//!
//! let stats = CopyBuilder::new("src", "dst").threads(8).run()?;
//! println!("Copied {} files ({} bytes)", stats.files_copied, stats.bytes_copied);
//! # Ok::<(), beastcp::Error>(())
//! ```
//!
//! ## Function API
//!
//! ```no_run
//! use beastcp::{copy_file, CopyOptions, CopyOutcome};
//! use std::path::Path;
//!
//! let options = CopyOptions::default().with_block_size(256 * 1024);
//! match copy_file(Path::new("disk.img"), Path::new("/mnt/disk.img"), &options)? {
//!     CopyOutcome::Copied { bytes_written, resumed_from, .. } => {
//!         println!("wrote {bytes_written} bytes starting at {resumed_from}");
//!     }
//!     CopyOutcome::SkippedAlreadyComplete => println!("already complete"),
//! }
//! # Ok::<(), beastcp::Error>(())
//! ```
//!
//! ## Integrity Caveats
//!
//! Resume trusts the existing destination bytes: they are assumed to be a
//! valid prefix of the source. Verification catches a bad prefix after the
//! transfer. A destination that is already at least as large as the source
//! is accepted without reading it unless
//! [`CopyOptions::verify_skipped`] is enabled.
//!
//! ## Optional Features
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `progress` | Terminal progress bars with indicatif |
//! | `tracing` | Structured logging with tracing crate |
//! | `serde` | Serialize/Deserialize for [`CopyOptions`] |
//! | `full` | Enable all optional features |

#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
mod copy;
mod digest;
mod error;
mod options;
mod progress;
mod task;

pub use builder::CopyBuilder;
pub use copy::{
    CopyStats, TaskReport, TreeReport, copy_dir, copy_file, copy_tree, execute, plan_tree, run_tree,
};
pub use digest::{FileDigest, sha256_file, sha256_reader};
pub use error::{Error, ErrorCode, FileFailure, Result, is_no_space_error};
pub use options::{CopyOptions, DEFAULT_BLOCK_SIZE, DEFAULT_PARALLEL};
pub use progress::{ProgressEvent, ProgressSink, SharedSink};
pub use task::{CopyOutcome, CopyTask, TaskId};

#[cfg(feature = "progress")]
#[cfg_attr(docsrs, doc(cfg(feature = "progress")))]
pub use progress::{TerminalProgress, create_progress_bar};
