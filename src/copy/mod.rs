//! Core copy operations.
//!
//! This module provides the single-file copy engine (resume, stream,
//! verify) and the directory orchestrator that runs it across a bounded
//! worker pool.

mod dir;
mod file;
mod utils;

// Re-export public API
pub use dir::{CopyStats, TaskReport, TreeReport, copy_dir, copy_tree, plan_tree, run_tree};
pub use file::{copy_file, execute};
