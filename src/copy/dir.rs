//! Directory copy operations.
//!
//! This module fans the copy engine out over a directory tree: it takes a
//! snapshot of every regular file, maps each one onto the destination root,
//! and runs one [`CopyTask`] per file on a bounded worker pool.

use crate::error::{Error, FileFailure, Result};
use crate::options::CopyOptions;
use crate::task::{CopyOutcome, CopyTask, TaskId};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use super::file::execute;

/// Statistics from a copy operation.
///
/// # Example
///
/// ```no_run
/// use beastcp::{copy_dir, CopyOptions};
/// use std::path::Path;
///
/// let stats = copy_dir(Path::new("src"), Path::new("dst"), &CopyOptions::default())?;
/// println!("{} files processed", stats.files_processed());
/// println!("Copied {} files ({} bytes)", stats.files_copied, stats.bytes_copied);
/// # Ok::<(), beastcp::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyStats {
    /// Number of files that had bytes transferred
    pub files_copied: u64,
    /// Number of files resolved by the size fast-path
    pub files_skipped: u64,
    /// Number of files that failed
    pub files_failed: u64,
    /// Number of copied files whose digests were compared
    pub files_verified: u64,
    /// Total bytes written during this run
    pub bytes_copied: u64,
    /// Duration of the copy operation
    pub duration: Duration,
}

impl CopyStats {
    /// Every file that was handled, whatever its outcome.
    #[must_use]
    pub fn files_processed(&self) -> u64 {
        self.files_copied + self.files_skipped + self.files_failed
    }

    /// Count one task's result.
    pub fn record(&mut self, result: &Result<CopyOutcome>) {
        match result {
            Ok(CopyOutcome::Copied {
                bytes_written,
                verified,
                ..
            }) => {
                self.files_copied += 1;
                self.bytes_copied += bytes_written;
                if *verified {
                    self.files_verified += 1;
                }
            }
            Ok(CopyOutcome::SkippedAlreadyComplete) => self.files_skipped += 1,
            Err(_) => self.files_failed += 1,
        }
    }
}

/// One task of a directory copy together with how it resolved.
#[derive(Debug)]
pub struct TaskReport {
    /// The planned task
    pub task: CopyTask,
    /// How the task resolved
    pub result: Result<CopyOutcome>,
}

/// Every per-file result of a directory copy, in enumeration order.
///
/// The tree copy always waits for all tasks; this report is what the
/// aggregate decision in [`TreeReport::into_result`] is made from.
#[derive(Debug, Default)]
pub struct TreeReport {
    /// One entry per planned task, in enumeration order
    pub entries: Vec<TaskReport>,
    /// Wall-clock time of the copy
    pub duration: Duration,
}

impl TreeReport {
    /// Counters over all entries.
    #[must_use]
    pub fn stats(&self) -> CopyStats {
        let mut stats = CopyStats {
            duration: self.duration,
            ..CopyStats::default()
        };
        for entry in &self.entries {
            stats.record(&entry.result);
        }
        stats
    }

    /// Entries that resolved with an error, in enumeration order.
    pub fn failures(&self) -> impl Iterator<Item = &TaskReport> {
        self.entries.iter().filter(|entry| entry.result.is_err())
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures().next().is_none()
    }

    /// Collapse into an aggregate result.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PartialCopy`] listing every failed file when at
    /// least one task failed.
    pub fn into_result(self) -> Result<CopyStats> {
        let stats = self.stats();
        let total = self.entries.len();

        let failures: Vec<FileFailure> = self
            .entries
            .into_iter()
            .filter_map(|entry| match entry.result {
                Ok(_) => None,
                Err(error) => Some(FileFailure {
                    source: entry.task.source().to_path_buf(),
                    destination: entry.task.destination().to_path_buf(),
                    error,
                }),
            })
            .collect();

        if failures.is_empty() {
            Ok(stats)
        } else {
            Err(Error::PartialCopy {
                failed: failures.len(),
                total,
                failures,
            })
        }
    }
}

/// Copy a directory recursively with parallel file operations
///
/// Equivalent to [`copy_tree`] followed by [`TreeReport::into_result`].
///
/// # Errors
///
/// Returns an error if:
/// - Source does not exist ([`Error::SourceNotFound`])
/// - Source is not a directory ([`Error::NotADirectory`])
/// - The tree cannot be enumerated or the destination root created ([`Error::Io`])
/// - The worker pool cannot be built ([`Error::ThreadPool`])
/// - Some files failed to copy ([`Error::PartialCopy`])
pub fn copy_dir(src: &Path, dst: &Path, options: &CopyOptions) -> Result<CopyStats> {
    copy_tree(src, dst, options)?.into_result()
}

/// Copy a directory tree and report every file's outcome
///
/// # Strategy
///
/// 1. Snapshot every regular file under `src` (sorted by name, symlinks and
///    special files excluded), see [`plan_tree`]
/// 2. Re-root each relative path onto `dst`
/// 3. Run one task per file on a pool of exactly `options.parallel` threads
/// 4. Join all tasks; no task is cancelled when a sibling fails
///
/// Per-file failures are recorded in the returned [`TreeReport`], not
/// returned as `Err`.
///
/// # Errors
///
/// Returns an error only for failures before any file is copied: missing or
/// non-directory source, enumeration errors, destination root creation,
/// worker pool construction.
pub fn copy_tree(src: &Path, dst: &Path, options: &CopyOptions) -> Result<TreeReport> {
    let start_time = Instant::now();
    let tasks = plan_tree(src, dst, options)?;
    let mut report = run_tree(dst, tasks, options)?;
    report.duration = start_time.elapsed();
    Ok(report)
}

/// Snapshot the files under `src` as tasks targeting `dst`.
///
/// Task ids follow enumeration order. Nothing is written.
///
/// # Errors
///
/// [`Error::SourceNotFound`], [`Error::NotADirectory`], or [`Error::Io`]
/// when a directory cannot be read.
pub fn plan_tree(src: &Path, dst: &Path, options: &CopyOptions) -> Result<Vec<CopyTask>> {
    if !src.exists() {
        return Err(Error::SourceNotFound(src.to_path_buf()));
    }

    if !src.is_dir() {
        return Err(Error::NotADirectory(src.to_path_buf()));
    }

    let mut files: Vec<(PathBuf, PathBuf)> = Vec::new();
    collect_files(src, dst, &mut files, options)?;

    let tasks: Vec<CopyTask> = files
        .into_iter()
        .enumerate()
        .map(|(i, (src_file, dst_file))| {
            CopyTask::from_options(TaskId(i as u64), src_file, dst_file, options)
        })
        .collect();

    options.verbose(&format!(
        "found {} files under {}, copying with {} workers",
        tasks.len(),
        src.display(),
        options.parallel
    ));

    Ok(tasks)
}

/// Run planned tasks into the destination root `dst`.
///
/// Results are returned in the order of `tasks`, whatever order the workers
/// finished in.
///
/// # Errors
///
/// [`Error::Io`] if `dst` cannot be created, [`Error::ThreadPool`] if the
/// worker pool cannot be built.
pub fn run_tree(dst: &Path, tasks: Vec<CopyTask>, options: &CopyOptions) -> Result<TreeReport> {
    let start_time = Instant::now();

    // Ancestors of each file are created per task
    fs::create_dir_all(dst).map_err(|e| Error::io(dst, e))?;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.parallel.max(1))
        .thread_name(|i| format!("beastcp-worker-{i}"))
        .build()
        .map_err(|e| Error::ThreadPool(e.to_string()))?;

    let results: Vec<Result<CopyOutcome>> = pool.install(|| {
        tasks
            .par_iter()
            .with_max_len(1)
            .map(|task| {
                let result = execute(task, options);
                if let Err(e) = &result {
                    options.warn(&format!("Failed to copy {}: {}", task.source().display(), e));
                }
                result
            })
            .collect()
    });

    let entries = tasks
        .into_iter()
        .zip(results)
        .map(|(task, result)| TaskReport { task, result })
        .collect();

    Ok(TreeReport {
        entries,
        duration: start_time.elapsed(),
    })
}

/// Recursively collect every regular file to copy, in file-name order
fn collect_files(
    src: &Path,
    dst: &Path,
    files: &mut Vec<(PathBuf, PathBuf)>,
    options: &CopyOptions,
) -> Result<()> {
    let mut entries = fs::read_dir(src)
        .map_err(|e| Error::io(src, e))?
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(|e| Error::io(src, e))?;
    entries.sort_by_key(fs::DirEntry::file_name);

    for entry in entries {
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        // file_type() does not follow symlinks
        let file_type = entry.file_type().map_err(|e| Error::io(&src_path, e))?;

        if file_type.is_symlink() {
            options.verbose(&format!("skipping symlink {}", src_path.display()));
        } else if file_type.is_dir() {
            collect_files(&src_path, &dst_path, files, options)?;
        } else if file_type.is_file() {
            files.push((src_path, dst_path));
        } else {
            // Skip special files (sockets, devices, etc.) with warning
            options.warn(&format!("Skipping special file: {}", src_path.display()));
        }
    }

    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
