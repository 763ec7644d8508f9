//! Single file copy operations.
//!
//! This module implements the copy engine: the resume decision, the
//! block-by-block transfer, and post-copy digest verification for one
//! [`CopyTask`].

use crate::digest::sha256_file;
use crate::error::{Error, Result};
use crate::options::CopyOptions;
use crate::progress::{ProgressEvent, TransferProgress};
use crate::task::{CopyOutcome, CopyTask, TaskId};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Seek, SeekFrom};
use std::path::Path;

use super::utils::{copy_blocks, ensure_parent_dir};

/// Copy a single file, resuming and verifying according to `options`
///
/// Builds a [`CopyTask`] from `options.resume` / `options.verify` and runs
/// it with [`execute`].
///
/// # Arguments
///
/// * `src` - Source file path
/// * `dst` - Destination file path
/// * `options` - Copy options
///
/// # Errors
///
/// See [`execute`].
pub fn copy_file(src: &Path, dst: &Path, options: &CopyOptions) -> Result<CopyOutcome> {
    let task = CopyTask::from_options(TaskId(0), src, dst, options);
    execute(&task, options)
}

/// Run one copy task to its terminal outcome
///
/// 1. The source size at invocation is the transfer total.
/// 2. Missing ancestors of the destination are created.
/// 3. With `resume`, an existing destination at least as large as the
///    source resolves [`CopyOutcome::SkippedAlreadyComplete`] without
///    reading either file; a shorter one is appended to from its current
///    size. Otherwise the destination is truncated.
/// 4. The remaining bytes are streamed in `options.block_size` blocks.
/// 5. With `verify`, both files are hashed from offset 0 and compared.
///
/// Nothing is cleaned up on failure: a partial destination stays on disk
/// for a later resumed run.
///
/// # Errors
///
/// Returns an error if:
/// - Source or destination is a directory ([`Error::IsADirectory`])
/// - Any read, write, open or metadata call fails ([`Error::Io`])
/// - The source ends before the size observed at start ([`Error::Io`],
///   kind `UnexpectedEof`)
/// - Digests differ after the copy ([`Error::HashMismatch`])
pub fn execute(task: &CopyTask, options: &CopyOptions) -> Result<CopyOutcome> {
    let result = run_task(task, options);
    match &result {
        Ok(outcome) => options.emit(&ProgressEvent::Finished {
            task: task.id(),
            outcome: *outcome,
        }),
        Err(error) => options.emit(&ProgressEvent::Failed {
            task: task.id(),
            error,
        }),
    }
    result
}

fn run_task(task: &CopyTask, options: &CopyOptions) -> Result<CopyOutcome> {
    let src = task.source();
    let dst = task.destination();

    let src_meta = fs::metadata(src).map_err(|e| Error::io(src, e))?;
    if src_meta.is_dir() {
        return Err(Error::IsADirectory(src.to_path_buf()));
    }
    let bytes_total = src_meta.len();

    ensure_parent_dir(dst)?;

    let existing = match fs::metadata(dst) {
        Ok(meta) if meta.is_dir() => return Err(Error::IsADirectory(dst.to_path_buf())),
        Ok(meta) => Some(meta.len()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => None,
        Err(e) => return Err(Error::io(dst, e)),
    };

    let resume_from = match existing {
        Some(existing) if task.resume() => {
            if existing >= bytes_total {
                return skip_complete(task, options, existing, bytes_total);
            }
            existing
        }
        _ => 0,
    };

    let mut src_file = File::open(src).map_err(|e| Error::io(src, e))?;
    let mut dst_file = if resume_from > 0 {
        src_file
            .seek(SeekFrom::Start(resume_from))
            .map_err(|e| Error::io(src, e))?;
        OpenOptions::new().append(true).open(dst)
    } else {
        File::create(dst)
    }
    .map_err(|e| Error::io(dst, e))?;

    if resume_from > 0 {
        options.verbose(&format!(
            "resuming {} at byte {} of {}",
            dst.display(),
            resume_from,
            bytes_total
        ));
    }

    let mut progress = TransferProgress::new(bytes_total, resume_from);
    options.emit(&ProgressEvent::Started {
        task: task.id(),
        source: src,
        destination: dst,
        bytes_total: progress.bytes_total(),
        bytes_done: progress.bytes_done(),
    });

    let bytes_written = copy_blocks(
        &mut src_file,
        &mut dst_file,
        options.block_size,
        &mut progress,
        src,
        dst,
        |p| {
            options.emit(&ProgressEvent::Transferred {
                task: task.id(),
                bytes_done: p.bytes_done(),
                bytes_total: p.bytes_total(),
            });
        },
    )?;

    if progress.bytes_done() < bytes_total {
        return Err(Error::io(
            src,
            io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "source ended after {} of {} bytes",
                    progress.bytes_done(),
                    bytes_total
                ),
            ),
        ));
    }

    if options.fsync {
        dst_file.sync_all().map_err(|e| Error::io(dst, e))?;
    }
    drop(dst_file);
    drop(src_file);

    let verified = if task.verify() {
        verify_digests(task, options)?;
        true
    } else {
        false
    };

    options.verbose(&format!(
        "copied {} -> {} ({} bytes written{})",
        src.display(),
        dst.display(),
        bytes_written,
        if verified { ", verified" } else { "" }
    ));

    Ok(CopyOutcome::Copied {
        bytes_written,
        resumed_from: resume_from,
        verified,
    })
}

/// Size fast-path: the destination already holds at least `bytes_total` bytes.
fn skip_complete(
    task: &CopyTask,
    options: &CopyOptions,
    existing: u64,
    bytes_total: u64,
) -> Result<CopyOutcome> {
    if task.verify() && options.verify_skipped {
        verify_digests(task, options)?;
    }

    options.verbose(&format!(
        "skipped {} ({} bytes present, source has {})",
        task.destination().display(),
        existing,
        bytes_total
    ));
    Ok(CopyOutcome::SkippedAlreadyComplete)
}

fn verify_digests(task: &CopyTask, options: &CopyOptions) -> Result<()> {
    options.emit(&ProgressEvent::Verifying {
        task: task.id(),
        destination: task.destination(),
    });

    let source_digest = sha256_file(task.source(), options.block_size)?;
    let destination_digest = sha256_file(task.destination(), options.block_size)?;

    if source_digest != destination_digest {
        return Err(Error::HashMismatch {
            source_file: task.source().to_path_buf(),
            destination: task.destination().to_path_buf(),
            source_digest,
            destination_digest,
        });
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
