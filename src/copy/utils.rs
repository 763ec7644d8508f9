//! Utility functions for file copy operations.
//!
//! Helpers shared by the copy engine: ancestor creation and the
//! block-by-block streaming loop.

use crate::error::{Error, Result};
use crate::progress::TransferProgress;
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

// =============================================================================
// Destination preparation
// =============================================================================

/// Create every missing ancestor directory of `dst`.
///
/// Idempotent: existing directories are not an error.
pub(crate) fn ensure_parent_dir(dst: &Path) -> Result<()> {
    match dst.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))
        }
        _ => Ok(()),
    }
}

// =============================================================================
// Block streaming
// =============================================================================

/// Stream the remaining `progress.remaining()` bytes of `reader` into
/// `writer`, one block at a time, in order.
///
/// `on_block` is called after every successful write. Read failures are
/// attributed to `src_path`, write failures to `dst_path`. Returns the
/// number of bytes written.
pub(crate) fn copy_blocks<R: Read, W: Write>(
    reader: R,
    writer: &mut W,
    block_size: usize,
    progress: &mut TransferProgress,
    src_path: &Path,
    dst_path: &Path,
    mut on_block: impl FnMut(&TransferProgress),
) -> Result<u64> {
    // Never read past the size observed at task start
    let mut reader = reader.take(progress.remaining());
    let mut buf = vec![0u8; block_size.max(1)];
    let mut written: u64 = 0;

    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(Error::io(src_path, e)),
        };

        writer
            .write_all(&buf[..n])
            .map_err(|e| Error::io(dst_path, e))?;

        written += n as u64;
        progress.advance(n as u64);
        on_block(progress);
    }

    writer.flush().map_err(|e| Error::io(dst_path, e))?;
    Ok(written)
}

// =============================================================================
// Tests
// =============================================================================
