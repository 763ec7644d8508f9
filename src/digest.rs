//! Streaming SHA-256 content digests used for post-copy verification.

use crate::error::{Error, Result};
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// SHA-256 digest of a file's full contents.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileDigest([u8; 32]);

impl FileDigest {
    /// Raw digest bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for FileDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for FileDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileDigest({self})")
    }
}

/// Hash everything `reader` yields, `block_size` bytes at a time.
///
/// Memory use is bounded by one block regardless of input length.
pub fn sha256_reader<R: Read>(mut reader: R, block_size: usize) -> io::Result<FileDigest> {
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; block_size.max(1)];
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buf[..n]);
    }
    Ok(FileDigest(hasher.finalize().into()))
}

/// Hash a file from offset 0 to EOF.
///
/// # Errors
///
/// Returns [`Error::Io`] naming `path` if it cannot be opened or read.
pub fn sha256_file(path: &Path, block_size: usize) -> Result<FileDigest> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    sha256_reader(file, block_size).map_err(|e| Error::io(path, e))
}
