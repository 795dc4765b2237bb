//! Streaming SHA-256 implementation.

use super::ContentHasher;
use crate::error::HashError;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

/// Bytes read per chunk
pub const DEFAULT_CHUNK_SIZE: usize = 1024 * 1024;

/// Length of a rendered digest
pub const DIGEST_HEX_LEN: usize = 64;

/// SHA-256 over the file content, read in fixed-size chunks
#[derive(Debug, Clone)]
pub struct Sha256Hasher {
    chunk_size: usize,
}

impl Sha256Hasher {
    /// Create a hasher with the default 1 MiB chunk size
    pub fn new() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Set the chunk size (clamped to at least one byte)
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size.max(1);
        self
    }
}

impl Default for Sha256Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentHasher for Sha256Hasher {
    fn digest(&self, path: &Path) -> Result<String, HashError> {
        let unreadable = |source| HashError::Unreadable {
            path: path.to_path_buf(),
            source,
        };

        let mut file = File::open(path).map_err(unreadable)?;
        let mut hasher = Sha256::new();
        let mut buffer = vec![0u8; self.chunk_size];

        loop {
            match file.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => hasher.update(&buffer[..n]),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(unreadable(e)),
            }
        }

        Ok(hex::encode_upper(hasher.finalize()))
    }
}
