//! # Hasher Module
//!
//! Computes content digests for files.
//!
//! ## How It Works
//! 1. Open the file through its access-form path
//! 2. Feed fixed-size chunks (1 MiB by default) into a streaming SHA-256
//! 3. Render the final digest as uppercase hexadecimal
//!
//! Peak memory is one chunk regardless of file size.
//!
//! ## Example
//! ```rust,ignore
//! use drive_inventory::core::hasher::{ContentHasher, Sha256Hasher};
//!
//! let hasher = Sha256Hasher::new();
//! let digest = hasher.digest(&path)?;
//! assert_eq!(digest.len(), 64);
//! ```

mod sha256;

pub use sha256::{Sha256Hasher, DEFAULT_CHUNK_SIZE, DIGEST_HEX_LEN};

use crate::error::HashError;
use std::path::Path;

/// Trait for content hashers
///
/// Implement this trait to swap the digest algorithm or to inject
/// failures in tests.
pub trait ContentHasher: Send + Sync {
    /// Digest the full byte content of the file at `path`
    fn digest(&self, path: &Path) -> Result<String, HashError>;
}
