//! # Core Module
//!
//! The inventory engine, independent of any front end.
//!
//! ## Modules
//! - `volume` - Volume identifiers and their roots
//! - `scanner` - Skip rules, path forms and the directory walk
//! - `hasher` - Streaming content digests
//! - `warnings` - Rate-limited recoverable errors
//! - `inventory` - File records and grouping by digest
//! - `reporter` - Index, duplicates and status artifacts
//! - `pipeline` - Orchestrates the full run

pub mod hasher;
pub mod inventory;
pub mod pipeline;
pub mod reporter;
pub mod scanner;
pub mod volume;
pub mod warnings;

// Re-export commonly used types
pub use hasher::{ContentHasher, Sha256Hasher};
pub use inventory::{Aggregator, FileRecord, HashGroup};
pub use pipeline::{Pipeline, RunOutcome};
pub use reporter::{ArtifactPaths, DuplicateCounts};
pub use scanner::{DirectoryWalker, PathPolicy};
pub use volume::Volume;
pub use warnings::WarningTracker;
