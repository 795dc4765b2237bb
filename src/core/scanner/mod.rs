//! # Scanner Module
//!
//! Discovers files on a volume.
//!
//! ## Skip Rules
//! Directories pruned from every walk (case-insensitive):
//! - `System Volume Information`, `$RECYCLE.BIN`, `RECYCLER`
//! - `_QUARANTINE` and `_QUARANTINE_FROM_*` staging folders
//! - chkdsk recovery folders `FOUND.nnn`
//!
//! Pruning is a policy decision, not an error: nothing is logged above
//! debug level for it.
//!
//! ## Example
//! ```rust,ignore
//! use drive_inventory::core::scanner::{DirectoryWalker, PathPolicy};
//!
//! let walker = DirectoryWalker::new(PathPolicy::new());
//! for path in walker.walk(&volume, &warnings) {
//!     println!("{}", path.display());
//! }
//! ```

mod policy;
mod walker;

pub use policy::{PathPolicy, DISPLAY_SEPARATOR};
pub use walker::{DirectoryWalker, VolumeWalk};
