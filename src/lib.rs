//! # Drive Inventory
//!
//! Indexes files across storage volumes by content hash and reports the
//! duplicates.
//!
//! ## Core Philosophy
//! - **Never abort a volume** - unreadable entries are warned about and skipped
//! - **Never touch the files** - reads only; nothing is moved or deleted
//! - **Deterministic output** - same tree in, same reports out
//!
//! ## Architecture
//! The library is split into a core engine and presentation layers:
//! - `core` - Scanning, hashing, grouping and report writing
//! - `events` - Event-driven progress reporting (GUI-ready)
//! - `error` - Error types
//! - `logging` - The run log
//! - `cli` - Command-line interface (binary only)

pub mod core;
pub mod error;
pub mod events;
pub mod logging;

// Re-export commonly used types at the crate root
pub use error::{InventoryError, Result};

/// Initialize console-only tracing for embedders.
///
/// The CLI uses [`logging::RunLog`] instead, which also writes the run log file.
pub fn init_tracing() {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set global default tracing subscriber");
}
