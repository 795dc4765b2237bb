//! # Inventory Module
//!
//! Builds file records and groups them by content digest.
//!
//! ## Flow
//! 1. [`RecordBuilder`] stats and hashes each walked file
//! 2. [`Aggregator`] collects the records of every volume
//! 3. [`Aggregator::group_by_hash`] derives the [`HashGroup`] view
//!
//! Everything is held in memory until the reports are written. That is
//! fine for a few million files; beyond that the records would need to go
//! to an external sorted store and be grouped with a merge pass.

mod aggregator;
mod builder;
mod record;

pub use aggregator::{Aggregator, HashGroup};
pub use builder::RecordBuilder;
pub use record::{extension_of, FileRecord, NO_EXTENSION};
