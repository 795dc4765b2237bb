//! # Pipeline Module
//!
//! Orchestrates one inventory run.
//!
//! ## Pipeline Stages
//! 1. **Scan** - Walk each requested volume and hash every file
//! 2. **Aggregate** - Collect all records and group them by digest
//! 3. **Write** - Full index, grouped text and duplicates report
//! 4. **Report** - Summary log lines and the status file
//!
//! A run that records nothing stops after aggregation with
//! [`RunStatus::FailedEmpty`](crate::events::RunStatus) and writes no reports.
//!
//! ## Parallelism
//! Volumes are scanned one after another by default. With
//! `parallel_volumes` each volume becomes a rayon task with its own record
//! batch and warning tracker; batches are merged in request order once all
//! tasks finish. Files within a volume are always hashed sequentially.
//!
//! ## Example
//! ```rust,ignore
//! let outcome = Pipeline::builder()
//!     .volumes(Volume::parse_all(&["H", "I", "J"])?)
//!     .priority(vec!["H".into()])
//!     .artifacts(ArtifactPaths::under("/data/inventory"))
//!     .build()
//!     .run()?;
//! ```

mod executor;

pub use executor::{
    Pipeline, PipelineBuilder, PipelineConfig, RunOutcome, DEFAULT_PROGRESS_INTERVAL,
};
