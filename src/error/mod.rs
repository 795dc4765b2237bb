//! # Error Module
//!
//! Error types for the drive inventory.
//!
//! ## Design Principles
//! - **Never abort a volume** on a single bad entry - per-entry failures are
//!   rendered into warnings and the walk continues
//! - **Include context** - paths and the underlying I/O error
//! - **Report what survived** - output-stage errors list the artifacts that
//!   were already written before the failure

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum InventoryError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Report generation error: {0}")]
    Report(#[from] ReportError),

    #[error("Logging setup failed: {0}")]
    Logging(String),
}

/// Errors in the run configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid volume specification: {spec:?} (expected a letter such as H, or ID=PATH)")]
    InvalidVolume { spec: String },

    #[error("Volume {id} was requested more than once")]
    DuplicateVolume { id: String },

    #[error("No volumes were requested")]
    NoVolumes,
}

/// Recoverable errors that occur while walking a volume.
///
/// These never propagate out of a volume scan; they are counted by the
/// warning tracker and the offending entry is skipped.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Could not enumerate {path}: {source}")]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not inspect {path}: {source}")]
    Metadata {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that occur while computing a content digest.
///
/// Like [`ScanError`], these end up in the warning tracker, never in
/// [`InventoryError`].
#[derive(Error, Debug)]
pub enum HashError {
    #[error("Could not read {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that occur while writing report artifacts. All of these are fatal.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to create output directory {path} ({}): {source}", written_list(.written))]
    CreateDirectory {
        path: PathBuf,
        written: Vec<PathBuf>,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path} ({}): {source}", written_list(.written))]
    Write {
        path: PathBuf,
        written: Vec<PathBuf>,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write CSV rows to {path} ({}): {source}", written_list(.written))]
    Csv {
        path: PathBuf,
        written: Vec<PathBuf>,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to copy {from} to {to} ({}): {source}", written_list(.written))]
    Copy {
        from: PathBuf,
        to: PathBuf,
        written: Vec<PathBuf>,
        #[source]
        source: std::io::Error,
    },
}

impl ReportError {
    /// Artifacts that were successfully written before this failure
    pub fn written(&self) -> &[PathBuf] {
        match self {
            ReportError::CreateDirectory { written, .. }
            | ReportError::Write { written, .. }
            | ReportError::Csv { written, .. }
            | ReportError::Copy { written, .. } => written,
        }
    }
}

fn written_list(written: &[PathBuf]) -> String {
    if written.is_empty() {
        return "no artifacts written".to_string();
    }
    let names: Vec<String> = written.iter().map(|p| p.display().to_string()).collect();
    format!("already written: {}", names.join(", "))
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, InventoryError>;
