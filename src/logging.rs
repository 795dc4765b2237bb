//! Run log: console plus a timestamped file for the whole run.

use crate::error::{InventoryError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Holds the run log open.
///
/// Dropping it flushes buffered lines and closes the file, so keep it alive
/// until the run has returned, whatever the outcome.
pub struct RunLog {
    path: PathBuf,
    _guard: WorkerGuard,
}

impl RunLog {
    /// Install the global subscriber writing to stderr and to `path`.
    ///
    /// The file gets `info` and up (or `RUST_LOG`). The console only shows
    /// warnings unless `verbose`, in which case it matches the file. Fails
    /// if a global subscriber is already set.
    pub fn open(path: &Path, verbose: bool) -> Result<Self> {
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let file_name = path.file_name().ok_or_else(|| {
            InventoryError::Logging(format!("{} is not a file path", path.display()))
        })?;
        fs::create_dir_all(dir).map_err(|e| {
            InventoryError::Logging(format!("cannot create {}: {}", dir.display(), e))
        })?;

        let appender = RollingFileAppender::builder()
            .rotation(Rotation::NEVER)
            .filename_prefix(file_name.to_string_lossy())
            .build(dir)
            .map_err(|e| InventoryError::Logging(e.to_string()))?;
        let (file_writer, guard) = tracing_appender::non_blocking(appender);

        let console_filter = if verbose {
            file_filter()
        } else {
            EnvFilter::new("warn")
        };

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_timer(ChronoLocal::new(TIME_FORMAT.to_string()))
                    .with_target(false)
                    .with_filter(console_filter),
            )
            .with(
                fmt::layer()
                    .with_writer(file_writer)
                    .with_timer(ChronoLocal::new(TIME_FORMAT.to_string()))
                    .with_target(false)
                    .with_ansi(false)
                    .with_filter(file_filter()),
            )
            .try_init()
            .map_err(|e| InventoryError::Logging(e.to_string()))?;

        Ok(Self {
            path: path.to_path_buf(),
            _guard: guard,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn file_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}
