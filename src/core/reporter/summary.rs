//! End-of-run totals: the human log and the machine-readable status file.

use super::duplicates::DuplicateCounts;
use super::format::{decimal_comma, gibibytes, group_thousands, tebibytes};
use crate::core::inventory::Aggregator;
use crate::core::warnings::WarningRollup;
use crate::events::{RunStatus, RunSummary, VolumeSummary};
use chrono::NaiveDateTime;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{error, info};

/// Name written to the `tool` line of the status file
pub const TOOL_NAME: &str = "drive-inventory";

/// Collects per-volume results as they finish and builds the [`RunSummary`]
#[derive(Debug)]
pub struct RunReporter {
    started: Instant,
    volumes: Vec<VolumeSummary>,
}

impl RunReporter {
    /// Start the run clock
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
            volumes: Vec::new(),
        }
    }

    pub fn record_volume(&mut self, volume: VolumeSummary) {
        self.volumes.push(volume);
    }

    pub fn volumes(&self) -> &[VolumeSummary] {
        &self.volumes
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Totals over everything aggregated so far
    pub fn summarize(
        &self,
        status: RunStatus,
        aggregator: &Aggregator,
        duplicates: DuplicateCounts,
        warnings: Vec<WarningRollup>,
        artifacts: Vec<PathBuf>,
    ) -> RunSummary {
        RunSummary {
            status,
            files: aggregator.len(),
            unique_hashes: aggregator.unique_digests(),
            total_bytes: aggregator.total_bytes(),
            duplicates,
            volumes: self.volumes.clone(),
            warnings,
            artifacts,
            duration_ms: self.elapsed().as_millis() as u64,
        }
    }
}

/// Write the summary to the run log
pub fn log_summary(summary: &RunSummary) {
    if summary.status == RunStatus::FailedEmpty {
        error!("No files were processed. Check that the volumes are mounted.");
    }

    info!("Inventory summary:");
    info!("  Files: {}", group_thousands(summary.files as u64));
    info!("  Unique hashes: {}", group_thousands(summary.unique_hashes as u64));
    info!(
        "  Total size: {} TB",
        decimal_comma(tebibytes(summary.total_bytes), 2)
    );
    info!(
        "  Duplicate groups: {}",
        group_thousands(summary.duplicates.groups as u64)
    );
    info!(
        "  Files in duplicates: {}",
        group_thousands(summary.duplicates.files as u64)
    );

    for volume in &summary.volumes {
        if volume.present {
            info!(
                "  {}: {} files, {} GB",
                volume.id,
                group_thousands(volume.files as u64),
                decimal_comma(gibibytes(volume.bytes), 2)
            );
        } else {
            info!("  {}: not found ({})", volume.id, volume.root.display());
        }
    }

    info!(
        "Run finished in {:.1?}",
        Duration::from_millis(summary.duration_ms)
    );
}

/// Write `key=value` status lines for external tooling.
///
/// Counts are plain integers; artifacts are listed by file name.
pub fn write_status<W: Write>(
    summary: &RunSummary,
    generated_at: NaiveDateTime,
    mut sink: W,
) -> io::Result<()> {
    writeln!(sink, "tool={TOOL_NAME}")?;
    writeln!(sink, "date={}", generated_at.format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(sink, "status={}", summary.status.as_str())?;
    writeln!(sink, "files={}", summary.files)?;
    writeln!(sink, "unique_hashes={}", summary.unique_hashes)?;
    writeln!(sink, "duplicate_groups={}", summary.duplicates.groups)?;
    writeln!(sink, "duplicate_files={}", summary.duplicates.files)?;
    writeln!(sink, "total_bytes={}", summary.total_bytes)?;
    for volume in &summary.volumes {
        writeln!(sink, "volume.{}.present={}", volume.id, volume.present)?;
        writeln!(sink, "volume.{}.files={}", volume.id, volume.files)?;
        writeln!(sink, "volume.{}.bytes={}", volume.id, volume.bytes)?;
    }

    let names: Vec<String> = summary
        .artifacts
        .iter()
        .filter_map(|p| p.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .collect();
    writeln!(sink, "artifacts={}", names.join(","))?;
    sink.flush()
}
