//! Event type definitions for progress reporting.

use crate::core::reporter::DuplicateCounts;
use crate::core::warnings::WarningRollup;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All events emitted during an inventory run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Per-volume scanning events
    Scan(ScanEvent),
    /// Run-level events
    Pipeline(PipelineEvent),
}

/// Events while walking and hashing one volume
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScanEvent {
    /// A mounted volume is about to be walked
    VolumeStarted { volume: String, root: PathBuf },
    /// The volume root does not exist; no further events for this volume
    VolumeMissing { volume: String, root: PathBuf },
    /// Periodic progress update
    Progress(ScanProgress),
    /// Finished walking a mounted volume
    VolumeCompleted {
        volume: String,
        files: usize,
        bytes: u64,
    },
}

/// Progress information while scanning a volume
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanProgress {
    pub volume: String,
    /// Records built so far on this volume
    pub files_recorded: usize,
    /// Bytes covered by those records
    pub bytes_recorded: u64,
    /// Display path of the latest record
    pub current_path: String,
}

/// Run-level events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PipelineEvent {
    /// Run has started
    Started,
    /// Moving to a new phase
    PhaseChanged { phase: RunPhase },
    /// Run reached a terminal state (including an empty result)
    Completed { summary: RunSummary },
    /// An output stage failed
    Failed { message: String },
}

/// Phases of one run.
///
/// `Idle -> Scanning -> Aggregated -> Writing -> Reporting -> Done`, or
/// `FailedEmpty` straight after `Aggregated` when nothing was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    Idle,
    Scanning,
    Aggregated,
    Writing,
    Reporting,
    Done,
    FailedEmpty,
}

impl std::fmt::Display for RunPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunPhase::Idle => write!(f, "Idle"),
            RunPhase::Scanning => write!(f, "Scanning"),
            RunPhase::Aggregated => write!(f, "Aggregated"),
            RunPhase::Writing => write!(f, "Writing"),
            RunPhase::Reporting => write!(f, "Reporting"),
            RunPhase::Done => write!(f, "Done"),
            RunPhase::FailedEmpty => write!(f, "Failed: empty result"),
        }
    }
}

/// Terminal status of a run that did not hit an output error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Reports written
    Ok,
    /// No file was recorded on any volume; no reports written
    FailedEmpty,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Ok => "ok",
            RunStatus::FailedEmpty => "failed_empty",
        }
    }
}

/// Contribution of one requested volume
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeSummary {
    pub id: String,
    pub root: PathBuf,
    /// False when the root was not found
    pub present: bool,
    pub files: usize,
    pub bytes: u64,
}

/// Totals for one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub status: RunStatus,
    pub files: usize,
    pub unique_hashes: usize,
    pub total_bytes: u64,
    pub duplicates: DuplicateCounts,
    /// One entry per requested volume, in request order
    pub volumes: Vec<VolumeSummary>,
    /// Messages that went past the display cap
    pub warnings: Vec<WarningRollup>,
    /// Artifacts written, in write order
    pub artifacts: Vec<PathBuf>,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_serializable() {
        let event = Event::Scan(ScanEvent::Progress(ScanProgress {
            volume: "H".to_string(),
            files_recorded: 200,
            bytes_recorded: 4096,
            current_path: r"H:\docs\a.txt".to_string(),
        }));

        let json = serde_json::to_string(&event).unwrap();
        let deserialized: Event = serde_json::from_str(&json).unwrap();

        match deserialized {
            Event::Scan(ScanEvent::Progress(p)) => {
                assert_eq!(p.files_recorded, 200);
                assert_eq!(p.volume, "H");
            }
            _ => panic!("Wrong event type"),
        }
    }

    #[test]
    fn run_summary_is_serializable() {
        let summary = RunSummary {
            status: RunStatus::FailedEmpty,
            files: 0,
            unique_hashes: 0,
            total_bytes: 0,
            duplicates: DuplicateCounts::default(),
            volumes: vec![VolumeSummary {
                id: "Z".to_string(),
                root: PathBuf::from("/mnt/z"),
                present: false,
                files: 0,
                bytes: 0,
            }],
            warnings: Vec::new(),
            artifacts: Vec::new(),
            duration_ms: 12,
        };

        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"failed_empty\""));
        assert!(json.contains("\"present\":false"));
    }

    #[test]
    fn failed_phase_display() {
        assert_eq!(RunPhase::FailedEmpty.to_string(), "Failed: empty result");
        assert_eq!(RunStatus::Ok.as_str(), "ok");
    }
}
