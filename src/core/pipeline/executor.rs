//! Pipeline execution implementation.

use crate::core::hasher::{ContentHasher, Sha256Hasher, DEFAULT_CHUNK_SIZE};
use crate::core::inventory::{Aggregator, FileRecord, RecordBuilder};
use crate::core::reporter::{
    copy_to_root, log_summary, write_status_file, ArtifactPaths, DuplicateCounts, ReportWriter,
    RunReporter,
};
use crate::core::scanner::{DirectoryWalker, PathPolicy};
use crate::core::volume::Volume;
use crate::core::warnings::{WarningTracker, DEFAULT_WARNING_CAP};
use crate::error::{ConfigError, InventoryError, ReportError};
use crate::events::{
    null_sender, Event, EventSender, PipelineEvent, RunPhase, RunStatus, RunSummary, ScanEvent,
    ScanProgress, VolumeSummary,
};
use chrono::Local;
use rayon::prelude::*;
use std::path::PathBuf;
use tracing::{error, info, info_span};

/// Records between progress lines
pub const DEFAULT_PROGRESS_INTERVAL: usize = 200;

/// Result of a run that did not fail in an output stage
#[derive(Debug)]
pub struct RunOutcome {
    pub status: RunStatus,
    pub summary: RunSummary,
    /// Copies placed in the output root
    pub copies: Vec<PathBuf>,
    pub status_file: PathBuf,
}

/// Configuration for the pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Volumes to scan, in order
    pub volumes: Vec<Volume>,
    /// Volume IDs whose copy sorts first within a group
    pub priority: Vec<String>,
    pub artifacts: ArtifactPaths,
    /// Read size for hashing
    pub chunk_size: usize,
    /// Times a warning message is shown before it is held back
    pub warning_cap: usize,
    /// Log and emit progress every this many records per volume
    pub progress_interval: usize,
    /// Scan distinct volumes concurrently
    pub parallel_volumes: bool,
    /// Copy the reports from the snapshot directory to the output root
    pub copy_to_root: bool,
    /// Directory names pruned in addition to the built-in rules
    pub skip_directories: Vec<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            volumes: Vec::new(),
            priority: Vec::new(),
            artifacts: ArtifactPaths::under("."),
            chunk_size: DEFAULT_CHUNK_SIZE,
            warning_cap: DEFAULT_WARNING_CAP,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            parallel_volumes: false,
            copy_to_root: true,
            skip_directories: Vec::new(),
        }
    }
}

/// Builder for pipeline configuration
pub struct PipelineBuilder {
    config: PipelineConfig,
    hasher: Option<Box<dyn ContentHasher>>,
}

impl PipelineBuilder {
    /// Create a new pipeline builder
    pub fn new() -> Self {
        Self {
            config: PipelineConfig::default(),
            hasher: None,
        }
    }

    /// Volumes to scan
    pub fn volumes(mut self, volumes: Vec<Volume>) -> Self {
        self.config.volumes = volumes;
        self
    }

    /// Preferred volume order within duplicate groups
    pub fn priority(mut self, priority: Vec<String>) -> Self {
        self.config.priority = priority.into_iter().map(|id| id.to_uppercase()).collect();
        self
    }

    /// Where reports, log and status go
    pub fn artifacts(mut self, artifacts: ArtifactPaths) -> Self {
        self.config.artifacts = artifacts;
        self
    }

    pub fn chunk_size(mut self, size: usize) -> Self {
        self.config.chunk_size = size;
        self
    }

    pub fn warning_cap(mut self, cap: usize) -> Self {
        self.config.warning_cap = cap;
        self
    }

    pub fn progress_interval(mut self, interval: usize) -> Self {
        self.config.progress_interval = interval.max(1);
        self
    }

    /// Scan volumes concurrently, one task per volume
    pub fn parallel_volumes(mut self, parallel: bool) -> Self {
        self.config.parallel_volumes = parallel;
        self
    }

    pub fn copy_to_root(mut self, copy: bool) -> Self {
        self.config.copy_to_root = copy;
        self
    }

    /// Prune extra directory names during the walk
    pub fn skip_directories(mut self, names: Vec<String>) -> Self {
        self.config.skip_directories = names;
        self
    }

    /// Replace the content hasher
    pub fn hasher(mut self, hasher: Box<dyn ContentHasher>) -> Self {
        self.hasher = Some(hasher);
        self
    }

    /// Build the pipeline
    pub fn build(self) -> Pipeline {
        let chunk_size = self.config.chunk_size;
        let policy = PathPolicy::new().with_skipped(&self.config.skip_directories);
        Pipeline {
            walker: DirectoryWalker::new(policy),
            hasher: self
                .hasher
                .unwrap_or_else(|| Box::new(Sha256Hasher::new().chunk_size(chunk_size))),
            config: self.config,
        }
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Records and totals from one volume
struct VolumeScan {
    summary: VolumeSummary,
    records: Vec<FileRecord>,
}

/// One inventory run over a set of volumes
pub struct Pipeline {
    config: PipelineConfig,
    walker: DirectoryWalker,
    hasher: Box<dyn ContentHasher>,
}

impl Pipeline {
    /// Create a new pipeline builder
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the pipeline without events
    pub fn run(&self) -> Result<RunOutcome, InventoryError> {
        self.run_with_events(&null_sender())
    }

    /// Run the pipeline with event reporting.
    ///
    /// An empty result is not an error: it comes back as
    /// [`RunStatus::FailedEmpty`] with no reports written. Output-stage
    /// failures are returned as [`InventoryError::Report`].
    pub fn run_with_events(&self, events: &EventSender) -> Result<RunOutcome, InventoryError> {
        if self.config.volumes.is_empty() {
            return Err(ConfigError::NoVolumes.into());
        }

        let mut reporter = RunReporter::start();
        let warnings = WarningTracker::with_cap(self.config.warning_cap);
        let paths = &self.config.artifacts;

        info!(
            "Inventory run started: {}",
            self.config
                .volumes
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(" ")
        );
        events.send(Event::Pipeline(PipelineEvent::Started));
        enter_phase(events, RunPhase::Scanning);

        let mut aggregator = Aggregator::new();
        for scan in self.scan_all(&warnings, events) {
            reporter.record_volume(scan.summary);
            aggregator.extend(scan.records);
        }
        enter_phase(events, RunPhase::Aggregated);

        if aggregator.is_empty() {
            enter_phase(events, RunPhase::FailedEmpty);
            let mut summary = reporter.summarize(
                RunStatus::FailedEmpty,
                &aggregator,
                DuplicateCounts::default(),
                Vec::new(),
                Vec::new(),
            );
            log_summary(&summary);
            summary.warnings = warnings.summary();
            write_status_file(&paths.status_file, &summary, Local::now().naive_local())
                .map_err(|e| fail(events, e))?;

            events.send(Event::Pipeline(PipelineEvent::Completed {
                summary: summary.clone(),
            }));
            return Ok(RunOutcome {
                status: RunStatus::FailedEmpty,
                summary,
                copies: Vec::new(),
                status_file: paths.status_file.clone(),
            });
        }

        enter_phase(events, RunPhase::Writing);
        let generated_at = Local::now().naive_local();
        let groups = aggregator.group_by_hash(&self.config.priority);
        let written = ReportWriter::new(paths)
            .write_all(&groups, generated_at)
            .map_err(|e| fail(events, e))?;

        let copies = if self.config.copy_to_root {
            copy_to_root(&written.artifacts, &paths.output_root).map_err(|e| fail(events, e))?
        } else {
            Vec::new()
        };

        enter_phase(events, RunPhase::Reporting);
        let mut summary = reporter.summarize(
            RunStatus::Ok,
            &aggregator,
            written.duplicates,
            Vec::new(),
            written.artifacts,
        );
        log_summary(&summary);
        summary.warnings = warnings.summary();
        write_status_file(&paths.status_file, &summary, generated_at)
            .map_err(|e| fail(events, e))?;

        enter_phase(events, RunPhase::Done);
        events.send(Event::Pipeline(PipelineEvent::Completed {
            summary: summary.clone(),
        }));

        Ok(RunOutcome {
            status: RunStatus::Ok,
            summary,
            copies,
            status_file: paths.status_file.clone(),
        })
    }

    /// Scan every volume, returning results in requested order
    fn scan_all(&self, warnings: &WarningTracker, events: &EventSender) -> Vec<VolumeScan> {
        if !self.config.parallel_volumes {
            return self
                .config
                .volumes
                .iter()
                .map(|volume| self.scan_volume(volume, warnings, events))
                .collect();
        }

        let scans: Vec<(VolumeScan, WarningTracker)> = self
            .config
            .volumes
            .par_iter()
            .map(|volume| {
                let local = WarningTracker::with_cap(self.config.warning_cap);
                let scan = self.scan_volume(volume, &local, events);
                (scan, local)
            })
            .collect();

        scans
            .into_iter()
            .map(|(scan, local)| {
                warnings.absorb(local);
                scan
            })
            .collect()
    }

    fn scan_volume(
        &self,
        volume: &Volume,
        warnings: &WarningTracker,
        events: &EventSender,
    ) -> VolumeScan {
        let span = info_span!("volume", id = %volume.id);
        let _entered = span.enter();

        let present = volume.is_mounted();
        if present {
            info!("Scanning {} ({})", volume, volume.root.display());
            events.send(Event::Scan(ScanEvent::VolumeStarted {
                volume: volume.id.clone(),
                root: volume.root.clone(),
            }));
        } else {
            events.send(Event::Scan(ScanEvent::VolumeMissing {
                volume: volume.id.clone(),
                root: volume.root.clone(),
            }));
        }

        let builder = RecordBuilder::new(self.walker.policy(), self.hasher.as_ref());
        let mut records = Vec::new();
        let mut bytes = 0u64;

        for path in self.walker.walk(volume, warnings) {
            let Some(record) = builder.build(&path, volume, warnings) else {
                continue;
            };
            bytes += record.size_bytes;
            records.push(record);

            if records.len() % self.config.progress_interval == 0 {
                info!("[{}] {} files processed", volume.id, records.len());
                events.send(Event::Scan(ScanEvent::Progress(ScanProgress {
                    volume: volume.id.clone(),
                    files_recorded: records.len(),
                    bytes_recorded: bytes,
                    current_path: records
                        .last()
                        .map(|r| r.display_path.clone())
                        .unwrap_or_default(),
                })));
            }
        }

        if present {
            info!("{} done ({} files)", volume, records.len());
            events.send(Event::Scan(ScanEvent::VolumeCompleted {
                volume: volume.id.clone(),
                files: records.len(),
                bytes,
            }));
        }

        VolumeScan {
            summary: VolumeSummary {
                id: volume.id.clone(),
                root: volume.root.clone(),
                present,
                files: records.len(),
                bytes,
            },
            records,
        }
    }
}

fn enter_phase(events: &EventSender, phase: RunPhase) {
    events.send(Event::Pipeline(PipelineEvent::PhaseChanged { phase }));
}

fn fail(events: &EventSender, e: ReportError) -> InventoryError {
    error!("{}", e);
    events.send(Event::Pipeline(PipelineEvent::Failed {
        message: e.to_string(),
    }));
    e.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventChannel;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, content: &[u8]) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn pipeline_for(out: &TempDir, volumes: Vec<Volume>) -> PipelineBuilder {
        Pipeline::builder()
            .volumes(volumes)
            .artifacts(ArtifactPaths::under(out.path()))
    }

    fn phases(events: &[Event]) -> Vec<RunPhase> {
        events
            .iter()
            .filter_map(|e| match e {
                Event::Pipeline(PipelineEvent::PhaseChanged { phase }) => Some(*phase),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn pipeline_builder_creates_pipeline() {
        let pipeline = Pipeline::builder()
            .volumes(vec![Volume::new("H", "/mnt/h").unwrap()])
            .priority(vec!["h".to_string(), "I".to_string()])
            .progress_interval(0)
            .build();

        assert_eq!(pipeline.config().priority, vec!["H", "I"]);
        assert_eq!(pipeline.config().progress_interval, 1);
        assert!(pipeline.config().copy_to_root);
    }

    #[test]
    fn no_volumes_is_a_config_error() {
        let result = Pipeline::builder().build().run();
        assert!(matches!(
            result,
            Err(InventoryError::Config(ConfigError::NoVolumes))
        ));
    }

    #[test]
    fn successful_run_walks_every_phase() {
        let drive = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        write(drive.path(), "a.txt", b"same");
        write(drive.path(), "sub/b.txt", b"same");
        let (sender, receiver) = EventChannel::new();

        let outcome = pipeline_for(&out, vec![Volume::new("H", drive.path()).unwrap()])
            .build()
            .run_with_events(&sender)
            .unwrap();
        drop(sender);
        let events: Vec<Event> = receiver.iter().collect();

        assert_eq!(outcome.status, RunStatus::Ok);
        assert_eq!(outcome.summary.files, 2);
        assert_eq!(outcome.summary.duplicates, DuplicateCounts { groups: 1, files: 2 });
        assert_eq!(
            phases(&events),
            vec![
                RunPhase::Scanning,
                RunPhase::Aggregated,
                RunPhase::Writing,
                RunPhase::Reporting,
                RunPhase::Done
            ]
        );
        assert!(outcome.status_file.is_file());
        assert_eq!(outcome.copies.len(), 3);
    }

    #[test]
    fn empty_result_skips_writing() {
        let out = TempDir::new().unwrap();
        let missing = out.path().join("not-mounted");
        let (sender, receiver) = EventChannel::new();

        let outcome = pipeline_for(&out, vec![Volume::new("Z", &missing).unwrap()])
            .build()
            .run_with_events(&sender)
            .unwrap();
        drop(sender);
        let events: Vec<Event> = receiver.iter().collect();

        assert_eq!(outcome.status, RunStatus::FailedEmpty);
        assert_eq!(
            phases(&events),
            vec![
                RunPhase::Scanning,
                RunPhase::Aggregated,
                RunPhase::FailedEmpty
            ]
        );
        assert!(!out.path().join("_snapshots").exists());
        let status = fs::read_to_string(&outcome.status_file).unwrap();
        assert!(status.contains("status=failed_empty"));
    }

    #[test]
    fn copy_failure_reports_written_artifacts() {
        let drive = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        write(drive.path(), "a.txt", b"content");
        let root_is_a_file = out.path().join("root_is_a_file");
        fs::write(&root_is_a_file, b"occupied").unwrap();
        let artifacts = ArtifactPaths::layout(
            &root_is_a_file,
            out.path().join("_snapshots"),
            out.path().join("logs").join("reindex.log"),
        );
        let (sender, receiver) = EventChannel::new();

        let result = Pipeline::builder()
            .volumes(vec![Volume::new("H", drive.path()).unwrap()])
            .artifacts(artifacts.clone())
            .build()
            .run_with_events(&sender);
        drop(sender);

        let error = match result {
            Err(InventoryError::Report(error)) => error,
            other => panic!("expected a report error, got {other:?}"),
        };
        let reports: Vec<PathBuf> = artifacts.reports().iter().map(|p| p.to_path_buf()).collect();
        assert_eq!(error.written(), reports.as_slice());
        assert!(receiver
            .iter()
            .any(|e| matches!(e, Event::Pipeline(PipelineEvent::Failed { .. }))));
    }

    #[test]
    fn progress_every_interval() {
        let drive = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        for i in 0..5 {
            write(drive.path(), &format!("f{i}.bin"), &[i as u8]);
        }
        let (sender, receiver) = EventChannel::new();

        pipeline_for(&out, vec![Volume::new("H", drive.path()).unwrap()])
            .progress_interval(2)
            .copy_to_root(false)
            .build()
            .run_with_events(&sender)
            .unwrap();
        drop(sender);

        let progress: Vec<usize> = receiver
            .iter()
            .filter_map(|e| match e {
                Event::Scan(ScanEvent::Progress(p)) => Some(p.files_recorded),
                _ => None,
            })
            .collect();
        assert_eq!(progress, vec![2, 4]);
    }

    #[test]
    fn parallel_and_sequential_agree() {
        let h = TempDir::new().unwrap();
        let i = TempDir::new().unwrap();
        write(h.path(), "docs/report.txt", b"quarterly");
        write(h.path(), "solo.txt", b"only here");
        write(i.path(), "backup/report_copy.txt", b"quarterly");

        let run = |parallel: bool| {
            let out = TempDir::new().unwrap();
            let outcome = pipeline_for(
                &out,
                vec![
                    Volume::new("H", h.path()).unwrap(),
                    Volume::new("I", i.path()).unwrap(),
                ],
            )
            .parallel_volumes(parallel)
            .copy_to_root(false)
            .build()
            .run()
            .unwrap();
            let index = fs::read(out.path().join("_snapshots").join("index_by_hash.csv")).unwrap();
            (outcome.summary.volumes, index)
        };

        let (sequential_volumes, sequential_index) = run(false);
        let (parallel_volumes, parallel_index) = run(true);

        assert_eq!(sequential_volumes, parallel_volumes);
        assert_eq!(sequential_index, parallel_index);
        assert_eq!(parallel_volumes[0].id, "H");
        assert_eq!(parallel_volumes[1].files, 1);
    }
}
