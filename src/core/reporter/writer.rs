//! Artifact layout on disk and the file-backed report writer.

use super::duplicates::{write_duplicates_csv, DuplicateCounts};
use super::index::{write_index_csv, write_index_txt};
use super::summary::write_status;
use crate::core::inventory::HashGroup;
use crate::error::ReportError;
use crate::events::RunSummary;
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::info;

pub const SNAPSHOT_DIR_NAME: &str = "_snapshots";
pub const INDEX_CSV_NAME: &str = "index_by_hash.csv";
pub const INDEX_TXT_NAME: &str = "index_by_hash.txt";
pub const DUPLICATES_CSV_NAME: &str = "dupes_confirmed.csv";
pub const LOG_FILE_NAME: &str = "reindex.log";
pub const STATUS_FILE_NAME: &str = "report-build-status.txt";

/// Where every artifact of a run goes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactPaths {
    /// Root the artifacts are copied into after writing
    pub output_root: PathBuf,
    pub snapshot_dir: PathBuf,
    pub index_csv: PathBuf,
    pub index_txt: PathBuf,
    pub duplicates_csv: PathBuf,
    pub log_file: PathBuf,
    pub status_file: PathBuf,
}

impl ArtifactPaths {
    /// Default layout under `output_root`.
    ///
    /// Reports go to `<root>/_snapshots/`, the log to
    /// `<root>/logs_<YYYYMMDD_HHMMSS>/reindex.log` with the status file
    /// beside it.
    pub fn under(output_root: impl Into<PathBuf>) -> Self {
        let output_root = output_root.into();
        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        let snapshot_dir = output_root.join(SNAPSHOT_DIR_NAME);
        let log_file = output_root
            .join(format!("logs_{stamp}"))
            .join(LOG_FILE_NAME);
        Self::layout(output_root, snapshot_dir, log_file)
    }

    /// Derive report and status paths from explicit snapshot and log locations
    pub fn layout(
        output_root: impl Into<PathBuf>,
        snapshot_dir: impl Into<PathBuf>,
        log_file: impl Into<PathBuf>,
    ) -> Self {
        let snapshot_dir = snapshot_dir.into();
        let log_file = log_file.into();
        let status_file = log_file
            .parent()
            .map(|dir| dir.join(STATUS_FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(STATUS_FILE_NAME));

        Self {
            output_root: output_root.into(),
            index_csv: snapshot_dir.join(INDEX_CSV_NAME),
            index_txt: snapshot_dir.join(INDEX_TXT_NAME),
            duplicates_csv: snapshot_dir.join(DUPLICATES_CSV_NAME),
            snapshot_dir,
            log_file,
            status_file,
        }
    }

    /// The three report files, in write order
    pub fn reports(&self) -> [&Path; 3] {
        [&self.index_csv, &self.index_txt, &self.duplicates_csv]
    }
}

/// What a successful [`ReportWriter::write_all`] produced
#[derive(Debug, Clone)]
pub struct WrittenReports {
    pub artifacts: Vec<PathBuf>,
    pub duplicates: DuplicateCounts,
}

/// Writes the reports to their files, remembering what is already on disk
pub struct ReportWriter<'a> {
    paths: &'a ArtifactPaths,
    written: Vec<PathBuf>,
}

impl<'a> ReportWriter<'a> {
    pub fn new(paths: &'a ArtifactPaths) -> Self {
        Self {
            paths,
            written: Vec::new(),
        }
    }

    /// Write the full index, its text rendering and the duplicates report.
    ///
    /// On failure the error carries the artifacts that were completed before it.
    pub fn write_all(
        mut self,
        groups: &[HashGroup<'_>],
        generated_at: NaiveDateTime,
    ) -> Result<WrittenReports, ReportError> {
        let paths = self.paths;
        create_dir(&paths.snapshot_dir, &self.written)?;
        info!("Saving results to {}", paths.snapshot_dir.display());

        let path = &paths.index_csv;
        let sink = self.create(path)?;
        write_index_csv(groups, sink).map_err(|source| self.csv_error(path, source))?;
        self.written.push(path.clone());

        let path = &paths.index_txt;
        let sink = self.create(path)?;
        write_index_txt(groups, generated_at, sink)
            .map_err(|source| self.write_error(path, source))?;
        self.written.push(path.clone());

        let path = &paths.duplicates_csv;
        let sink = self.create(path)?;
        let duplicates =
            write_duplicates_csv(groups, sink).map_err(|source| self.csv_error(path, source))?;
        self.written.push(path.clone());

        Ok(WrittenReports {
            artifacts: self.written,
            duplicates,
        })
    }

    fn create(&self, path: &Path) -> Result<BufWriter<File>, ReportError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            create_dir(parent, &self.written)?;
        }
        File::create(path)
            .map(BufWriter::new)
            .map_err(|source| self.write_error(path, source))
    }

    fn write_error(&self, path: &Path, source: std::io::Error) -> ReportError {
        ReportError::Write {
            path: path.to_path_buf(),
            written: self.written.clone(),
            source,
        }
    }

    fn csv_error(&self, path: &Path, source: csv::Error) -> ReportError {
        ReportError::Csv {
            path: path.to_path_buf(),
            written: self.written.clone(),
            source,
        }
    }
}

fn create_dir(path: &Path, written: &[PathBuf]) -> Result<(), ReportError> {
    fs::create_dir_all(path).map_err(|source| ReportError::CreateDirectory {
        path: path.to_path_buf(),
        written: written.to_vec(),
        source,
    })
}

/// Copy each artifact into `output_root` under its own file name.
///
/// An artifact that already lives there is left alone. On failure the
/// error lists the artifacts plus the copies made before it.
pub fn copy_to_root(
    artifacts: &[PathBuf],
    output_root: &Path,
) -> Result<Vec<PathBuf>, ReportError> {
    create_dir(output_root, artifacts)?;
    info!("Copying artifacts to {}", output_root.display());

    let mut copies = Vec::with_capacity(artifacts.len());
    for from in artifacts {
        let Some(name) = from.file_name() else {
            continue;
        };
        let to = output_root.join(name);
        if same_file(from, &to) {
            continue;
        }
        fs::copy(from, &to).map_err(|source| ReportError::Copy {
            from: from.clone(),
            to: to.clone(),
            written: artifacts.iter().chain(&copies).cloned().collect(),
            source,
        })?;
        info!("[OK] {}", to.display());
        copies.push(to);
    }
    Ok(copies)
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Write the status file, creating its directory if needed
pub fn write_status_file(
    path: &Path,
    summary: &RunSummary,
    generated_at: NaiveDateTime,
) -> Result<(), ReportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_dir(parent, &summary.artifacts)?;
    }
    let write_error = |source| ReportError::Write {
        path: path.to_path_buf(),
        written: summary.artifacts.clone(),
        source,
    };
    let file = File::create(path).map_err(write_error)?;
    write_status(summary, generated_at, BufWriter::new(file)).map_err(write_error)
}
