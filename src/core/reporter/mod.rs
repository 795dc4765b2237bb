//! # Reporter Module
//!
//! Turns the grouped inventory into files other tools read.
//!
//! ## Artifacts
//! 1. **Full index** (`index_by_hash.csv`): one row per file, by digest then path
//! 2. **Grouped text** (`index_by_hash.txt`): groups newest first, for browsing
//! 3. **Duplicates** (`dupes_confirmed.csv`): only groups with two or more files
//! 4. **Status** (`report-build-status.txt`): `key=value` totals for scripts
//!
//! The row writers take any `io::Write` sink and never touch the
//! filesystem themselves; [`ReportWriter`] binds them to files.
//!
//! ## Example
//! ```rust,ignore
//! let groups = aggregator.group_by_hash(&priority);
//! let written = ReportWriter::new(&paths).write_all(&groups, Local::now().naive_local())?;
//! println!("{} duplicate groups", written.duplicates.groups);
//! ```

mod duplicates;
mod format;
mod index;
mod summary;
mod writer;

pub use duplicates::{write_duplicates_csv, DuplicateCounts, DUPLICATES_HEADER};
pub use format::{decimal_comma, format_mb, gibibytes, group_thousands, tebibytes};
pub use index::{write_index_csv, write_index_txt, INDEX_HEADER};
pub use summary::{log_summary, write_status, RunReporter, TOOL_NAME};
pub use writer::{
    copy_to_root, write_status_file, ArtifactPaths, ReportWriter, WrittenReports,
    DUPLICATES_CSV_NAME, INDEX_CSV_NAME, INDEX_TXT_NAME, LOG_FILE_NAME, SNAPSHOT_DIR_NAME,
    STATUS_FILE_NAME,
};
