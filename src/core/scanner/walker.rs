//! Directory walking implementation using walkdir.
//!
//! walkdir keeps its own stack of open directory listings instead of
//! recursing, so tree depth is bounded by heap rather than the call stack.

use super::policy::PathPolicy;
use crate::core::volume::Volume;
use crate::core::warnings::WarningTracker;
use crate::error::ScanError;
use std::io;
use std::path::PathBuf;
use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

/// Walks one volume at a time, yielding regular files in access form.
#[derive(Debug, Clone, Default)]
pub struct DirectoryWalker {
    policy: PathPolicy,
}

impl DirectoryWalker {
    /// Create a walker that prunes according to `policy`
    pub fn new(policy: PathPolicy) -> Self {
        Self { policy }
    }

    /// The path policy used for pruning and path rendering
    pub fn policy(&self) -> &PathPolicy {
        &self.policy
    }

    /// Start a fresh walk of `volume`.
    ///
    /// Symbolic links are never followed and are not yielded. An absent
    /// root yields nothing and is logged at info level.
    pub fn walk<'a>(&'a self, volume: &Volume, warnings: &'a WarningTracker) -> VolumeWalk<'a> {
        if !volume.is_mounted() {
            info!(
                "Volume {} not found at {}, skipping",
                volume,
                volume.root.display()
            );
            return VolumeWalk {
                entries: None,
                warnings,
            };
        }

        let root = self.policy.to_access_form(&volume.root);
        let policy = &self.policy;
        let entries = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| keep_entry(policy, entry));

        VolumeWalk {
            entries: Some(Box::new(entries)),
            warnings,
        }
    }
}

fn keep_entry(policy: &PathPolicy, entry: &DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return true;
    }
    let name = entry.file_name().to_string_lossy();
    if policy.should_skip_directory(&name) {
        debug!("Pruning {}", entry.path().display());
        return false;
    }
    true
}

/// Lazy sequence of file paths under one volume root.
///
/// Enumeration failures are routed to the warning tracker and the
/// offending directory is skipped; the walk always continues.
pub struct VolumeWalk<'a> {
    entries: Option<Box<dyn Iterator<Item = walkdir::Result<DirEntry>> + 'a>>,
    warnings: &'a WarningTracker,
}

impl Iterator for VolumeWalk<'_> {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        let entries = self.entries.as_mut()?;
        loop {
            match entries.next()? {
                Ok(entry) if entry.file_type().is_file() => return Some(entry.into_path()),
                Ok(_) => continue,
                Err(err) => {
                    self.warnings.warn(walk_error(err));
                }
            }
        }
    }
}

fn walk_error(err: walkdir::Error) -> ScanError {
    let path = err.path().map(|p| p.to_path_buf()).unwrap_or_default();
    let message = err.to_string();
    let source = err.into_io_error().unwrap_or_else(|| io::Error::other(message));
    ScanError::ReadDirectory { path, source }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::io::Write;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    /// In-memory sink for formatted log lines
    #[derive(Clone, Default)]
    struct CapturedLog(Arc<Mutex<Vec<u8>>>);

    impl Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLog {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    fn write_file(path: PathBuf, content: &[u8]) {
        let mut file = File::create(path).unwrap();
        file.write_all(content).unwrap();
    }

    fn volume_at(dir: &TempDir) -> Volume {
        Volume::new("H", dir.path()).unwrap()
    }

    fn names(paths: &[PathBuf]) -> Vec<String> {
        let mut names: Vec<String> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn walk_empty_directory_yields_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let walker = DirectoryWalker::default();
        let warnings = WarningTracker::new();

        let files: Vec<PathBuf> = walker.walk(&volume_at(&temp_dir), &warnings).collect();

        assert!(files.is_empty());
        assert_eq!(warnings.total(), 0);
    }

    #[test]
    fn walk_traverses_nested_directories() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a").join("b").join("c");
        fs::create_dir_all(&nested).unwrap();
        write_file(temp_dir.path().join("top.txt"), b"top");
        write_file(nested.join("deep.txt"), b"deep");

        let walker = DirectoryWalker::default();
        let warnings = WarningTracker::new();
        let files: Vec<PathBuf> = walker.walk(&volume_at(&temp_dir), &warnings).collect();

        assert_eq!(names(&files), vec!["deep.txt", "top.txt"]);
    }

    #[test]
    fn walk_prunes_reserved_directories_without_warning() {
        let temp_dir = TempDir::new().unwrap();
        let reserved = temp_dir.path().join("System Volume Information");
        let recovery = temp_dir.path().join("FOUND.001");
        fs::create_dir_all(&reserved).unwrap();
        fs::create_dir_all(&recovery).unwrap();
        write_file(reserved.join("tracking.log"), b"x");
        write_file(recovery.join("FILE0000.CHK"), b"x");
        write_file(temp_dir.path().join("keep.txt"), b"keep");

        let walker = DirectoryWalker::default();
        let warnings = WarningTracker::new();
        let files: Vec<PathBuf> = walker.walk(&volume_at(&temp_dir), &warnings).collect();

        assert_eq!(names(&files), vec!["keep.txt"]);
        assert_eq!(warnings.total(), 0);
    }

    #[test]
    fn walk_missing_root_yields_nothing_and_no_warning() {
        let volume = Volume::new("Z", "/nonexistent/volume/root/12345").unwrap();
        let walker = DirectoryWalker::default();
        let warnings = WarningTracker::new();

        assert_eq!(walker.walk(&volume, &warnings).count(), 0);
        assert_eq!(warnings.total(), 0);
    }

    #[test]
    fn missing_root_is_logged_at_info_not_warn() {
        let volume = Volume::new("Z", "/nonexistent/volume/root/12345").unwrap();
        let walker = DirectoryWalker::default();
        let warnings = WarningTracker::new();
        let log = CapturedLog::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer({
                let log = log.clone();
                move || log.clone()
            })
            .with_ansi(false)
            .with_max_level(tracing::Level::INFO)
            .finish();

        let yielded =
            tracing::subscriber::with_default(subscriber, || walker.walk(&volume, &warnings).count());

        let text = log.text();
        assert_eq!(yielded, 0);
        assert!(text.contains("INFO"));
        assert!(text.contains("Volume Z: not found at /nonexistent/volume/root/12345"));
        assert!(!text.contains("WARN"));
    }

    #[test]
    fn unreadable_directory_warns_and_walk_continues() {
        let temp_dir = TempDir::new().unwrap();
        let swapped = temp_dir.path().join("b_dir");
        fs::create_dir_all(&swapped).unwrap();
        write_file(temp_dir.path().join("a.txt"), b"a");
        write_file(temp_dir.path().join("c.txt"), b"c");

        let walker = DirectoryWalker::default();
        let warnings = WarningTracker::new();
        let mut files = walker.walk(&volume_at(&temp_dir), &warnings);

        // The root listing is read before the first file comes back; turning
        // b_dir into a file now makes descending into it fail.
        let first = files.next().unwrap();
        fs::remove_dir(&swapped).unwrap();
        write_file(swapped.clone(), b"no longer a directory");
        let rest: Vec<PathBuf> = files.collect();

        assert_eq!(names(&[first]), vec!["a.txt"]);
        assert_eq!(names(&rest), vec!["c.txt"]);
        assert_eq!(warnings.total(), 1);
        assert_eq!(warnings.distinct(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn walk_does_not_follow_symlinks() {
        let temp_dir = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        write_file(outside.path().join("outside.txt"), b"x");
        write_file(temp_dir.path().join("inside.txt"), b"x");
        std::os::unix::fs::symlink(outside.path(), temp_dir.path().join("link")).unwrap();
        std::os::unix::fs::symlink(
            temp_dir.path().join("inside.txt"),
            temp_dir.path().join("file-link"),
        )
        .unwrap();

        let walker = DirectoryWalker::default();
        let warnings = WarningTracker::new();
        let files: Vec<PathBuf> = walker.walk(&volume_at(&temp_dir), &warnings).collect();

        assert_eq!(names(&files), vec!["inside.txt"]);
    }

    #[test]
    fn each_walk_starts_from_scratch() {
        let temp_dir = TempDir::new().unwrap();
        write_file(temp_dir.path().join("one.txt"), b"1");

        let walker = DirectoryWalker::default();
        let warnings = WarningTracker::new();
        let volume = volume_at(&temp_dir);

        assert_eq!(walker.walk(&volume, &warnings).count(), 1);
        write_file(temp_dir.path().join("two.txt"), b"2");
        assert_eq!(walker.walk(&volume, &warnings).count(), 2);
    }
}
