//! Skip rules and path normalization for the scanner.
//!
//! Two renderings exist for every scanned path:
//! - the *access form*, safe to hand to `open` even past the legacy
//!   `MAX_PATH` limit on Windows (a no-op elsewhere)
//! - the *display form*, `ID:\dir\file.ext`, used for sorting and reports

use crate::core::volume::Volume;
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

const VERBATIM_PREFIX: &str = r"\\?\";
const VERBATIM_UNC_PREFIX: &str = r"\\?\UNC\";

/// Separator used by every display path
pub const DISPLAY_SEPARATOR: char = '\\';

/// Directory names that are never descended into (compared uppercase)
const RESERVED_DIRECTORIES: &[&str] = &[
    "SYSTEM VOLUME INFORMATION",
    "$RECYCLE.BIN",
    "RECYCLER",
    "_QUARANTINE",
];

/// Prefix of quarantine folders created per source set (e.g. `_QUARANTINE_FROM_HIJ`)
const QUARANTINE_VARIANT_PREFIX: &str = "_QUARANTINE_FROM_";

/// Prefix of chkdsk recovery folders (`FOUND.000`, `FOUND.001`, ...)
const RECOVERY_PREFIX: &str = "FOUND.";

/// Decides which directories are scan-worthy and renders paths.
#[derive(Debug, Clone)]
pub struct PathPolicy {
    /// Extra directory names to prune, stored uppercase
    extra_skips: HashSet<String>,
}

impl PathPolicy {
    /// Create a policy with the built-in skip rules only
    pub fn new() -> Self {
        Self {
            extra_skips: HashSet::new(),
        }
    }

    /// Prune additional directory names (case-insensitive)
    pub fn with_skipped<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extra_skips
            .extend(names.into_iter().map(|n| n.as_ref().to_uppercase()));
        self
    }

    /// Whether a directory with this name must be pruned from the walk
    pub fn should_skip_directory(&self, name: &str) -> bool {
        let upper = name.to_uppercase();

        if RESERVED_DIRECTORIES.contains(&upper.as_str()) {
            return true;
        }
        if upper.starts_with(QUARANTINE_VARIANT_PREFIX) {
            return true;
        }
        if let Some(suffix) = upper.strip_prefix(RECOVERY_PREFIX) {
            if !suffix.is_empty() && suffix.chars().all(|c| c.is_ascii_digit()) {
                return true;
            }
        }

        self.extra_skips.contains(&upper)
    }

    /// Render a path in a form that can be opened regardless of its length
    pub fn to_access_form(&self, path: &Path) -> PathBuf {
        access_form(path)
    }

    /// Render an access-form path as `ID:\relative\path`.
    ///
    /// The volume root is stripped and replaced by the uppercase volume
    /// identifier; separators are normalized to a backslash.
    pub fn to_display_form(&self, access_path: &Path, volume: &Volume) -> String {
        let raw = strip_access_prefix(&access_path.to_string_lossy());
        let root = strip_access_prefix(&volume.root.to_string_lossy());

        if let Ok(relative) = Path::new(&raw).strip_prefix(Path::new(&root)) {
            let parts: Vec<String> = relative
                .components()
                .filter_map(|c| match c {
                    Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                    _ => None,
                })
                .collect();
            return format!("{}:{}{}", volume.id, DISPLAY_SEPARATOR, parts.join("\\"));
        }

        force_volume_token(&raw, &volume.id)
    }
}

impl Default for PathPolicy {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(windows)]
fn access_form(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    PathBuf::from(verbatim(&absolute.to_string_lossy()))
}

#[cfg(not(windows))]
fn access_form(path: &Path) -> PathBuf {
    path.to_path_buf()
}

/// Prefix a Windows path with `\\?\` (or `\\?\UNC\` for shares)
#[cfg_attr(not(windows), allow(dead_code))]
fn verbatim(raw: &str) -> String {
    if raw.starts_with(VERBATIM_PREFIX) {
        return raw.to_string();
    }
    let normalized = raw.replace('/', "\\");
    match normalized.strip_prefix(r"\\") {
        Some(share) => format!("{}{}", VERBATIM_UNC_PREFIX, share),
        None => format!("{}{}", VERBATIM_PREFIX, normalized),
    }
}

fn strip_access_prefix(raw: &str) -> String {
    if let Some(share) = raw.strip_prefix(VERBATIM_UNC_PREFIX) {
        format!(r"\\{}", share)
    } else if let Some(local) = raw.strip_prefix(VERBATIM_PREFIX) {
        local.to_string()
    } else {
        raw.to_string()
    }
}

/// Fallback for paths outside the volume root: normalize separators and
/// replace (or add) the leading drive token.
fn force_volume_token(raw: &str, volume_id: &str) -> String {
    let normalized = raw.replace('/', "\\");
    let bytes = normalized.as_bytes();
    if bytes.len() >= 2 && bytes[1] == b':' && bytes[0].is_ascii_alphabetic() {
        return format!("{}{}", volume_id, &normalized[1..]);
    }
    let rest = normalized.trim_start_matches(DISPLAY_SEPARATOR);
    format!("{}:{}{}", volume_id, DISPLAY_SEPARATOR, rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> PathPolicy {
        PathPolicy::new()
    }

    #[test]
    fn skips_volume_metadata_case_insensitively() {
        assert!(policy().should_skip_directory("System Volume Information"));
        assert!(policy().should_skip_directory("system volume information"));
        assert!(policy().should_skip_directory("$Recycle.Bin"));
    }

    #[test]
    fn skips_quarantine_exact_and_variant() {
        assert!(policy().should_skip_directory("_quarantine"));
        assert!(policy().should_skip_directory("_QUARANTINE_FROM_HIJ"));
        assert!(!policy().should_skip_directory("quarantine_notes"));
    }

    #[test]
    fn skips_recovery_folders_only_with_digit_suffix() {
        assert!(policy().should_skip_directory("FOUND.000"));
        assert!(policy().should_skip_directory("found.017"));
        assert!(!policy().should_skip_directory("FOUND."));
        assert!(!policy().should_skip_directory("FOUND.ABC"));
        assert!(!policy().should_skip_directory("Found items"));
    }

    #[test]
    fn ordinary_directories_are_scanned() {
        assert!(!policy().should_skip_directory("docs"));
        assert!(!policy().should_skip_directory("Photos 2019"));
    }

    #[test]
    fn extra_skips_are_case_insensitive() {
        let policy = PathPolicy::new().with_skipped(["node_modules"]);
        assert!(policy.should_skip_directory("Node_Modules"));
        assert!(!policy.should_skip_directory("modules"));
    }

    #[test]
    fn verbatim_prefixes_local_and_unc_paths() {
        assert_eq!(verbatim(r"H:\docs\a.txt"), r"\\?\H:\docs\a.txt");
        assert_eq!(verbatim("H:/docs/a.txt"), r"\\?\H:\docs\a.txt");
        assert_eq!(verbatim(r"\\nas\share\a.txt"), r"\\?\UNC\nas\share\a.txt");
        assert_eq!(verbatim(r"\\?\H:\already"), r"\\?\H:\already");
    }

    #[test]
    fn strip_access_prefix_reverses_verbatim() {
        assert_eq!(strip_access_prefix(r"\\?\H:\docs\a.txt"), r"H:\docs\a.txt");
        assert_eq!(strip_access_prefix(r"\\?\UNC\nas\share"), r"\\nas\share");
        assert_eq!(strip_access_prefix("/plain/path"), "/plain/path");
    }

    #[cfg(not(windows))]
    #[test]
    fn access_form_is_identity_off_windows() {
        let path = Path::new("/mnt/h/docs/report.txt");
        assert_eq!(policy().to_access_form(path), path.to_path_buf());
    }

    #[cfg(not(windows))]
    #[test]
    fn display_form_replaces_root_with_volume_token() {
        let volume = Volume::new("h", "/mnt/h").unwrap();
        let display = policy().to_display_form(Path::new("/mnt/h/docs/report.txt"), &volume);
        assert_eq!(display, r"H:\docs\report.txt");
    }

    #[test]
    fn fallback_forces_drive_letter() {
        assert_eq!(force_volume_token(r"i:\backup\copy.txt", "I"), r"I:\backup\copy.txt");
        assert_eq!(force_volume_token("/elsewhere/copy.txt", "I"), r"I:\elsewhere\copy.txt");
    }

    #[test]
    fn display_form_is_stable_for_identical_input() {
        let volume = Volume::new("H", "/data").unwrap();
        let path = Path::new("/data/a/b.txt");
        assert_eq!(
            policy().to_display_form(path, &volume),
            policy().to_display_form(path, &volume)
        );
    }
}
