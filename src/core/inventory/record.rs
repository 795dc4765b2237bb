//! The fixed-shape record produced for every hashed file.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Extension recorded for files without one
pub const NO_EXTENSION: &str = "(none)";

/// One successfully hashed file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Uppercase hexadecimal SHA-256 of the full content
    pub digest: String,
    /// Canonical `ID:\dir\file` location; the sort and display key
    pub display_path: String,
    /// Volume the file was found on
    pub volume_id: String,
    /// Lowercase extension with its leading dot, or [`NO_EXTENSION`]
    pub extension: String,
    /// Byte length at scan time
    pub size_bytes: u64,
    /// Local wall-clock modification time at scan time, whole seconds
    pub modified_at: NaiveDateTime,
}

impl FileRecord {
    /// Case-insensitive form of the display path used for ordering
    pub fn path_key(&self) -> String {
        self.display_path.to_lowercase()
    }
}

/// Lowercase extension of the final dot-segment, including the dot.
///
/// Dotfiles such as `.bashrc` and names ending in a bare dot have no
/// extension.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| ext.to_string_lossy())
        .filter(|ext| !ext.is_empty())
        .map(|ext| format!(".{}", ext.to_lowercase()))
        .unwrap_or_else(|| NO_EXTENSION.to_string())
}
