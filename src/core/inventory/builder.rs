//! Turns walked paths into [`FileRecord`]s.

use super::record::{extension_of, FileRecord};
use crate::core::hasher::ContentHasher;
use crate::core::scanner::PathPolicy;
use crate::core::volume::Volume;
use crate::core::warnings::WarningTracker;
use crate::error::ScanError;
use chrono::{DateTime, Local, SubsecRound};
use std::fs;
use std::path::Path;

/// Stats, hashes and describes one file at a time.
///
/// Every failure here is recoverable: it is reported to the warning
/// tracker and the file is left out. A record is never produced without a
/// digest.
pub struct RecordBuilder<'a> {
    policy: &'a PathPolicy,
    hasher: &'a dyn ContentHasher,
}

impl<'a> RecordBuilder<'a> {
    pub fn new(policy: &'a PathPolicy, hasher: &'a dyn ContentHasher) -> Self {
        Self { policy, hasher }
    }

    /// Build the record for the file at `access_path` on `volume`
    pub fn build(
        &self,
        access_path: &Path,
        volume: &Volume,
        warnings: &WarningTracker,
    ) -> Option<FileRecord> {
        let access_path = self.policy.to_access_form(access_path);

        let metadata = match fs::metadata(&access_path) {
            Ok(metadata) => metadata,
            Err(source) => {
                warnings.warn(ScanError::Metadata {
                    path: access_path,
                    source,
                });
                return None;
            }
        };
        let modified = match metadata.modified() {
            Ok(modified) => modified,
            Err(source) => {
                warnings.warn(ScanError::Metadata {
                    path: access_path,
                    source,
                });
                return None;
            }
        };

        let digest = match self.hasher.digest(&access_path) {
            Ok(digest) => digest,
            Err(e) => {
                warnings.warn(e);
                return None;
            }
        };

        Some(FileRecord {
            digest,
            display_path: self.policy.to_display_form(&access_path, volume),
            volume_id: volume.id.clone(),
            extension: extension_of(&access_path),
            size_bytes: metadata.len(),
            modified_at: DateTime::<Local>::from(modified)
                .naive_local()
                .trunc_subsecs(0),
        })
    }
}
