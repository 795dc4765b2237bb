//! Volume identifiers and the roots they scan.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

/// One logical storage unit scanned independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Volume {
    /// Uppercase single-token identifier (e.g. `H`)
    pub id: String,
    /// Directory the walk starts from
    pub root: PathBuf,
}

impl Volume {
    /// Create a volume with an explicit root
    pub fn new(id: &str, root: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let id = normalize_id(id).ok_or_else(|| ConfigError::InvalidVolume {
            spec: id.to_string(),
        })?;
        Ok(Self {
            id,
            root: root.into(),
        })
    }

    /// Parse `H`, `H:` or `H=/some/path`.
    ///
    /// A bare identifier resolves to its drive root (`H:\`) on Windows and
    /// to `/mnt/h` elsewhere.
    pub fn parse(spec: &str) -> Result<Self, ConfigError> {
        let spec = spec.trim();
        match spec.split_once('=') {
            Some((id, root)) if !root.trim().is_empty() => Volume::new(id, root.trim()),
            Some(_) => Err(ConfigError::InvalidVolume {
                spec: spec.to_string(),
            }),
            None => {
                let id = normalize_id(spec).ok_or_else(|| ConfigError::InvalidVolume {
                    spec: spec.to_string(),
                })?;
                let root = default_root(&id);
                Ok(Self { id, root })
            }
        }
    }

    /// Parse a list of volume specifications, rejecting repeats
    pub fn parse_all<S: AsRef<str>>(specs: &[S]) -> Result<Vec<Self>, ConfigError> {
        if specs.is_empty() {
            return Err(ConfigError::NoVolumes);
        }

        let mut seen = HashSet::new();
        let mut volumes = Vec::with_capacity(specs.len());
        for spec in specs {
            let volume = Volume::parse(spec.as_ref())?;
            if !seen.insert(volume.id.clone()) {
                return Err(ConfigError::DuplicateVolume { id: volume.id });
            }
            volumes.push(volume);
        }
        Ok(volumes)
    }

    /// Whether the volume root is present on this host
    pub fn is_mounted(&self) -> bool {
        self.root.is_dir()
    }
}

impl std::fmt::Display for Volume {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:", self.id)
    }
}

fn normalize_id(raw: &str) -> Option<String> {
    let id = raw.trim().trim_end_matches(':').to_uppercase();
    if !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric()) {
        Some(id)
    } else {
        None
    }
}

#[cfg(windows)]
fn default_root(id: &str) -> PathBuf {
    PathBuf::from(format!("{}:\\", id))
}

#[cfg(not(windows))]
fn default_root(id: &str) -> PathBuf {
    PathBuf::from("/mnt").join(id.to_lowercase())
}
