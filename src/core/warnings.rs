//! Rate-limited warning collection.
//!
//! A whole unreadable subtree can produce thousands of identical failures.
//! Each distinct message is shown at most `cap` times as it happens; the
//! rollup at the end of the run reports the full count for anything that
//! went past the cap.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Display;
use std::sync::Mutex;
use tracing::warn;

/// How many times a given message is displayed before it is held back
pub const DEFAULT_WARNING_CAP: usize = 3;

/// A message that exceeded the display cap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarningRollup {
    pub message: String,
    pub count: usize,
}

#[derive(Debug, Default)]
struct Counts {
    /// Messages in first-seen order
    order: Vec<String>,
    by_message: HashMap<String, usize>,
}

impl Counts {
    fn bump(&mut self, message: String, by: usize) -> usize {
        match self.by_message.get_mut(&message) {
            Some(count) => {
                *count += by;
                *count
            }
            None => {
                self.order.push(message.clone());
                self.by_message.insert(message, by);
                by
            }
        }
    }
}

/// Collects recoverable scan errors for one run.
///
/// Safe to share between threads; counters are serialized behind a mutex.
#[derive(Debug)]
pub struct WarningTracker {
    cap: usize,
    counts: Mutex<Counts>,
}

impl WarningTracker {
    /// Create a tracker with the default display cap
    pub fn new() -> Self {
        Self::with_cap(DEFAULT_WARNING_CAP)
    }

    /// Create a tracker with a custom display cap
    pub fn with_cap(cap: usize) -> Self {
        Self {
            cap,
            counts: Mutex::new(Counts::default()),
        }
    }

    /// Record one occurrence of `message`.
    ///
    /// Returns `true` if the message was displayed, `false` if it was held
    /// back for the rollup.
    pub fn warn(&self, message: impl Display) -> bool {
        let message = message.to_string();
        let count = self.lock().bump(message.clone(), 1);
        if count <= self.cap {
            warn!("{}", message);
            true
        } else {
            false
        }
    }

    /// Occurrences recorded for one message
    pub fn count(&self, message: &str) -> usize {
        self.lock().by_message.get(message).copied().unwrap_or(0)
    }

    /// Number of distinct messages recorded
    pub fn distinct(&self) -> usize {
        self.lock().order.len()
    }

    /// Total occurrences across all messages
    pub fn total(&self) -> usize {
        self.lock().by_message.values().sum()
    }

    /// Fold another tracker's counters into this one without re-displaying them
    pub fn absorb(&self, other: WarningTracker) {
        let other = other
            .counts
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut counts = self.lock();
        for message in other.order {
            let by = other.by_message.get(&message).copied().unwrap_or(0);
            counts.bump(message, by);
        }
    }

    /// Log one consolidated line per message that went past the cap
    pub fn summary(&self) -> Vec<WarningRollup> {
        let counts = self.lock();
        let rollups: Vec<WarningRollup> = counts
            .order
            .iter()
            .filter_map(|message| {
                let count = counts.by_message.get(message).copied().unwrap_or(0);
                (count > self.cap).then(|| WarningRollup {
                    message: message.clone(),
                    count,
                })
            })
            .collect();

        for rollup in &rollups {
            warn!("{} (repeated x{})", rollup.message, rollup.count);
        }
        rollups
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Counts> {
        self.counts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for WarningTracker {
    fn default() -> Self {
        Self::new()
    }
}
