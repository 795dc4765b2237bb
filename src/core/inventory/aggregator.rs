//! Accumulates records across volumes and groups them by digest.

use super::record::FileRecord;
use chrono::NaiveDateTime;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

/// All records sharing one digest, in deterministic member order.
///
/// Borrowed from the [`Aggregator`]; rebuilt on every call to
/// [`Aggregator::group_by_hash`].
#[derive(Debug, Clone)]
pub struct HashGroup<'a> {
    pub digest: &'a str,
    pub members: Vec<&'a FileRecord>,
}

impl<'a> HashGroup<'a> {
    /// Number of files in the group
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Whether more than one file shares this content
    pub fn is_duplicate(&self) -> bool {
        self.members.len() > 1
    }

    /// First member under the group ordering; the copy to keep
    pub fn primary(&self) -> Option<&'a FileRecord> {
        self.members.first().copied()
    }

    pub fn total_bytes(&self) -> u64 {
        self.members.iter().map(|r| r.size_bytes).sum()
    }

    pub fn latest_modified(&self) -> Option<NaiveDateTime> {
        self.members.iter().map(|r| r.modified_at).max()
    }

    pub fn earliest_modified(&self) -> Option<NaiveDateTime> {
        self.members.iter().map(|r| r.modified_at).min()
    }
}

/// Owns the append-only record collection for one run
#[derive(Debug, Default)]
pub struct Aggregator {
    records: Vec<FileRecord>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, record: FileRecord) {
        self.records.push(record);
    }

    /// Append a whole batch, e.g. one finished volume
    pub fn extend(&mut self, batch: impl IntoIterator<Item = FileRecord>) {
        self.records.extend(batch);
    }

    pub fn records(&self) -> &[FileRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn total_bytes(&self) -> u64 {
        self.records.iter().map(|r| r.size_bytes).sum()
    }

    /// Number of distinct digests
    pub fn unique_digests(&self) -> usize {
        self.records
            .iter()
            .map(|r| r.digest.as_str())
            .collect::<HashSet<_>>()
            .len()
    }

    /// Partition the records by digest.
    ///
    /// Groups come back in ascending digest order. Within a group, members
    /// whose volume appears in `priority` sort first (in list order); ties
    /// are broken by case-insensitive display path. With an empty
    /// `priority` the order is by path alone.
    pub fn group_by_hash(&self, priority: &[String]) -> Vec<HashGroup<'_>> {
        let mut by_digest: BTreeMap<&str, Vec<&FileRecord>> = BTreeMap::new();
        for record in &self.records {
            by_digest.entry(record.digest.as_str()).or_default().push(record);
        }

        by_digest
            .into_iter()
            .map(|(digest, mut members)| {
                members.sort_by(|a, b| member_order(a, b, priority));
                HashGroup { digest, members }
            })
            .collect()
    }
}

fn priority_rank(volume_id: &str, priority: &[String]) -> usize {
    priority
        .iter()
        .position(|id| id.eq_ignore_ascii_case(volume_id))
        .unwrap_or(priority.len())
}

fn member_order(a: &FileRecord, b: &FileRecord, priority: &[String]) -> Ordering {
    priority_rank(&a.volume_id, priority)
        .cmp(&priority_rank(&b.volume_id, priority))
        .then_with(|| a.path_key().cmp(&b.path_key()))
        .then_with(|| a.display_path.cmp(&b.display_path))
}
