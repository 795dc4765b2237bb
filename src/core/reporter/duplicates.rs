//! Duplicates-only report.

use super::format::iso_time;
use crate::core::inventory::HashGroup;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Header row of the duplicates report.
///
/// Consumers key on these names; renaming a column breaks them.
pub const DUPLICATES_HEADER: [&str; 5] = ["Hash", "SHA256", "Bytes", "LastWrite", "Path"];

/// Totals over the groups that made it into the report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateCounts {
    pub groups: usize,
    pub files: usize,
}

/// Write every member of every group with two or more members.
///
/// Groups keep the order they are given in (ascending digest from
/// [`Aggregator::group_by_hash`](crate::core::inventory::Aggregator::group_by_hash));
/// members keep the group ordering, so the first row of a group is the copy
/// to preserve.
pub fn write_duplicates_csv<W: Write>(
    groups: &[HashGroup<'_>],
    sink: W,
) -> Result<DuplicateCounts, csv::Error> {
    let mut writer = csv::Writer::from_writer(sink);
    writer.write_record(DUPLICATES_HEADER)?;

    let mut counts = DuplicateCounts::default();
    for group in groups.iter().filter(|g| g.is_duplicate()) {
        counts.groups += 1;
        counts.files += group.len();

        for record in &group.members {
            let bytes = record.size_bytes.to_string();
            let last_write = iso_time(&record.modified_at);
            writer.write_record([
                group.digest,
                group.digest,
                bytes.as_str(),
                last_write.as_str(),
                record.display_path.as_str(),
            ])?;
        }
    }

    writer.flush()?;
    Ok(counts)
}
