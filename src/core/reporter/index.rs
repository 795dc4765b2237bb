//! Full index writers: the delimited index and its grouped text rendering.

use super::format::{decimal_comma, format_mb, gibibytes, group_thousands, index_time, iso_time};
use crate::core::inventory::{FileRecord, HashGroup};
use chrono::NaiveDateTime;
use std::cmp::Reverse;
use std::io::{self, Write};

/// Header row of the full index
pub const INDEX_HEADER: [&str; 7] = [
    "Hash",
    "Path",
    "Drive",
    "Extension",
    "Length",
    "MB",
    "LastWrite",
];

/// Write one row per record, ordered by digest then case-insensitive path.
pub fn write_index_csv<W: Write>(groups: &[HashGroup<'_>], sink: W) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(sink);
    writer.write_record(INDEX_HEADER)?;

    let mut rows: Vec<&FileRecord> = groups
        .iter()
        .flat_map(|g| g.members.iter().copied())
        .collect();
    rows.sort_by(|a, b| {
        a.digest
            .cmp(&b.digest)
            .then_with(|| a.path_key().cmp(&b.path_key()))
            .then_with(|| a.display_path.cmp(&b.display_path))
    });

    for record in rows {
        let length = record.size_bytes.to_string();
        let mb = format_mb(record.size_bytes);
        let last_write = index_time(&record.modified_at);
        writer.write_record([
            record.digest.as_str(),
            record.display_path.as_str(),
            record.volume_id.as_str(),
            record.extension.as_str(),
            length.as_str(),
            mb.as_str(),
            last_write.as_str(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Render the grouped plain-text view.
///
/// Groups are ordered by their newest member, most recent first; members
/// are listed newest first. `generated_at` goes into the title line.
pub fn write_index_txt<W: Write>(
    groups: &[HashGroup<'_>],
    generated_at: NaiveDateTime,
    mut sink: W,
) -> io::Result<()> {
    let total_files: usize = groups.iter().map(|g| g.len()).sum();

    let mut ordered: Vec<(NaiveDateTime, &HashGroup<'_>)> = groups
        .iter()
        .filter_map(|g| g.latest_modified().map(|latest| (latest, g)))
        .collect();
    ordered.sort_by(|(a_latest, a), (b_latest, b)| {
        b_latest.cmp(a_latest).then_with(|| a.digest.cmp(b.digest))
    });

    let mut lines = vec![
        format!(
            "==== INDEX BY HASH  {}  {} files ====",
            generated_at.format("%Y-%m-%d %H:%M"),
            group_thousands(total_files as u64)
        ),
        "(Grouped by SHA256; groups ordered by most recent modification)".to_string(),
        String::new(),
    ];

    for (latest, group) in ordered {
        let mut members: Vec<&FileRecord> = group.members.clone();
        members.sort_by_key(|r| (Reverse(r.modified_at), r.path_key()));
        let earliest = group.earliest_modified().unwrap_or(latest);

        lines.push(format!(
            "=== HASH {}  {} files  {} GB  {} .. {} ===",
            group.digest,
            members.len(),
            decimal_comma(gibibytes(group.total_bytes()), 2),
            iso_time(&earliest),
            iso_time(&latest)
        ));
        for record in members {
            lines.push(format!(
                "{}   {:>10}  {}",
                iso_time(&record.modified_at),
                group_thousands(record.size_bytes),
                record.display_path
            ));
        }
        lines.push(String::new());
    }

    let text = lines.join("\n");
    writeln!(sink, "{}", text.trim_end())?;
    sink.flush()
}
