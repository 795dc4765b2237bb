//! Number and timestamp renderings shared by the report writers.
//!
//! Integers use `.` as the thousands separator and decimals use `,`, which
//! is what the downstream spreadsheets expect.

use chrono::NaiveDateTime;

const MIB: f64 = 1024.0 * 1024.0;
const GIB: f64 = 1024.0 * 1024.0 * 1024.0;
const TIB: f64 = 1024.0 * 1024.0 * 1024.0 * 1024.0;

/// `DD/MM/YYYY HH:MM:SS`, used by the full index
pub const INDEX_TIME_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// `YYYY-MM-DD HH:MM:SS`, used by the grouped text and duplicates report
pub const ISO_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Insert `.` every three digits from the right of a digit string
fn group_digits(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}

/// `1234567` -> `1.234.567`
pub fn group_thousands(value: u64) -> String {
    group_digits(&value.to_string())
}

/// Fixed-point decimal with grouped thousands and a comma separator.
///
/// `1234.5` with two decimals -> `1.234,50`
pub fn decimal_comma(value: f64, decimals: usize) -> String {
    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let mut out = String::new();
    if value.is_sign_negative() && fixed.chars().any(|c| c != '0' && c != '.') {
        out.push('-');
    }
    out.push_str(&group_digits(int_part));
    if let Some(frac) = frac_part {
        out.push(',');
        out.push_str(frac);
    }
    out
}

/// Size in MiB for the index `MB` column.
///
/// Below one MiB the column reads `0`. Otherwise two decimals with a comma,
/// dropping a trailing `,00` or a single trailing zero.
pub fn format_mb(bytes: u64) -> String {
    let mb = bytes as f64 / MIB;
    if mb < 1.0 {
        return "0".to_string();
    }
    let formatted = format!("{mb:.2}").replace('.', ",");
    if let Some(whole) = formatted.strip_suffix(",00") {
        whole.to_string()
    } else if let Some(trimmed) = formatted.strip_suffix('0') {
        trimmed.to_string()
    } else {
        formatted
    }
}

pub fn gibibytes(bytes: u64) -> f64 {
    bytes as f64 / GIB
}

pub fn tebibytes(bytes: u64) -> f64 {
    bytes as f64 / TIB
}

pub fn index_time(at: &NaiveDateTime) -> String {
    at.format(INDEX_TIME_FORMAT).to_string()
}

pub fn iso_time(at: &NaiveDateTime) -> String {
    at.format(ISO_TIME_FORMAT).to_string()
}
