//! Human-readable renderings of metadata fields.

use chrono::NaiveDateTime;

const BYTE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Length of `YYYY-MM-DDThh:mm:ss`; anything after it (fractional seconds,
/// UTC offsets) is ignored when reformatting.
const ISO_SECONDS_LEN: usize = 19;

/// Binary-prefixed size with two decimals, e.g. `1.00 GB`.
pub fn format_file_size(bytes: u64) -> String {
    let mut size = bytes as f64;
    for unit in BYTE_UNITS {
        if size < 1024.0 {
            return format!("{size:.2} {unit}");
        }
        size /= 1024.0;
    }
    format!("{size:.2} PB")
}

/// Seconds below a minute, minutes below an hour, `hour_unit` beyond.
pub fn format_duration(seconds: f64, hour_unit: &str) -> String {
    if seconds < 60.0 {
        format!("{seconds:.0} sec")
    } else if seconds < 3600.0 {
        format!("{:.1} min", seconds / 60.0)
    } else {
        format!("{:.1} {hour_unit}", seconds / 3600.0)
    }
}

/// Millions of events per second, or `N/A` without a positive duration.
pub fn format_count_rate(total_counts: u64, duration: f64) -> String {
    if duration > 0.0 {
        let rate = total_counts as f64 / duration / 1e6;
        format!("{rate:.3} ME/s")
    } else {
        "N/A".to_string()
    }
}

/// Reformats an ISO-8601-like timestamp using `output_format`.
///
/// Empty input renders as `N/A`. Only the first 19 characters are parsed;
/// input that still does not parse is returned unchanged.
pub fn format_iso_timestamp(raw: &str, output_format: &str) -> String {
    if raw.is_empty() {
        return "N/A".to_string();
    }
    let head = match raw.char_indices().nth(ISO_SECONDS_LEN) {
        Some((end, _)) => &raw[..end],
        None => raw,
    };
    match NaiveDateTime::parse_from_str(head, "%Y-%m-%dT%H:%M:%S") {
        Ok(parsed) => parsed.format(output_format).to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Renders a reduction folder timestamp (`2025-05-08T162147`) as
/// `2025-05-08 16:21:47`, or returns it unchanged when it does not parse.
pub fn format_reduction_timestamp(raw: &str) -> String {
    match NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H%M%S") {
        Ok(parsed) => parsed.format("%Y-%m-%d %H:%M:%S").to_string(),
        Err(_) => raw.to_string(),
    }
}
