//! Human-readable formatting for sizes, speeds and durations.

const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Formats a byte count with a 1024 base and one decimal, e.g. `1.5 MB`.
pub fn format_file_size(bytes: f64) -> String {
    let mut size = bytes;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{size:.1} {}", UNITS[unit])
}

/// Formats a transfer rate, e.g. `12.0 MB/s`.
pub fn format_speed(bytes_per_second: f64) -> String {
    format!("{}/s", format_file_size(bytes_per_second))
}

/// Formats seconds as `m:ss`, or `h:mm:ss` from one hour up.
///
/// Non-finite input renders as `--:--`.
pub fn format_duration(seconds: f64) -> String {
    if !seconds.is_finite() {
        return "--:--".into();
    }
    let total = seconds.max(0.0) as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes}:{secs:02}")
    }
}
