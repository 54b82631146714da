//! Duration formatting helpers.

use chrono::TimeDelta;

/// Format a duration to a short human-readable string, e.g. `"3d 4h"`.
///
/// Negative durations are prefixed with `-`.
pub fn format_duration(delta: TimeDelta) -> String {
    let secs = delta.num_seconds();
    let sign = if secs < 0 { "-" } else { "" };
    let secs = secs.unsigned_abs();
    let body = if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs < 86400 {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    } else {
        format!("{}d {}h", secs / 86400, (secs % 86400) / 3600)
    };
    format!("{sign}{body}")
}

/// Seconds with sub-second precision, as a float (e.g. `6.25` for 6250ms).
pub fn seconds_f64(delta: TimeDelta) -> f64 {
    delta
        .num_nanoseconds()
        .map(|n| n as f64 / 1e9)
        .unwrap_or_else(|| delta.num_milliseconds() as f64 / 1e3)
}
