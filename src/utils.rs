//! Utility functions shared across the codebase.
//!
//! Conversions between fractional hours and clock times, and the small
//! formatting helpers used when printing locations and results.

use chrono::{DateTime, FixedOffset, NaiveTime, Timelike};
use std::path::Path;

/// Convert a clock time to fractional hours since midnight.
///
/// # Examples
/// ```
/// use chrono::NaiveTime;
/// use suncalc::utils::fractional_hour;
/// let time = NaiveTime::from_hms_opt(5, 45, 0).unwrap();
/// assert_eq!(fractional_hour(time), 5.75);
/// ```
pub fn fractional_hour(time: NaiveTime) -> f64 {
    time.num_seconds_from_midnight() as f64 / 3600.0 + time.nanosecond() as f64 / 3.6e12
}

/// Convert fractional hours in `[0, 24)` to a clock time, rounded to the second.
///
/// Returns `None` for values outside one day or non-finite input.
///
/// # Examples
/// ```
/// use chrono::NaiveTime;
/// use suncalc::utils::clock_time;
/// assert_eq!(clock_time(5.75), NaiveTime::from_hms_opt(5, 45, 0));
/// assert_eq!(clock_time(f64::NAN), None);
/// ```
pub fn clock_time(hour: f64) -> Option<NaiveTime> {
    if !(0.0..24.0).contains(&hour) {
        return None;
    }
    // 23:59:59.6 rounds to the last second of the day rather than overflowing
    let seconds = ((hour * 3600.0).round() as u32).min(86_399);
    NaiveTime::from_num_seconds_from_midnight_opt(seconds, 0)
}

/// Format an optional event time, using `--:--` for an event that does not occur.
pub fn format_event(event: Option<&DateTime<FixedOffset>>, format_str: &str) -> String {
    match event {
        Some(time) => time.format(format_str).to_string(),
        None => "--:--".to_string(),
    }
}

/// Format a duration as `14h 47m`.
pub fn format_duration(duration: chrono::Duration) -> String {
    let minutes = duration.num_minutes();
    format!("{}h {:02}m", minutes / 60, minutes % 60)
}

/// Format coordinates with hemisphere letters, e.g. `37.5000°S, 145.0100°E`.
pub fn format_coordinates(latitude: f64, longitude: f64) -> String {
    format!(
        "{:.4}°{}, {:.4}°{}",
        latitude.abs(),
        if latitude >= 0.0 { "N" } else { "S" },
        longitude.abs(),
        if longitude >= 0.0 { "E" } else { "W" }
    )
}

/// Shorten a path under the home directory to `~/...` for display.
pub fn path_for_display(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(relative) = path.strip_prefix(&home) {
            return format!("~/{}", relative.display());
        }
    }
    path.display().to_string()
}
