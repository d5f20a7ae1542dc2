use chrono::{DateTime, NaiveDateTime};

use crate::timeline::TimelineTime;

/// Smallest time step the timeline widget can express at maximum zoom.
pub const TIMELINE_STEP_MS: i64 = 50;

/// Convert a frame index to the widget's millisecond timestamp.
///
/// The exact time is rounded up to the nearest 50 ms step, so the mapping is
/// lossy and non-invertible: reversing it does not recover the exact frame.
pub fn frame_to_timestamp(frame: i64, frame_rate: f64) -> i64 {
    let exact_ms = (frame as f64 / frame_rate) * 1000.0;
    let step = TIMELINE_STEP_MS as f64;
    ((exact_ms / step).ceil() as i64) * TIMELINE_STEP_MS
}

/// Normalize a timeline time value to Unix epoch milliseconds.
///
/// Integers pass through unchanged. ISO-8601 strings are parsed with their
/// own offset (a bare datetime is read as UTC). Anything else, including an
/// unparseable string, is 0.
pub fn date_to_milliseconds(value: &TimelineTime) -> i64 {
    match value {
        TimelineTime::Millis(ms) => *ms,
        TimelineTime::Text(text) => parse_iso_millis(text).unwrap_or(0),
        TimelineTime::Other(_) => 0,
    }
}

fn parse_iso_millis(text: &str) -> Option<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.timestamp_millis());
    }
    // Offset-free datetimes, e.g. "1970-01-01T00:00:02.000"
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|dt| dt.and_utc().timestamp_millis())
}
