//! Trading-session time encoding
//!
//! The source of record stores daily trading and break periods as single
//! `HHMMHHMM` integers and the half-day early close as `HHMM`; internally
//! everything is seconds since midnight in the exchange's local time.

/// Seconds since midnight
pub type TimeOfDay = u32;

/// Decode an `HHMM` integer into seconds since midnight.
///
/// Non-positive input means "not set" and yields `None`, leaving the
/// caller's previous value in force.
pub fn decode_time_of_day(encoded: i64) -> Option<TimeOfDay> {
    (encoded > 0).then(|| split_hhmm(encoded))
}

/// Decode an `HHMMHHMM` period into start/end seconds since midnight
pub fn decode_period(encoded: i64) -> Option<(TimeOfDay, TimeOfDay)> {
    if encoded <= 0 {
        return None;
    }
    Some((split_hhmm(encoded / 10000), split_hhmm(encoded % 10000)))
}

fn split_hhmm(hhmm: i64) -> TimeOfDay {
    let hours = (hhmm / 100) as TimeOfDay;
    let minutes = (hhmm % 100) as TimeOfDay;
    hours * 3600 + minutes * 60
}

/// Format seconds since midnight as `H:MM`
pub fn format_time_of_day(seconds: TimeOfDay) -> String {
    format!("{}:{:02}", seconds / 3600, seconds % 3600 / 60)
}

/// Format a period as `H:MM-H:MM`
pub fn format_period(start: TimeOfDay, end: TimeOfDay) -> String {
    format!("{}-{}", format_time_of_day(start), format_time_of_day(end))
}
