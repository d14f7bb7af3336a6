//! Wall-clock arithmetic shared by the availability and conflict services.

use chrono::{NaiveTime, Timelike};

/// Minutes since midnight. Seconds are truncated; schedules are defined on
/// whole minutes.
pub fn time_to_minutes(time: NaiveTime) -> i64 {
    (time.hour() * 60 + time.minute()) as i64
}

/// Format a minutes-since-midnight offset as "HH:MM".
pub fn minutes_to_time(minutes: i64) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Half-open overlap test: [a_start, a_end) and [b_start, b_end) overlap
/// iff a_start < b_end && b_start < a_end. Intervals sharing only a
/// boundary instant do not overlap.
pub fn intervals_overlap<T: PartialOrd>(a_start: T, a_end: T, b_start: T, b_end: T) -> bool {
    a_start < b_end && b_start < a_end
}
