//! Date, time, timestamp and duration producers.

use crate::parameters::{DateRange, TimeRange};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike, Utc};
use rand::Rng;
use std::time::Duration;

/// Longest generated duration, in seconds (one year).
const MAX_DURATION_SECS: u64 = 365 * 24 * 60 * 60;

/// Generate a date in the inclusive range.
pub fn generate_date<R: Rng>(rng: &mut R, range: &DateRange) -> NaiveDate {
    let days = (range.max - range.min).num_days();
    if days <= 0 {
        return range.min;
    }
    let offset = rng.random_range(0..=days);
    range
        .min
        .checked_add_signed(TimeDelta::days(offset))
        .unwrap_or(range.min)
}

/// Generate a time of day in the inclusive range, with whole seconds.
pub fn generate_time<R: Rng>(rng: &mut R, range: &TimeRange) -> NaiveTime {
    let min = range.min.num_seconds_from_midnight();
    let max = range.max.num_seconds_from_midnight();
    if min >= max {
        return range.min;
    }
    let secs = rng.random_range(min..=max);
    NaiveTime::from_num_seconds_from_midnight_opt(secs, 0).unwrap_or(range.min)
}

/// Generate a UTC timestamp whose date and time parts fall in the given ranges.
pub fn generate_date_time<R: Rng>(
    rng: &mut R,
    dates: &DateRange,
    times: &TimeRange,
) -> DateTime<Utc> {
    let date = generate_date(rng, dates);
    let time = generate_time(rng, times);
    NaiveDateTime::new(date, time).and_utc()
}

/// Generate a non-zero duration of at most one year, with millisecond precision.
pub fn generate_duration<R: Rng>(rng: &mut R) -> Duration {
    let secs = rng.random_range(1..=MAX_DURATION_SECS);
    let millis = rng.random_range(0..1000u32);
    Duration::new(secs, millis * 1_000_000)
}

/// Generate a random timestamp between two parsed timestamps (inclusive, whole seconds).
pub fn generate_timestamp_between<R: Rng>(
    rng: &mut R,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> DateTime<Utc> {
    let start_ts = start.timestamp();
    let end_ts = end.timestamp();

    if start_ts >= end_ts {
        start
    } else {
        let random_ts = rng.random_range(start_ts..=end_ts);
        DateTime::from_timestamp(random_ts, 0).unwrap_or(start)
    }
}
