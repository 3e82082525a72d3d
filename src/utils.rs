//! Wall-clock and monotonic-clock abstractions, and the exchange's datetime
//! string format.
//!
//! The engine mixes two notions of time: monotonic intervals for flush
//! timing, and wall-clock instants for order timestamps and session gating.
//! Both are injected so tests can control them.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Source of wall-clock time, used for order timestamps and session gating.
pub trait WallClock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Source of monotonic time, used only for flush-interval bookkeeping.
pub trait MonotonicClock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Real wall clock backed by `Utc::now`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemWallClock;

impl WallClock for SystemWallClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Real monotonic clock backed by `std::time::Instant`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemMonotonicClock;

impl MonotonicClock for SystemMonotonicClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Far-future sentinel for the `"EOT"` deactivation-time string.
#[must_use]
pub fn end_of_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2100, 1, 1, 0, 0, 0).unwrap()
}

/// Expected format for activation/deactivation time strings, local to the
/// exchange's configured zone.
pub const DATETIME_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

/// Error returned when an activation/deactivation string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeParseError {
    pub input: String,
}

impl fmt::Display for TimeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "could not parse '{}' as a 'dd-mm-YYYY HH:MM:SS' datetime",
            self.input
        )
    }
}

impl std::error::Error for TimeParseError {}

/// Parse an activation-time string. Only `""` and `"NOW"` resolve to `now`;
/// anything else, including `"EOT"`, must parse as a `dd-mm-YYYY HH:MM:SS`
/// datetime.
pub fn parse_activation_time(
    input: &str,
    now: DateTime<Utc>,
    zone: &chrono_tz::Tz,
) -> Result<DateTime<Utc>, TimeParseError> {
    if input.is_empty() || input.eq_ignore_ascii_case("NOW") {
        return Ok(now);
    }
    parse_datetime(input, zone)
}

/// Parse a deactivation-time string. Only `""` and `"EOT"` resolve to
/// [`end_of_time`]; anything else, including `"NOW"`, must parse as a
/// `dd-mm-YYYY HH:MM:SS` datetime.
pub fn parse_deactivation_time(input: &str, zone: &chrono_tz::Tz) -> Result<DateTime<Utc>, TimeParseError> {
    if input.is_empty() || input.eq_ignore_ascii_case("EOT") {
        return Ok(end_of_time());
    }
    parse_datetime(input, zone)
}

fn parse_datetime(input: &str, zone: &chrono_tz::Tz) -> Result<DateTime<Utc>, TimeParseError> {
    let naive = NaiveDateTime::parse_from_str(input, DATETIME_FORMAT)
        .map_err(|_| TimeParseError { input: input.to_string() })?;
    zone.from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| TimeParseError { input: input.to_string() })
}

/// Monotonically increasing nanosecond-ish counter used to mint unique
/// [`crate::ids::OrderId`] values even when two orders arrive within the
/// same wall-clock nanosecond. Mirrors the source's reliance on
/// `time_since_epoch().count()` for uniqueness, with a tie-breaking bump so
/// two calls in the same process never collide.
pub fn next_id_timestamp(wall: &dyn WallClock) -> u64 {
    static LAST: AtomicU64 = AtomicU64::new(0);
    let now_nanos = wall.now().timestamp_nanos_opt().unwrap_or(0) as u64;
    let mut last = LAST.load(Ordering::Relaxed);
    loop {
        let candidate = if now_nanos > last { now_nanos } else { last + 1 };
        match LAST.compare_exchange_weak(last, candidate, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => return candidate,
            Err(observed) => last = observed,
        }
    }
}
