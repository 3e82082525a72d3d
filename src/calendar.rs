//! Session clock: the injected oracle that tells the engine whether the
//! market is open, and when it next opens or closes.

use chrono::{DateTime, Datelike, Duration, NaiveTime, Timelike, Utc, Weekday};
use std::collections::HashMap;
use std::fmt;

/// Oracle for market-open state and session boundaries.
pub trait Calendar: Send + Sync {
    /// `false` on weekends, listed holidays, and outside `[open, close)`.
    fn can_trade(&self, now: DateTime<Utc>) -> bool;

    /// Next session open at or after `now`, skipping weekends and holidays.
    fn next_open(&self, now: DateTime<Utc>) -> DateTime<Utc>;

    /// Next session close at or after `now`, skipping weekends and holidays.
    fn next_close(&self, now: DateTime<Utc>) -> DateTime<Utc>;
}

/// A single `(day, month, year)` holiday entry.
pub type Holiday = (u32, u32, i32);

/// Reference holiday list: a venue-neutral set of fixed dates, applied
/// uniformly across every configured zone.
pub const HOLIDAYS: &[Holiday] = &[
    (1, 1, 2025),
    (26, 1, 2025),
    (14, 3, 2025),
    (18, 4, 2025),
    (1, 5, 2025),
    (7, 6, 2025),
    (15, 8, 2025),
    (2, 10, 2025),
    (21, 10, 2025),
    (5, 11, 2025),
    (25, 12, 2025),
];

fn is_holiday(now: DateTime<Utc>) -> bool {
    let (d, m, y) = (now.day(), now.month(), now.year());
    HOLIDAYS.iter().any(|&(hd, hm, hy)| hd == d && hm == m && hy == y)
}

fn is_weekend(now: DateTime<Utc>) -> bool {
    matches!(now.weekday(), Weekday::Sat | Weekday::Sun)
}

/// One row of the reference session table: GMT open/close instants expressed
/// as a duration-from-midnight.
#[derive(Debug, Clone, Copy)]
pub struct SessionWindow {
    pub open_gmt: NaiveTime,
    pub close_gmt: NaiveTime,
}

/// Error returned when a zone name is not present in the session table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownZoneError(pub String);

impl fmt::Display for UnknownZoneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown exchange time zone: {}", self.0)
    }
}

impl std::error::Error for UnknownZoneError {}

fn session_table() -> HashMap<&'static str, SessionWindow> {
    let win = |oh, om, ch, cm| SessionWindow {
        open_gmt: NaiveTime::from_hms_opt(oh, om, 0).unwrap(),
        close_gmt: NaiveTime::from_hms_opt(ch, cm, 0).unwrap(),
    };
    HashMap::from([
        ("Australia/Sydney", win(23, 0, 5, 0)),
        ("Asia/Kolkata", win(3, 45, 10, 0)),
        ("America/Sao_Paulo", win(13, 0, 20, 0)),
        ("Europe/Paris", win(7, 0, 15, 30)),
        ("Europe/Berlin", win(7, 0, 15, 30)),
        ("Asia/Hong_Kong", win(1, 30, 8, 0)),
        ("Africa/Johannesburg", win(7, 0, 15, 0)),
        ("Asia/Seoul", win(0, 0, 6, 30)),
        ("Europe/London", win(8, 0, 16, 30)),
        ("America/New_York", win(14, 30, 21, 0)),
        ("Asia/Shanghai", win(1, 30, 7, 0)),
        ("Europe/Zurich", win(7, 0, 15, 30)),
        ("Asia/Tokyo", win(0, 0, 6, 0)),
        ("America/Toronto", win(14, 30, 21, 0)),
    ])
}

/// Default [`Calendar`] implementation: one fixed GMT session window per
/// configured IANA zone, plus the shared holiday list.
pub struct DefaultCalendar {
    zone_name: String,
    window: SessionWindow,
}

impl DefaultCalendar {
    /// Build a calendar for one of the reference zones in the session table.
    pub fn new(zone_name: &str) -> Result<Self, UnknownZoneError> {
        let table = session_table();
        let window = *table
            .get(zone_name)
            .ok_or_else(|| UnknownZoneError(zone_name.to_string()))?;
        Ok(DefaultCalendar {
            zone_name: zone_name.to_string(),
            window,
        })
    }

    #[must_use]
    pub fn zone_name(&self) -> &str {
        &self.zone_name
    }

    fn today_open(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.date_naive().and_time(self.window.open_gmt).and_utc()
    }

    fn today_close(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.date_naive().and_time(self.window.close_gmt).and_utc()
    }

    fn is_trading_day(&self, now: DateTime<Utc>) -> bool {
        !is_weekend(now) && !is_holiday(now)
    }

    fn advance_to_trading_day(&self, mut t: DateTime<Utc>) -> DateTime<Utc> {
        while !self.is_trading_day(t) {
            t += Duration::days(1);
        }
        t
    }

    fn next_boundary(&self, now: DateTime<Utc>, close: bool) -> DateTime<Utc> {
        let boundary_today = if close { self.today_close(now) } else { self.today_open(now) };
        let candidate = if self.is_trading_day(now) && boundary_today >= now {
            boundary_today
        } else {
            let mut next_day = now.date_naive().succ_opt().unwrap().and_hms_opt(0, 0, 0).unwrap().and_utc();
            next_day = self.advance_to_trading_day(next_day);
            if close {
                next_day.date_naive().and_time(self.window.close_gmt).and_utc()
            } else {
                next_day.date_naive().and_time(self.window.open_gmt).and_utc()
            }
        };
        candidate
    }
}

impl Calendar for DefaultCalendar {
    fn can_trade(&self, now: DateTime<Utc>) -> bool {
        if !self.is_trading_day(now) {
            return false;
        }
        let tod = now.time();
        let (open, close) = (self.window.open_gmt, self.window.close_gmt);
        if open <= close {
            tod >= open && tod < close
        } else {
            // session wraps past midnight GMT
            tod >= open || tod < close
        }
    }

    fn next_open(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.next_boundary(now, false)
    }

    fn next_close(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.next_boundary(now, true)
    }
}
