//! Shared test fixtures for the end-to-end order-flow scenarios.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use xchange::{Calendar, Exchange, ParticipantId, SimpleParticipant, SystemMonotonicClock, SystemWallClock};

/// A calendar double that is always open, so scenarios that state a flush
/// threshold can assert on a deterministic single flush instead of real
/// session-clock timing.
pub struct AlwaysOpenCalendar;

impl Calendar for AlwaysOpenCalendar {
    fn can_trade(&self, _now: DateTime<Utc>) -> bool {
        true
    }
    fn next_open(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now
    }
    fn next_close(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now + chrono::Duration::hours(8)
    }
}

/// Build an `Exchange` with the given pending-count threshold and an
/// always-open calendar, so flush timing in tests is deterministic.
pub fn make_exchange(pending_threshold: usize) -> Exchange {
    Exchange::new(
        pending_threshold,
        Duration::from_secs(1_000_000),
        Arc::new(AlwaysOpenCalendar),
        Arc::new(SystemWallClock),
        Arc::new(SystemMonotonicClock),
    )
}

pub fn register(exchange: &Exchange, gov_id: &str) -> ParticipantId {
    exchange.add_participant(gov_id, |pid| {
        Arc::new(SimpleParticipant::new(pid, Arc::new(SystemWallClock), chrono_tz::Asia::Kolkata))
    })
}
