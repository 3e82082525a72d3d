//! PreProcessor flush triggered by the pending-count threshold.
//!
//! Four Adds are submitted across two symbols' bid pre-processors with
//! thresholds `(3, 1e9 ms)`; only the side that actually reaches the count
//! threshold flushes. Within that flush, priority-eligible (GoodTillCancel)
//! orders are emitted while a currently-unmatchable AllOrNone stays staged.

use std::sync::Arc;
use std::time::Duration;
use xchange::{Calendar, FlushThresholds, Order, OrderBook, OrderType, ParticipantId, PreProcessor, Side, SystemMonotonicClock, SystemWallClock};

struct AlwaysOpenCalendar;
impl Calendar for AlwaysOpenCalendar {
    fn can_trade(&self, _now: chrono::DateTime<chrono::Utc>) -> bool {
        true
    }
    fn next_open(&self, now: chrono::DateTime<chrono::Utc>) -> chrono::DateTime<chrono::Utc> {
        now
    }
    fn next_close(&self, now: chrono::DateTime<chrono::Utc>) -> chrono::DateTime<chrono::Utc> {
        now + chrono::Duration::hours(8)
    }
}

fn make_pp(symbol: &str, max_pending: usize) -> PreProcessor {
    let book = Arc::new(OrderBook::new(symbol.to_string()));
    PreProcessor::new(
        Side::Buy,
        book,
        Arc::new(AlwaysOpenCalendar),
        Arc::new(SystemWallClock),
        Arc::new(SystemMonotonicClock),
        FlushThresholds { max_pending, max_pending_duration: Duration::from_secs(1_000_000_000) },
    )
}

fn order(ts: u64, symbol: &str, price: i32, qty: u64, order_type: OrderType) -> Order {
    let now = chrono::Utc::now();
    Order::new(ts, symbol.to_string(), order_type, Side::Buy, price, qty, ParticipantId::new(1, "P1"), now, now, now)
}

#[test]
fn fourth_submit_flushes_only_the_side_that_hit_threshold() {
    let mut spy = make_pp("SPY", 3);
    let mut qqq = make_pp("QQQ", 3);

    spy.submit_add(order(1, "SPY", 10_000, 10, OrderType::GoodTillCancel)).unwrap(); // spy: 1
    qqq.submit_add(order(2, "QQQ", 10_000, 10, OrderType::GoodTillCancel)).unwrap(); // qqq: 1
    spy.submit_add(order(3, "SPY", 10_000, 10, OrderType::GoodTillCancel)).unwrap(); // spy: 2
    spy.submit_add(order(4, "SPY", 10_000, 10, OrderType::AllOrNone)).unwrap(); // spy: 3 -> flush

    // the two GoodTillCancel orders were priority-eligible and emitted; the
    // unmatchable AllOrNone remains staged
    assert_eq!(spy.staged_count(), 1);
    assert_eq!(qqq.staged_count(), 1);
}
