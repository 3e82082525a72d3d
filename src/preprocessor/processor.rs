//! Type-ranked staging area: admission gating, flush policy, and
//! post-flush reconciliation with the book.

use super::error::PreProcessorError;
use super::types::{Action, OrderActionInfo};
use crate::calendar::Calendar;
use crate::ids::{OrderId, Side};
use crate::order::{Order, OrderType};
use crate::orderbook::OrderBook;
use crate::utils::{MonotonicClock, WallClock};
use chrono::Timelike;
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{trace, warn};

/// Configurable staging thresholds: a flush fires once either is exceeded.
#[derive(Debug, Clone, Copy)]
pub struct FlushThresholds {
    pub max_pending: usize,
    pub max_pending_duration: Duration,
}

/// One side (bid or ask) of a symbol's staging area.
///
/// Two instances exist per symbol, sharing the same [`OrderBook`]. This type
/// performs no internal locking of its own; a host that shares it across
/// threads must serialize access externally (the [`crate::exchange::Exchange`]
/// does this with a `Mutex` per instance).
pub struct PreProcessor {
    side: Side,
    book: Arc<OrderBook>,
    calendar: Arc<dyn Calendar>,
    wall_clock: Arc<dyn WallClock>,
    monotonic_clock: Arc<dyn MonotonicClock>,
    thresholds: FlushThresholds,
    buckets: Vec<BTreeSet<OrderActionInfo>>,
    encountered: HashSet<OrderId>,
    staged: HashMap<OrderId, OrderActionInfo>,
    orders: HashMap<OrderId, Order>,
    wait_queue: VecDeque<OrderActionInfo>,
    last_flush: Instant,
}

impl PreProcessor {
    #[must_use]
    pub fn new(
        side: Side,
        book: Arc<OrderBook>,
        calendar: Arc<dyn Calendar>,
        wall_clock: Arc<dyn WallClock>,
        monotonic_clock: Arc<dyn MonotonicClock>,
        thresholds: FlushThresholds,
    ) -> Self {
        let last_flush = monotonic_clock.now();
        PreProcessor {
            side,
            book,
            calendar,
            wall_clock,
            monotonic_clock,
            thresholds,
            buckets: (0..OrderType::RANK_COUNT).map(|_| BTreeSet::new()).collect(),
            encountered: HashSet::new(),
            staged: HashMap::new(),
            orders: HashMap::new(),
            wait_queue: VecDeque::new(),
            last_flush,
        }
    }

    #[must_use]
    pub fn side(&self) -> Side {
        self.side
    }

    /// Total staged count across every type bucket.
    #[must_use]
    pub fn staged_count(&self) -> usize {
        self.buckets.iter().map(BTreeSet::len).sum()
    }

    #[must_use]
    pub fn has_encountered(&self, order_id: OrderId) -> bool {
        self.encountered.contains(&order_id)
    }

    #[must_use]
    pub fn staged_order(&self, order_id: OrderId) -> Option<&Order> {
        self.orders.get(&order_id)
    }

    fn insert_into_preprocessing(&mut self, info: OrderActionInfo) {
        let rank = info.order_type.rank() as usize;
        self.buckets[rank].insert(info);
        self.encountered.insert(info.order_id);
        self.staged.insert(info.order_id, info);
        self.try_flush();
    }

    /// Stage a new order for admission. If its type is `GoodForDay` and the
    /// market is closed, drop it silently; if `GoodForDay`, its deactivation
    /// is (re)set to the next session close.
    pub fn submit_add(&mut self, mut order: Order) -> Result<(), PreProcessorError> {
        if order.side != self.side {
            return Err(PreProcessorError::SideMismatch);
        }
        if self.orders.contains_key(&order.id) {
            return Ok(());
        }
        if order.order_type == OrderType::GoodForDay {
            let now = self.wall_clock.now();
            if !self.calendar.can_trade(now) {
                warn!(order_id = %order.id, "dropping GoodForDay order: market closed at submission");
                return Ok(());
            }
            order.deactivation_ts = self.calendar.next_close(now);
        }
        let id = order.id;
        let order_type = order.order_type;
        trace!(order_id = %id, ?order_type, "staging add");
        self.orders.insert(id, order);
        self.insert_into_preprocessing(OrderActionInfo::new(id, order_type, Action::Add));
        Ok(())
    }

    /// Stage a cancellation. If the target is still staged, it is removed on
    /// the spot; if it has already reached the book, a `Cancel` action is
    /// staged for the next flush. Unknown ids are a silent no-op.
    pub fn submit_cancel(&mut self, order_id: OrderId, order_type: OrderType) {
        if !self.encountered.contains(&order_id) {
            return;
        }
        if !self.staged.contains_key(&order_id) {
            self.insert_into_preprocessing(OrderActionInfo::new(order_id, order_type, Action::Cancel));
            return;
        }
        self.remove_from_preprocessing(order_id, order_type);
        self.try_flush();
    }

    /// `submit_cancel(old_id, new_order.order_type); submit_add(new_order)`.
    /// The caller (the Exchange) is responsible for enforcing that
    /// `{symbol, side, type}` are unchanged across a modify.
    pub fn submit_modify(&mut self, old_id: OrderId, new_order: Order) -> Result<(), PreProcessorError> {
        self.submit_cancel(old_id, new_order.order_type);
        self.submit_add(new_order)
    }

    /// Remove a staged id from its bucket, `staged`, and `orders`.
    /// `encountered` is retained so it is never re-processed.
    fn remove_from_preprocessing(&mut self, order_id: OrderId, order_type: OrderType) {
        let rank = order_type.rank() as usize;
        if let Some(info) = self.staged.remove(&order_id) {
            self.buckets[rank].remove(&info);
        }
        self.orders.remove(&order_id);
    }

    /// Flush staged actions into the book if either threshold is exceeded.
    pub fn try_flush(&mut self) {
        let total: usize = self.staged_count();
        let elapsed = self.monotonic_clock.now().saturating_duration_since(self.last_flush);
        if total < self.thresholds.max_pending && elapsed < self.thresholds.max_pending_duration {
            return;
        }
        self.queue_orders_into_wait_queue();
        self.empty_wait_queue();
        self.last_flush = self.monotonic_clock.now();
    }

    fn queue_orders_into_wait_queue(&mut self) {
        for rank in 0..OrderType::RANK_COUNT - 2 {
            self.empty_type_ranked_orders(rank);
        }
        let now = self.wall_clock.now();
        let now_minute = now.date_naive().and_hms_opt(now.time().hour(), now.time().minute(), 0).unwrap();
        let next_close_minute = {
            let t = self.calendar.next_close(now);
            t.date_naive().and_hms_opt(t.time().hour(), t.time().minute(), 0).unwrap()
        };
        let next_open_minute = {
            let t = self.calendar.next_open(now);
            t.date_naive().and_hms_opt(t.time().hour(), t.time().minute(), 0).unwrap()
        };
        if now_minute == next_close_minute {
            self.empty_type_ranked_orders(OrderType::MarketOnClose.rank() as usize);
        }
        if now_minute == next_open_minute {
            self.empty_type_ranked_orders(OrderType::MarketOnOpen.rank() as usize);
        }
    }

    fn empty_type_ranked_orders(&mut self, rank: usize) {
        if self.buckets[rank].is_empty() {
            return;
        }
        let snapshot: Vec<OrderActionInfo> = self.buckets[rank].iter().copied().collect();
        for info in snapshot {
            if !self.buckets[rank].contains(&info) {
                // removed by a side effect of can_match_order on an earlier entry
                continue;
            }
            if info.action == Action::Add && !self.can_match_order(info.order_id) {
                continue;
            }
            self.wait_queue.push_back(info);
            self.buckets[rank].remove(&info);
            self.staged.remove(&info.order_id);
        }
    }

    /// Admission gate for a staged `Add`. May mutate or drop the staged
    /// order as a side effect (ImmediateOrCancel rewrite; GoodForDay /
    /// GoodTillDate / FillOrKill expiry removal).
    fn can_match_order(&mut self, order_id: OrderId) -> bool {
        let Some(order) = self.orders.get(&order_id) else { return false };
        let order_type = order.order_type;
        let side = order.side;
        let price = order.price;
        let remaining = order.remaining_quantity;

        match order_type {
            OrderType::Market | OrderType::GoodTillCancel | OrderType::MarketOnOpen | OrderType::MarketOnClose => true,
            OrderType::GoodAfterTime => self.wall_clock.now() >= order.activation_ts,
            OrderType::GoodForDay | OrderType::GoodTillDate => {
                if self.wall_clock.now() < order.deactivation_ts {
                    true
                } else {
                    self.remove_from_preprocessing(order_id, order_type);
                    false
                }
            }
            OrderType::FillOrKill | OrderType::AllOrNone => {
                let avail = self.book.cumulative_opposing_quantity(side, price);
                if avail >= remaining {
                    true
                } else {
                    if order_type == OrderType::FillOrKill {
                        self.remove_from_preprocessing(order_id, order_type);
                    }
                    false
                }
            }
            OrderType::ImmediateOrCancel => {
                let avail = self.book.cumulative_opposing_quantity(side, price);
                let final_qty = avail.min(remaining);
                if let Some(order) = self.orders.get_mut(&order_id) {
                    order.remaining_quantity = final_qty;
                }
                true
            }
        }
    }

    fn empty_wait_queue(&mut self) {
        if !self.calendar.can_trade(self.wall_clock.now()) {
            return;
        }
        while let Some(info) = self.wait_queue.pop_front() {
            match info.action {
                Action::Add => {
                    if let Some(order) = self.orders.get(&info.order_id).cloned() {
                        let _ = self.book.add(order);
                    }
                }
                Action::Cancel => {
                    let _ = self.book.cancel(info.order_id);
                }
            }
        }
        self.clear_seen_orders_when_matched();
    }

    /// Walk the trade stream in reverse; for any matched order this side
    /// owns whose remaining quantity has reached zero, drop its `orders`
    /// entry (`encountered` is retained).
    fn clear_seen_orders_when_matched(&mut self) {
        let trades = self.book.trades();
        for trade in trades.iter().rev() {
            let owned_id = match self.side {
                Side::Buy => trade.matched_bid.order_id,
                Side::Sell => trade.matched_ask.order_id,
            };
            if let Some(order) = self.orders.get(&owned_id) {
                if order.remaining_quantity == 0 {
                    self.orders.remove(&owned_id);
                }
            }
        }
    }
}
