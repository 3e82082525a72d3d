//! Staged request descriptor and its priority ordering.

use crate::ids::{OrderId, Price, Side};
use crate::order::OrderType;
use std::cmp::Ordering;

/// What a staged [`OrderActionInfo`] does when flushed: admit a new order, or
/// cancel one already admitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Add,
    Cancel,
}

/// One staged request: an order id, its type (for bucket routing) and the
/// action to apply at flush time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderActionInfo {
    pub order_id: OrderId,
    pub order_type: OrderType,
    pub action: Action,
}

impl OrderActionInfo {
    #[must_use]
    pub fn new(order_id: OrderId, order_type: OrderType, action: Action) -> Self {
        OrderActionInfo { order_id, order_type, action }
    }

    fn side(&self) -> Side {
        self.order_id.decode_side()
    }

    fn price(&self) -> Price {
        self.order_id.decode_price()
    }

    fn timestamp(&self) -> u32 {
        self.order_id.decode_timestamp()
    }
}

/// Price–time priority within one type bucket: buys sort by descending
/// price, sells by ascending price; ties break by ascending timestamp, and a
/// final tie-break on the raw id keeps every distinct order a distinct key
/// (the source's `std::multiset` tolerates equivalent keys; a `BTreeSet`
/// requires a strict total order).
impl Ord for OrderActionInfo {
    fn cmp(&self, other: &Self) -> Ordering {
        let price_order = match self.side() {
            Side::Buy => other.price().cmp(&self.price()),
            Side::Sell => self.price().cmp(&other.price()),
        };
        price_order
            .then_with(|| self.timestamp().cmp(&other.timestamp()))
            .then_with(|| self.order_id.cmp(&other.order_id))
    }
}

impl PartialOrd for OrderActionInfo {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
