//! Order type ranks, status, and the resting-order descriptor.

use crate::ids::{OrderId, ParticipantId, Price, Quantity, Side, Symbol};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Order type, priority-ranked for the pre-processor (0 = highest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderType {
    Market,
    FillOrKill,
    ImmediateOrCancel,
    GoodAfterTime,
    GoodForDay,
    GoodTillDate,
    AllOrNone,
    GoodTillCancel,
    MarketOnOpen,
    MarketOnClose,
}

impl OrderType {
    /// Priority rank used for type-bucket ordering, 0 = highest priority.
    #[must_use]
    pub fn rank(self) -> u8 {
        match self {
            OrderType::Market => 0,
            OrderType::FillOrKill => 1,
            OrderType::ImmediateOrCancel => 2,
            OrderType::GoodAfterTime => 3,
            OrderType::GoodForDay => 4,
            OrderType::GoodTillDate => 5,
            OrderType::AllOrNone => 6,
            OrderType::GoodTillCancel => 7,
            OrderType::MarketOnOpen => 8,
            OrderType::MarketOnClose => 9,
        }
    }

    /// `true` for the three types admitted only by the pre-processor's
    /// session-boundary rewrite path (`Market`, `MarketOnOpen`, `MarketOnClose`).
    #[must_use]
    pub fn is_market_family(self) -> bool {
        matches!(self, OrderType::Market | OrderType::MarketOnOpen | OrderType::MarketOnClose)
    }

    /// Number of distinct ranks, i.e. the number of type buckets a
    /// [`crate::preprocessor::PreProcessor`] maintains.
    pub const RANK_COUNT: usize = 10;
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Lifecycle status of an [`Order`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Held by the pre-processor, not yet admitted into a book.
    Staged,
    /// Resting in a [`crate::level::Level`].
    Resting,
    /// Removed by cancellation, before or after reaching the book.
    Cancelled,
    /// Fully matched; no remaining quantity.
    Filled,
}

/// A single order request, owned by the pre-processor while staged and by
/// the book's [`crate::level::Level`] once admitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub symbol: Symbol,
    pub order_type: OrderType,
    pub side: Side,
    pub price: Price,
    pub remaining_quantity: Quantity,
    pub participant_id: ParticipantId,
    pub creation_ts: DateTime<Utc>,
    pub activation_ts: DateTime<Utc>,
    pub deactivation_ts: DateTime<Utc>,
    pub status: OrderStatus,
}

impl Order {
    /// Construct a new order, minting its [`OrderId`] from the minting
    /// timestamp, price and side per the packed-identifier contract.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id_timestamp: u64,
        symbol: Symbol,
        order_type: OrderType,
        side: Side,
        price: Price,
        quantity: Quantity,
        participant_id: ParticipantId,
        creation_ts: DateTime<Utc>,
        activation_ts: DateTime<Utc>,
        deactivation_ts: DateTime<Utc>,
    ) -> Self {
        let id = OrderId::encode(id_timestamp, price, side);
        Order {
            id,
            symbol,
            order_type,
            side,
            price,
            remaining_quantity: quantity,
            participant_id,
            creation_ts,
            activation_ts,
            deactivation_ts,
            status: OrderStatus::Staged,
        }
    }

    #[must_use]
    pub fn is_market_family(&self) -> bool {
        self.order_type.is_market_family()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample(order_type: OrderType) -> Order {
        let now = Utc::now();
        Order::new(
            1,
            "SPY".to_string(),
            order_type,
            Side::Buy,
            10_000,
            100,
            ParticipantId::new(1, "GOV"),
            now,
            now,
            now,
        )
    }

    #[test]
    fn rank_order_matches_source_table() {
        assert_eq!(OrderType::Market.rank(), 0);
        assert_eq!(OrderType::FillOrKill.rank(), 1);
        assert_eq!(OrderType::ImmediateOrCancel.rank(), 2);
        assert_eq!(OrderType::GoodAfterTime.rank(), 3);
        assert_eq!(OrderType::GoodForDay.rank(), 4);
        assert_eq!(OrderType::GoodTillDate.rank(), 5);
        assert_eq!(OrderType::AllOrNone.rank(), 6);
        assert_eq!(OrderType::GoodTillCancel.rank(), 7);
        assert_eq!(OrderType::MarketOnOpen.rank(), 8);
        assert_eq!(OrderType::MarketOnClose.rank(), 9);
    }

    #[test]
    fn market_family_classification() {
        assert!(sample(OrderType::Market).is_market_family());
        assert!(sample(OrderType::MarketOnOpen).is_market_family());
        assert!(sample(OrderType::MarketOnClose).is_market_family());
        assert!(!sample(OrderType::GoodTillCancel).is_market_family());
    }

    #[test]
    fn new_order_starts_staged() {
        let order = sample(OrderType::GoodTillCancel);
        assert_eq!(order.status, OrderStatus::Staged);
        assert_eq!(order.id.decode_side(), Side::Buy);
        assert_eq!(order.id.decode_price(), 10_000);
    }
}
