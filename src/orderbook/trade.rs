//! Matched-pair trade records.

use crate::ids::{OrderId, ParticipantId, Price, Quantity, Symbol};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One side of a [`Trade`]: the order that was (partially) filled, and how much.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTraded {
    pub symbol: Symbol,
    pub order_id: OrderId,
    pub price: Price,
    pub quantity_filled: Quantity,
    pub participant_id: ParticipantId,
}

/// A single match between a resting bid and a resting ask.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    pub trade_id: Uuid,
    pub symbol: Symbol,
    pub matched_bid: OrderTraded,
    pub matched_ask: OrderTraded,
    pub match_ts: DateTime<Utc>,
}

impl Trade {
    #[must_use]
    pub fn new(symbol: Symbol, matched_bid: OrderTraded, matched_ask: OrderTraded, match_ts: DateTime<Utc>) -> Self {
        Trade {
            trade_id: Uuid::new_v4(),
            symbol,
            matched_bid,
            matched_ask,
            match_ts,
        }
    }

    /// Settlement price: by construction, the passive (ask) side's price.
    #[must_use]
    pub fn settlement_price(&self) -> Price {
        self.matched_ask.price
    }

    #[must_use]
    pub fn quantity(&self) -> Quantity {
        self.matched_bid.quantity_filled
    }

    /// Convenience serialization used by test fixtures.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
