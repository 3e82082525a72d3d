//! Core value types: price, quantity, symbol, participant and order identity.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed-point price, decimal price multiplied by 100.
///
/// Stored as a signed 32-bit integer per the wire contract of [`OrderId`],
/// which packs an unsigned 31-bit price into its middle bits.
pub type Price = i32;

/// Order quantity, always non-negative.
pub type Quantity = u64;

/// Trading symbol. Kept as an owned `String` rather than a fixed-size buffer
/// since the engine's symbol registry is small and short-lived per process.
pub type Symbol = String;

/// Side of an order or a price level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// `true` for `Buy`, mirroring the single bit packed into an [`OrderId`].
    #[must_use]
    pub fn is_buy(self) -> bool {
        matches!(self, Side::Buy)
    }

    #[must_use]
    pub fn opposite(self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "Buy"),
            Side::Sell => write!(f, "Sell"),
        }
    }
}

/// Participant identity, formed as `"<ordinal>_<govID>"` at first registration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParticipantId(pub String);

impl ParticipantId {
    #[must_use]
    pub fn new(ordinal: u64, gov_id: &str) -> Self {
        ParticipantId(format!("{ordinal}_{gov_id}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 64-bit packed order identifier, minted once at order creation.
///
/// Bit layout:
///
/// ```text
/// bit 63..32  creation timestamp, low 32 bits of a nanosecond counter
/// bit 31..1   price * 100, interpreted as an unsigned 31-bit integer
/// bit 0       1 if buy, 0 if sell
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OrderId(pub u64);

const PRICE_MASK: u64 = (1u64 << 31) - 1;

impl OrderId {
    /// Encode a fresh order identifier from its minting timestamp, price and side.
    ///
    /// `timestamp_nanos` is truncated to its low 32 bits, same as the source's
    /// `static_cast<OrderID>(timestamp)` on a `uint64_t` shifted into place.
    #[must_use]
    pub fn encode(timestamp_nanos: u64, price: Price, side: Side) -> OrderId {
        let mut id: u64 = 0;
        id |= timestamp_nanos << 32;
        id |= ((price as u32 as u64) & PRICE_MASK) << 1;
        id |= side.is_buy() as u64;
        OrderId(id)
    }

    #[must_use]
    pub fn decode_side(self) -> Side {
        if self.0 & 0x1 == 1 {
            Side::Buy
        } else {
            Side::Sell
        }
    }

    #[must_use]
    pub fn decode_price(self) -> Price {
        (((self.0 >> 1) & PRICE_MASK) as u32) as Price
    }

    #[must_use]
    pub fn decode_timestamp(self) -> u32 {
        (self.0 >> 32) as u32
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}
