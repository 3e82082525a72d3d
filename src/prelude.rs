//! Prelude module that re-exports commonly used types and traits.
//!
//! This module provides a convenient way to import the most commonly used
//! types, traits, and functions from the xchange crate. Instead of
//! importing each type individually, you can use:
//!
//! ```rust
//! use xchange::prelude::*;
//! ```

// Domain ids and aliases
pub use crate::ids::{OrderId, ParticipantId, Price, Quantity, Side, Symbol};

// Order types
pub use crate::order::{Order, OrderStatus, OrderType};

// Price level
pub use crate::level::Level;

// Order book
pub use crate::orderbook::{OrderBook, OrderBookError, OrderTraded, Trade};

// Pre-processor
pub use crate::preprocessor::{Action, FlushThresholds, OrderActionInfo, PreProcessor, PreProcessorError};

// Calendar
pub use crate::calendar::{Calendar, DefaultCalendar};

// Participant
pub use crate::participant::{Participant, SimpleParticipant};

// Exchange coordinator
pub use crate::exchange::{Exchange, ExchangeError, RequestAction};

// Clocks and time parsing
pub use crate::utils::{MonotonicClock, SystemMonotonicClock, SystemWallClock, TimeParseError, WallClock};
