//! The external bookkeeping entity that mints orders and records fills.
//!
//! Treated as an external collaborator: the core only needs to mint an
//! `Order` for an Add/Modify request and to be told when a cancel is routed.

use crate::ids::{OrderId, ParticipantId, Price, Quantity, Side, Symbol};
use crate::order::{Order, OrderType};
use crate::utils::{parse_activation_time, parse_deactivation_time, TimeParseError, WallClock};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// External collaborator that mints orders on a participant's behalf and
/// records the results of non-cancel and cancel requests.
pub trait Participant: Send + Sync {
    fn participant_id(&self) -> &ParticipantId;

    /// Mint a fresh [`Order`] for an Add or Modify request. Returns a
    /// [`TimeParseError`] if `activation`/`deactivation` cannot be parsed.
    #[allow(clippy::too_many_arguments)]
    fn record_non_cancel_order(
        &self,
        symbol: Symbol,
        order_type: OrderType,
        side: Side,
        price: Price,
        quantity: Quantity,
        activation: &str,
        deactivation: &str,
    ) -> Result<Order, TimeParseError>;

    /// Record that a cancel request for `order_id` was routed.
    fn record_cancel_order(&self, order_id: OrderId);
}

/// Reference [`Participant`] implementation: mints orders with a monotone id
/// timestamp and tracks its own instance-owned counter of processed requests
/// rather than a process-wide one.
pub struct SimpleParticipant {
    id: ParticipantId,
    wall_clock: Arc<dyn WallClock>,
    zone: chrono_tz::Tz,
    last_processed_trade_index: AtomicU64,
}

impl SimpleParticipant {
    #[must_use]
    pub fn new(id: ParticipantId, wall_clock: Arc<dyn WallClock>, zone: chrono_tz::Tz) -> Self {
        SimpleParticipant {
            id,
            wall_clock,
            zone,
            last_processed_trade_index: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub fn last_processed_trade_index(&self) -> u64 {
        self.last_processed_trade_index.load(Ordering::Acquire)
    }

    pub fn advance_processed_trade_index(&self, index: u64) {
        self.last_processed_trade_index.fetch_max(index, Ordering::AcqRel);
    }
}

impl Participant for SimpleParticipant {
    fn participant_id(&self) -> &ParticipantId {
        &self.id
    }

    fn record_non_cancel_order(
        &self,
        symbol: Symbol,
        order_type: OrderType,
        side: Side,
        price: Price,
        quantity: Quantity,
        activation: &str,
        deactivation: &str,
    ) -> Result<Order, TimeParseError> {
        let now = self.wall_clock.now();
        let activation_ts = parse_activation_time(activation, now, &self.zone)?;
        let deactivation_ts = parse_deactivation_time(deactivation, &self.zone)?;
        let id_timestamp = crate::utils::next_id_timestamp(self.wall_clock.as_ref());
        Ok(Order::new(
            id_timestamp,
            symbol,
            order_type,
            side,
            price,
            quantity,
            self.id.clone(),
            now,
            activation_ts,
            deactivation_ts,
        ))
    }

    fn record_cancel_order(&self, _order_id: OrderId) {}
}
