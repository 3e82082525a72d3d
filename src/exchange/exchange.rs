//! Symbol and participant registries, and the unified request dispatcher.
//!
//! Participant id minting, symbol lifecycle, and the unified order-request
//! dispatch.

use super::error::ExchangeError;
use crate::calendar::Calendar;
use crate::ids::{OrderId, ParticipantId, Price, Quantity, Side, Symbol};
use crate::order::OrderType;
use crate::orderbook::OrderBook;
use crate::participant::Participant;
use crate::preprocessor::{FlushThresholds, PreProcessor};
use crate::utils::{MonotonicClock, WallClock};
use dashmap::DashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::info;

/// Action requested of [`Exchange::place_order`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestAction {
    Add,
    Cancel,
    Modify,
}

struct SymbolTriple {
    book: Arc<OrderBook>,
    bid_pre: Mutex<PreProcessor>,
    ask_pre: Mutex<PreProcessor>,
}

/// Per-process coordinator owning the participant and symbol registries and
/// routing requests between them. A single instance is meant to be created
/// at startup and passed through.
pub struct Exchange {
    gov_ids: DashMap<String, ParticipantId>,
    participants: DashMap<ParticipantId, Arc<dyn Participant>>,
    symbols: DashMap<Symbol, SymbolTriple>,
    calendar: Arc<dyn Calendar>,
    wall_clock: Arc<dyn WallClock>,
    monotonic_clock: Arc<dyn MonotonicClock>,
    thresholds: FlushThresholds,
}

impl Exchange {
    #[must_use]
    pub fn new(
        pending_threshold: usize,
        pending_duration: Duration,
        calendar: Arc<dyn Calendar>,
        wall_clock: Arc<dyn WallClock>,
        monotonic_clock: Arc<dyn MonotonicClock>,
    ) -> Self {
        Exchange {
            gov_ids: DashMap::new(),
            participants: DashMap::new(),
            symbols: DashMap::new(),
            calendar,
            wall_clock,
            monotonic_clock,
            thresholds: FlushThresholds { max_pending: pending_threshold, max_pending_duration: pending_duration },
        }
    }

    /// Register `gov_id`, minting a fresh [`ParticipantId`] of the form
    /// `"<ordinal>_<govID>"`. Re-adding an already-registered `gov_id` returns
    /// its existing id.
    pub fn add_participant(&self, gov_id: &str, factory: impl FnOnce(ParticipantId) -> Arc<dyn Participant>) -> ParticipantId {
        if let Some(existing) = self.gov_ids.get(gov_id) {
            return existing.clone();
        }
        let ordinal = self.participants.len() as u64;
        let pid = ParticipantId::new(ordinal, gov_id);
        self.gov_ids.insert(gov_id.to_string(), pid.clone());
        self.participants.insert(pid.clone(), factory(pid.clone()));
        info!(participant = %pid, "participant registered");
        pid
    }

    pub fn remove_participant(&self, participant_id: &ParticipantId) {
        self.participants.remove(participant_id);
        let gov_id = participant_id.as_str().splitn(2, '_').nth(1).unwrap_or_default().to_string();
        self.gov_ids.remove(&gov_id);
    }

    /// Construct a symbol's `{OrderBook, bidPreProcessor, askPreProcessor}`
    /// triple. No-op if the symbol is already traded.
    pub fn trade_new_symbol(&self, symbol: &str) {
        if self.symbols.contains_key(symbol) {
            return;
        }
        let book = Arc::new(OrderBook::new(symbol.to_string()));
        let bid_pre = PreProcessor::new(
            Side::Buy,
            Arc::clone(&book),
            Arc::clone(&self.calendar),
            Arc::clone(&self.wall_clock),
            Arc::clone(&self.monotonic_clock),
            self.thresholds,
        );
        let ask_pre = PreProcessor::new(
            Side::Sell,
            Arc::clone(&book),
            Arc::clone(&self.calendar),
            Arc::clone(&self.wall_clock),
            Arc::clone(&self.monotonic_clock),
            self.thresholds,
        );
        self.symbols.insert(
            symbol.to_string(),
            SymbolTriple { book, bid_pre: Mutex::new(bid_pre), ask_pre: Mutex::new(ask_pre) },
        );
        info!(symbol, "symbol now traded");
    }

    /// Drop a symbol's triple. Outstanding staged and resting orders are
    /// lost — this is the documented, lossy behavior of `retireOldSymbol`.
    pub fn retire_old_symbol(&self, symbol: &str) {
        self.symbols.remove(symbol);
        info!(symbol, "symbol retired");
    }

    #[must_use]
    pub fn get_order_book(&self, symbol: &str) -> Option<Arc<OrderBook>> {
        self.symbols.get(symbol).map(|t| Arc::clone(&t.book))
    }

    /// Unified order-request dispatch. Missing-field and unknown-identity
    /// conditions return `Ok(None)` with no side effects; an illegal modify
    /// or a malformed time string surface as `Err`.
    #[allow(clippy::too_many_arguments)]
    pub fn place_order(
        &self,
        participant_id: &ParticipantId,
        action: RequestAction,
        old_id: Option<OrderId>,
        symbol: Option<&str>,
        side: Option<Side>,
        order_type: Option<OrderType>,
        price: Option<Price>,
        quantity: Option<Quantity>,
        activation: Option<&str>,
        deactivation: Option<&str>,
    ) -> Result<Option<OrderId>, ExchangeError> {
        let Some(participant) = self.participants.get(participant_id) else {
            return Ok(None);
        };
        let Some(symbol) = symbol else {
            return Ok(None);
        };
        if symbol.is_empty() {
            return Err(ExchangeError::InvalidRequest("symbol must not be empty".to_string()));
        }
        let Some(order_type) = order_type else {
            return Ok(None);
        };
        let Some(triple) = self.symbols.get(symbol) else {
            return Ok(None);
        };

        if matches!(action, RequestAction::Cancel | RequestAction::Modify) {
            let Some(old_id) = old_id else {
                return Ok(None);
            };
            let decoded_side = old_id.decode_side();
            if let Some(requested_side) = side {
                if requested_side != decoded_side {
                    return Err(ExchangeError::IllegalModify);
                }
            }
            if action == RequestAction::Modify {
                self.check_modify_invariant(&triple, old_id, decoded_side, symbol, order_type)?;
            } else {
                self.route_cancel(&triple, decoded_side, old_id, order_type);
                return Ok(Some(old_id));
            }
            // fallthrough: Modify continues below to mint and route the replacement order
        }

        let (Some(side), Some(price), Some(quantity)) = (side, price, quantity) else {
            return Ok(None);
        };
        let activation = activation.unwrap_or("");
        let deactivation = deactivation.unwrap_or("");
        let order = participant.record_non_cancel_order(
            symbol.to_string(),
            order_type,
            side,
            price,
            quantity,
            activation,
            deactivation,
        )?;
        let new_id = order.id;

        if action == RequestAction::Modify {
            let old_id = old_id.expect("validated above");
            self.route_modify(&triple, side, old_id, order);
        } else {
            self.route_add(&triple, side, order);
        }
        Ok(Some(new_id))
    }

    fn check_modify_invariant(
        &self,
        triple: &SymbolTriple,
        old_id: OrderId,
        side: Side,
        symbol: &str,
        order_type: OrderType,
    ) -> Result<(), ExchangeError> {
        let pre = match side {
            Side::Buy => &triple.bid_pre,
            Side::Sell => &triple.ask_pre,
        };
        if let Some(staged) = pre.lock().unwrap().staged_order(old_id) {
            if staged.symbol != symbol || staged.order_type != order_type {
                return Err(ExchangeError::IllegalModify);
            }
            return Ok(());
        }
        if let Some(level) = triple.book.level(side, old_id.decode_price()) {
            if let Some(resting) = level.get(old_id) {
                if resting.symbol != symbol || resting.order_type != order_type {
                    return Err(ExchangeError::IllegalModify);
                }
            }
        }
        Ok(())
    }

    fn route_add(&self, triple: &SymbolTriple, side: Side, order: crate::order::Order) {
        let pre = match side {
            Side::Buy => &triple.bid_pre,
            Side::Sell => &triple.ask_pre,
        };
        let _ = pre.lock().unwrap().submit_add(order);
    }

    fn route_cancel(&self, triple: &SymbolTriple, side: Side, order_id: OrderId, order_type: OrderType) {
        let pre = match side {
            Side::Buy => &triple.bid_pre,
            Side::Sell => &triple.ask_pre,
        };
        pre.lock().unwrap().submit_cancel(order_id, order_type);
    }

    fn route_modify(&self, triple: &SymbolTriple, side: Side, old_id: OrderId, new_order: crate::order::Order) {
        let pre = match side {
            Side::Buy => &triple.bid_pre,
            Side::Sell => &triple.ask_pre,
        };
        let _ = pre.lock().unwrap().submit_modify(old_id, new_order);
    }
}
