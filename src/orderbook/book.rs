//! Two price-indexed collections of [`Level`]s and the matching algorithm.

use super::error::OrderBookError;
use super::trade::{OrderTraded, Trade};
use crate::ids::{OrderId, Price, Side, Symbol};
use crate::level::Level;
use crate::order::{Order, OrderType};
use crossbeam::atomic::AtomicCell;
use crossbeam_skiplist::SkipMap;
use std::cmp::Reverse;
use std::sync::{Arc, Mutex};
use tracing::{debug, trace};

/// Price-time-priority limit order book for a single symbol.
///
/// Bids are keyed by `Reverse<Price>` so the skip map's natural ascending
/// iteration yields descending price (best bid first); asks are keyed by
/// plain `Price` so ascending iteration yields the best (lowest) ask first —
/// mirroring `include/OrderBook.hpp`'s `std::map<Price, ..., std::greater<Price>>`
/// (bids) vs `std::map<Price, ..., std::less<Price>>` (asks).
pub struct OrderBook {
    pub symbol: Symbol,
    bids: SkipMap<Reverse<Price>, Arc<Level>>,
    asks: SkipMap<Price, Arc<Level>>,
    best_bid: AtomicCell<Option<Price>>,
    best_ask: AtomicCell<Option<Price>>,
    trades: Mutex<Vec<Trade>>,
}

impl OrderBook {
    #[must_use]
    pub fn new(symbol: Symbol) -> Self {
        OrderBook {
            symbol,
            bids: SkipMap::new(),
            asks: SkipMap::new(),
            best_bid: AtomicCell::new(None),
            best_ask: AtomicCell::new(None),
            trades: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn best_bid(&self) -> Option<Price> {
        self.best_bid.load()
    }

    #[must_use]
    pub fn best_ask(&self) -> Option<Price> {
        self.best_ask.load()
    }

    /// All trades emitted by this book so far, oldest first.
    #[must_use]
    pub fn trades(&self) -> Vec<Trade> {
        self.trades.lock().unwrap().clone()
    }

    #[must_use]
    pub fn level(&self, side: Side, price: Price) -> Option<Arc<Level>> {
        match side {
            Side::Buy => self.bids.get(&Reverse(price)).map(|e| Arc::clone(e.value())),
            Side::Sell => self.asks.get(&price).map(|e| Arc::clone(e.value())),
        }
    }

    /// Cumulative resting quantity opposite `side` that would be reachable by
    /// a limit order priced at `limit_price`: ask levels at or below
    /// `limit_price` for a buy, bid levels at or above `limit_price` for a
    /// sell.
    #[must_use]
    pub fn cumulative_opposing_quantity(&self, side: Side, limit_price: Price) -> crate::ids::Quantity {
        match side {
            Side::Buy => self
                .asks
                .iter()
                .take_while(|e| *e.key() <= limit_price)
                .map(|e| e.value().aggregate_quantity())
                .sum(),
            Side::Sell => self
                .bids
                .iter()
                .take_while(|e| e.key().0 >= limit_price)
                .map(|e| e.value().aggregate_quantity())
                .sum(),
        }
    }

    fn side_map_level(&self, side: Side, price: Price) -> Arc<Level> {
        match side {
            Side::Buy => {
                if let Some(e) = self.bids.get(&Reverse(price)) {
                    return Arc::clone(e.value());
                }
                let level = Arc::new(Level::new(self.symbol.clone(), price));
                self.bids.insert(Reverse(price), Arc::clone(&level));
                level
            }
            Side::Sell => {
                if let Some(e) = self.asks.get(&price) {
                    return Arc::clone(e.value());
                }
                let level = Arc::new(Level::new(self.symbol.clone(), price));
                self.asks.insert(price, Arc::clone(&level));
                level
            }
        }
    }

    fn refresh_best(&self) {
        self.best_bid.store(self.bids.iter().next().map(|e| e.key().0));
        self.best_ask.store(self.asks.iter().next().map(|e| *e.key()));
    }

    fn remove_level_if_empty(&self, side: Side, price: Price) {
        let empty = match side {
            Side::Buy => self.bids.get(&Reverse(price)).map(|e| e.value().is_empty()).unwrap_or(false),
            Side::Sell => self.asks.get(&price).map(|e| e.value().is_empty()).unwrap_or(false),
        };
        if empty {
            match side {
                Side::Buy => {
                    self.bids.remove(&Reverse(price));
                }
                Side::Sell => {
                    self.asks.remove(&price);
                }
            }
        }
    }

    /// Worst (last) standing price on the opposite side, used to rewrite a
    /// Market-family order's price at admission. `None` if that side is empty.
    fn worst_opposite_price(&self, side: Side) -> Option<Price> {
        match side {
            // aggressor is a buy -> opposite is asks -> worst ask is the highest (last of ascending map)
            Side::Buy => self.asks.iter().next_back().map(|e| *e.key()),
            // aggressor is a sell -> opposite is bids -> worst bid is the lowest (last of descending-key map)
            Side::Sell => self.bids.iter().next_back().map(|e| e.key().0),
        }
    }

    /// Admit `order` into the book, rewriting Market-family prices, then
    /// drain matches to a fixed point. Returns the last trade produced, if any
    /// — see `OrderBook::trades()` for the full list produced by this call.
    pub fn add(&self, mut order: Order) -> Result<Option<Trade>, OrderBookError> {
        if order.symbol != self.symbol {
            return Err(OrderBookError::SymbolMismatch {
                expected: self.symbol.clone(),
                got: order.symbol,
            });
        }
        if order.is_market_family() {
            if let Some(worst) = self.worst_opposite_price(order.side) {
                order.price = worst;
            }
            order.order_type = OrderType::GoodTillCancel;
        }
        trace!(symbol = %self.symbol, side = ?order.side, price = order.price, qty = order.remaining_quantity, "admitting order into book");
        let level = self.side_map_level(order.side, order.price);
        level.add(order);
        self.refresh_best();

        let mut last = None;
        while let Some(trade) = self.match_one() {
            last = Some(trade);
        }
        Ok(last)
    }

    /// Decode side and price from `order_id`, then cancel at that Level.
    /// `Err(UnknownOrder)` if no such order is resting; otherwise always
    /// `Ok(None)` — cancellations never trade.
    pub fn cancel(&self, order_id: OrderId) -> Result<Option<Trade>, OrderBookError> {
        let side = order_id.decode_side();
        let price = order_id.decode_price();
        let Some(level) = self.level(side, price) else {
            return Err(OrderBookError::UnknownOrder(order_id));
        };
        if level.get(order_id).is_none() {
            return Err(OrderBookError::UnknownOrder(order_id));
        }
        level.cancel(order_id);
        self.remove_level_if_empty(side, price);
        self.refresh_best();
        Ok(None)
    }

    /// `cancel(old_id); add(new_order)`. The cancel's result is discarded —
    /// a modify of an already-filled or never-admitted order still admits
    /// the replacement.
    pub fn modify(&self, old_id: OrderId, new_order: Order) -> Result<Option<Trade>, OrderBookError> {
        let _ = self.cancel(old_id);
        self.add(new_order)
    }

    /// One step of price-time-priority matching. `None` if the book is empty
    /// on either side or the best levels do not cross.
    pub fn match_one(&self) -> Option<Trade> {
        let (bid_price, bid_level) = {
            let e = self.bids.iter().next()?;
            (e.key().0, Arc::clone(e.value()))
        };
        let (ask_price, ask_level) = {
            let e = self.asks.iter().next()?;
            (*e.key(), Arc::clone(e.value()))
        };
        if bid_price < ask_price {
            return None;
        }

        let bid_order = bid_level.head_order()?;
        let ask_order = ask_level.head_order()?;
        let qty = bid_order.remaining_quantity.min(ask_order.remaining_quantity);
        let settlement_price = ask_price;

        bid_level.fill_front(qty);
        ask_level.fill_front(qty);

        self.remove_level_if_empty(Side::Buy, bid_price);
        self.remove_level_if_empty(Side::Sell, ask_price);
        self.refresh_best();

        let trade = Trade::new(
            self.symbol.clone(),
            OrderTraded {
                symbol: self.symbol.clone(),
                order_id: bid_order.id,
                price: settlement_price,
                quantity_filled: qty,
                participant_id: bid_order.participant_id,
            },
            OrderTraded {
                symbol: self.symbol.clone(),
                order_id: ask_order.id,
                price: settlement_price,
                quantity_filled: qty,
                participant_id: ask_order.participant_id,
            },
            chrono::Utc::now(),
        );
        debug!(symbol = %self.symbol, price = settlement_price, qty, "matched trade");
        self.trades.lock().unwrap().push(trade.clone());
        Some(trade)
    }
}
