//! Per-price FIFO queue of resting orders with O(1) cancel-by-id.
//!
//! Uses a `DashMap` index paired with a `Mutex<VecDeque>` FIFO of ids rather
//! than a lock-free queue, since [`Level::head`] must be able to peek the
//! front id without popping it.

use crate::ids::{OrderId, Price, Quantity, Symbol};
use crate::order::Order;
use dashmap::DashMap;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// A single price bucket: a time-ordered queue of resting orders plus an
/// O(1) id index.
#[derive(Debug)]
pub struct Level {
    pub symbol: Symbol,
    pub price: Price,
    index: DashMap<OrderId, Order>,
    fifo: Mutex<VecDeque<OrderId>>,
    aggregate: AtomicU64,
}

impl Level {
    #[must_use]
    pub fn new(symbol: Symbol, price: Price) -> Self {
        Level {
            symbol,
            price,
            index: DashMap::new(),
            fifo: Mutex::new(VecDeque::new()),
            aggregate: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub fn aggregate_quantity(&self) -> Quantity {
        self.aggregate.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.aggregate_quantity() == 0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Append `order` to the FIFO tail. Idempotent no-op if its id is already present.
    ///
    /// Precondition (asserted, programmer error otherwise): `order.price == self.price`
    /// and `order.symbol == self.symbol`.
    pub fn add(&self, order: Order) {
        assert_eq!(order.price, self.price, "Level::add: price mismatch");
        assert_eq!(order.symbol, self.symbol, "Level::add: symbol mismatch");
        if self.index.contains_key(&order.id) {
            return;
        }
        let id = order.id;
        let qty = order.remaining_quantity;
        self.index.insert(id, order);
        self.fifo.lock().unwrap().push_back(id);
        self.aggregate.fetch_add(qty, Ordering::AcqRel);
    }

    /// Remove an order by id. Silent no-op if unknown (already cancelled or
    /// never present).
    pub fn cancel(&self, order_id: OrderId) {
        if let Some((_, order)) = self.index.remove(&order_id) {
            self.aggregate.fetch_sub(order.remaining_quantity, Ordering::AcqRel);
            // Tombstone left in the FIFO; discarded lazily by `head`/`fill_front`.
        }
    }

    /// `cancel(old_id); add(new_order)`. Not atomic w.r.t. position: the new
    /// order always lands at the FIFO tail, losing time priority.
    pub fn modify(&self, old_id: OrderId, new_order: Order) {
        self.cancel(old_id);
        self.add(new_order);
    }

    /// Drop tombstones (ids no longer in the index) from the front of the FIFO.
    fn evict_tombstones(&self) {
        let mut fifo = self.fifo.lock().unwrap();
        while let Some(front) = fifo.front() {
            if self.index.contains_key(front) {
                break;
            }
            fifo.pop_front();
        }
    }

    /// Peek the id of the earliest resting order, if any.
    #[must_use]
    pub fn head(&self) -> Option<OrderId> {
        self.evict_tombstones();
        self.fifo.lock().unwrap().front().copied()
    }

    /// Snapshot the earliest resting order's current state.
    #[must_use]
    pub fn head_order(&self) -> Option<Order> {
        let id = self.head()?;
        self.index.get(&id).map(|r| r.value().clone())
    }

    /// Reduce the head order's remaining quantity by `quantity`; remove it if
    /// it reaches zero. Caller must ensure `quantity <= head.remaining`.
    pub fn fill_front(&self, quantity: Quantity) {
        let Some(id) = self.head() else { return };
        let remove = {
            let mut entry = self.index.get_mut(&id).expect("head id must be indexed");
            assert!(
                quantity <= entry.remaining_quantity,
                "Level::fill_front: quantity exceeds head's remaining"
            );
            entry.remaining_quantity -= quantity;
            entry.remaining_quantity == 0
        };
        self.aggregate.fetch_sub(quantity, Ordering::AcqRel);
        if remove {
            self.index.remove(&id);
            self.fifo.lock().unwrap().pop_front();
        }
    }

    /// Lookup an order by id without disturbing FIFO order.
    #[must_use]
    pub fn get(&self, order_id: OrderId) -> Option<Order> {
        self.index.get(&order_id).map(|r| r.value().clone())
    }

    #[cfg(test)]
    fn assert_invariants(&self) {
        let sum: Quantity = self.index.iter().map(|r| r.value().remaining_quantity).sum();
        assert_eq!(sum, self.aggregate_quantity());
        for r in self.index.iter() {
            assert_eq!(r.value().price, self.price);
            assert_eq!(r.value().symbol, self.symbol);
        }
    }
}
