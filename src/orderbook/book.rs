//! The unsynchronized order book core.
//!
//! ## Structure
//!
//! - **Slab**: owns every resting [`OrderNode`]; slab keys are the stable
//!   handles that make cancel O(1)
//! - **Side indexes**: `BTreeMap` of price → [`PriceLevel`], bids keyed by
//!   `Reverse(price)` so both sides iterate best-first
//! - **Directory**: order id → slab key
//! - **Aggregated depth**: per-side price → (count, quantity), kept in
//!   lockstep with the queues
//!
//! All four structures mutate together inside each operation; [`Book`] has
//! no interior locking. The thread-safe façade with the GFD pruner lives in
//! [`crate::engine::OrderBook`].

use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};

use slab::Slab;
use tracing::{debug, trace};

use crate::orderbook::depth::{AggregatedDepth, DepthAction, DepthEntry};
use crate::orderbook::{OrderBookError, OrderNode, PriceLevel};
use crate::types::{Change, Order, OrderType, Side, Trade};

/// Price-time priority limit order book for one symbol.
///
/// ## Example
///
/// ```
/// use lobcore::{Book, Order, OrderType, Side};
///
/// let mut book = Book::new();
/// book.add(Order::new(1, OrderType::Gtc, Side::Buy, 100, 10)).unwrap();
/// let trades = book.add(Order::new(2, OrderType::Gtc, Side::Sell, 100, 10)).unwrap();
///
/// assert_eq!(trades.len(), 1);
/// assert!(book.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct Book {
    /// Storage for every resting order.
    pub(super) orders: Slab<OrderNode>,

    /// Bid levels, highest price first.
    pub(super) bids: BTreeMap<Reverse<u64>, PriceLevel>,

    /// Ask levels, lowest price first.
    pub(super) asks: BTreeMap<u64, PriceLevel>,

    /// Order id → slab key.
    pub(super) order_index: HashMap<u64, usize>,

    /// Per-side price → (count, quantity) rows.
    pub(super) depth: AggregatedDepth,
}

impl Default for Book {
    fn default() -> Self {
        Self::new()
    }
}

impl Book {
    /// Create an empty book.
    pub fn new() -> Self {
        Self {
            orders: Slab::new(),
            bids: BTreeMap::new(),
            asks: BTreeMap::new(),
            order_index: HashMap::new(),
            depth: AggregatedDepth::new(),
        }
    }

    /// Create a book with slots for `order_capacity` resting orders.
    pub fn with_capacity(order_capacity: usize) -> Self {
        Self {
            orders: Slab::with_capacity(order_capacity),
            bids: BTreeMap::new(),
            asks: BTreeMap::new(),
            order_index: HashMap::with_capacity(order_capacity),
            depth: AggregatedDepth::new(),
        }
    }

    // ========================================================================
    // Public operations
    // ========================================================================

    /// Admit an order, matching it against the opposite side.
    ///
    /// Returns the trades produced by this call. Duplicate ids are silently
    /// ignored (idempotent retry contract), zero-quantity orders are
    /// silently dropped, and an order whose side is `Unknown` is rejected
    /// with the book unchanged.
    ///
    /// Type gating before the order rests:
    /// - `Mar` is repriced to the worst price on the opposite side and
    ///   becomes `Gtc`; if the opposite side is empty the order is dropped.
    /// - `Fak` is dropped unless some opposite price is marketable.
    /// - `Fok` is dropped unless it can be filled in full.
    pub fn add(&mut self, order: Order) -> Result<Vec<Trade>, OrderBookError> {
        if self.order_index.contains_key(&order.id) {
            trace!(id = order.id, "duplicate order id ignored");
            return Ok(Vec::new());
        }

        if order.side == Side::Unknown {
            return Err(OrderBookError::InvalidOrder { id: order.id });
        }

        if order.remainder == 0 {
            trace!(id = order.id, "zero-quantity order dropped");
            return Ok(Vec::new());
        }

        let order = if order.order_type == OrderType::Mar {
            match self.reprice_market(&order) {
                Some(repriced) => repriced,
                None => {
                    debug!(id = order.id, "market order dropped: opposite side empty");
                    return Ok(Vec::new());
                }
            }
        } else {
            order
        };

        if order.order_type == OrderType::Fak && !self.can_match(order.side, order.price) {
            trace!(id = order.id, "fill-and-kill not marketable, dropped");
            return Ok(Vec::new());
        }

        if order.order_type == OrderType::Fok
            && !self.can_fully_fill(order.side, order.price, order.remainder)
        {
            trace!(id = order.id, "fill-or-kill not fully fillable, dropped");
            return Ok(Vec::new());
        }

        self.insert_resting(order);
        Ok(self.match_book())
    }

    /// Cancel the order with `order_id`. Unknown ids are a silent no-op.
    pub fn cancel(&mut self, order_id: u64) {
        let Some(&key) = self.order_index.get(&order_id) else {
            return;
        };

        let order = self.remove_resting(key);
        self.depth
            .apply(order.side, order.price, order.remainder, DepthAction::Remove);
        trace!(id = order_id, "order cancelled");
    }

    /// Cancel a batch of orders.
    pub fn cancel_many(&mut self, order_ids: &[u64]) {
        for &id in order_ids {
            self.cancel(id);
        }
    }

    /// Replace the order with `order_id` by a new order with the same id and
    /// type and the change's side, price and remainder.
    ///
    /// The replacement re-enters at the tail of its level: queue priority is
    /// lost. Unknown ids are a silent no-op, whatever the change says. A
    /// change with an `Unknown` side is rejected before anything is
    /// cancelled, leaving the original order resting.
    pub fn modify(&mut self, order_id: u64, change: Change) -> Result<Vec<Trade>, OrderBookError> {
        let Some(&key) = self.order_index.get(&order_id) else {
            return Ok(Vec::new());
        };

        if change.side == Side::Unknown {
            return Err(OrderBookError::InvalidOrder { id: order_id });
        }

        let order_type = self.orders[key].order.order_type;

        self.cancel(order_id);
        trace!(id = order_id, "order modified, re-entering at tail");
        self.add(Order {
            id: order_id,
            order_type,
            side: change.side,
            price: change.price,
            remainder: change.remainder,
        })
    }

    /// Ids of all resting good-for-day orders, for the daily prune.
    pub fn gfd_order_ids(&self) -> Vec<u64> {
        self.orders
            .iter()
            .filter(|(_, node)| node.order.order_type == OrderType::Gfd)
            .map(|(_, node)| node.order.id)
            .collect()
    }

    // ========================================================================
    // Read access
    // ========================================================================

    /// Highest resting bid price.
    #[inline]
    pub fn best_bid(&self) -> Option<u64> {
        self.bids.keys().next().map(|price| price.0)
    }

    /// Lowest resting ask price.
    #[inline]
    pub fn best_ask(&self) -> Option<u64> {
        self.asks.keys().next().copied()
    }

    /// Best ask minus best bid; `None` unless both sides are populated.
    pub fn spread(&self) -> Option<u64> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some(ask.saturating_sub(bid)),
            _ => None,
        }
    }

    /// Number of resting orders across both sides.
    #[inline]
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    /// True when nothing rests on either side.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// True if an order with `order_id` rests on the book.
    #[inline]
    pub fn contains_order(&self, order_id: u64) -> bool {
        self.order_index.contains_key(&order_id)
    }

    /// The resting order with `order_id`, if any.
    pub fn get_order(&self, order_id: u64) -> Option<&Order> {
        let key = *self.order_index.get(&order_id)?;
        self.orders.get(key).map(|node| &node.order)
    }

    /// Ids of every resting order, in no particular order.
    pub fn order_ids(&self) -> Vec<u64> {
        self.orders.iter().map(|(_, node)| node.order.id).collect()
    }

    /// Ids resting at `(side, price)` in queue order, head first.
    pub fn orders_at(&self, side: Side, price: u64) -> Vec<u64> {
        let level = match side {
            Side::Buy => self.bids.get(&Reverse(price)),
            Side::Sell => self.asks.get(&price),
            Side::Unknown => None,
        };
        let Some(level) = level else {
            return Vec::new();
        };
        level
            .iter_keys(&self.orders)
            .map(|key| self.orders[key].order.id)
            .collect()
    }

    /// Per-level `(price, order count, total quantity)` figures computed
    /// from the live queues, best price first.
    pub fn levels(&self, side: Side) -> Vec<(u64, usize, u64)> {
        match side {
            Side::Buy => self
                .bids
                .values()
                .map(|level| (level.price, level.order_count, level.total_quantity))
                .collect(),
            Side::Sell => self
                .asks
                .values()
                .map(|level| (level.price, level.order_count, level.total_quantity))
                .collect(),
            Side::Unknown => Vec::new(),
        }
    }

    /// Number of price levels on one side.
    pub fn level_count(&self, side: Side) -> usize {
        match side {
            Side::Buy => self.bids.len(),
            Side::Sell => self.asks.len(),
            Side::Unknown => 0,
        }
    }

    /// The aggregated depth row at `(side, price)`.
    pub fn depth_at(&self, side: Side, price: u64) -> Option<DepthEntry> {
        self.depth.entry(side, price)
    }

    /// Aggregated `(price, row)` pairs for one side, best price first.
    pub fn depth(&self, side: Side) -> Vec<(u64, DepthEntry)> {
        match side {
            Side::Buy => self.depth.bids_best_first().collect(),
            Side::Sell => self.depth.asks_best_first().collect(),
            Side::Unknown => Vec::new(),
        }
    }

    // ========================================================================
    // Queue plumbing
    // ========================================================================

    /// Append `order` at the tail of its level and register it in the
    /// directory and the aggregated depth.
    pub(super) fn insert_resting(&mut self, order: Order) {
        let (id, side, price, remainder) = (order.id, order.side, order.price, order.remainder);

        let key = self.orders.insert(OrderNode::new(order));
        self.order_index.insert(id, key);

        match side {
            Side::Buy => {
                let level = self
                    .bids
                    .entry(Reverse(price))
                    .or_insert_with(|| PriceLevel::new(price));
                level.push_back(key, &mut self.orders);
            }
            Side::Sell => {
                let level = self
                    .asks
                    .entry(price)
                    .or_insert_with(|| PriceLevel::new(price));
                level.push_back(key, &mut self.orders);
            }
            Side::Unknown => {}
        }

        self.depth.apply(side, price, remainder, DepthAction::Add);
        trace!(id, side = ?side, price, remainder, "order resting");
    }

    /// Unlink the node at `key` from its level, drop the level row if it
    /// emptied, and erase the node from the slab and the directory.
    ///
    /// The aggregated depth is deliberately untouched: cancels remove the
    /// remainder while full fills remove only the final fill quantity, so
    /// each caller applies its own depth action.
    pub(super) fn remove_resting(&mut self, key: usize) -> Order {
        let order = self.orders[key].order;
        let price = order.price;

        match order.side {
            Side::Buy => {
                if let Some(level) = self.bids.get_mut(&Reverse(price)) {
                    level.remove(key, &mut self.orders);
                    if level.is_empty() {
                        self.bids.remove(&Reverse(price));
                    }
                }
            }
            Side::Sell => {
                if let Some(level) = self.asks.get_mut(&price) {
                    level.remove(key, &mut self.orders);
                    if level.is_empty() {
                        self.asks.remove(&price);
                    }
                }
            }
            Side::Unknown => {}
        }

        self.orders.remove(key);
        self.order_index.remove(&order.id);
        order
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
