//! Price-time priority matching.
//!
//! The match loop runs after every admission: while the best bid and best
//! ask cross, the two queue heads fill against each other for the smaller
//! remainder, one [`Trade`] per step. Fully filled heads leave the book
//! immediately; emptied levels drop their price row. Once the book uncrosses
//! the loop sweeps a fill-and-kill order left at the top of either side.
//!
//! Market repricing and the fill-or-kill feasibility walk live here too:
//! they are admission-time questions about the same structures the match
//! loop consumes.

use std::cmp::Reverse;

use tracing::debug;

use crate::orderbook::depth::DepthAction;
use crate::orderbook::{Book, PriceLevel};
use crate::types::{Order, OrderType, Side, Trade, TradeInfo};

impl Book {
    /// Match until the book uncrosses, then sweep top-of-book FAKs.
    pub(super) fn match_book(&mut self) -> Vec<Trade> {
        let mut trades = Vec::new();

        loop {
            let (Some(best_bid), Some(best_ask)) = (self.best_bid(), self.best_ask()) else {
                break;
            };
            if best_ask > best_bid {
                break;
            }
            let Some((bid_key, ask_key)) = self.best_heads() else {
                break;
            };
            trades.push(self.match_top(bid_key, ask_key));
        }

        self.sweep_faks();
        trades
    }

    /// Slab keys of the two queue heads at the best prices.
    fn best_heads(&self) -> Option<(usize, usize)> {
        let bid = self.bids.values().next()?.peek_head()?;
        let ask = self.asks.values().next()?.peek_head()?;
        Some((bid, ask))
    }

    /// Fill the two heads against each other for the smaller remainder.
    fn match_top(&mut self, bid_key: usize, ask_key: usize) -> Trade {
        let quantity = self.orders[bid_key]
            .remaining()
            .min(self.orders[ask_key].remaining());

        let bid = self.fill_leg(bid_key, quantity);
        let ask = self.fill_leg(ask_key, quantity);

        Trade { bid, ask }
    }

    /// Consume `quantity` from one head and update every structure that
    /// tracks it. Full fills leave the book; partial fills stay at the head
    /// with their level and depth figures reduced.
    fn fill_leg(&mut self, key: usize, quantity: u64) -> TradeInfo {
        self.orders[key].order.fill(quantity);
        let order = self.orders[key].order;

        let leg = TradeInfo {
            order_id: order.id,
            price: order.price,
            quantity,
        };

        if order.filled() {
            self.remove_resting(key);
            self.depth
                .apply(order.side, order.price, quantity, DepthAction::Remove);
        } else {
            if let Some(level) = self.level_mut(order.side, order.price) {
                level.reduce_quantity(quantity);
            }
            self.depth
                .apply(order.side, order.price, quantity, DepthAction::Match);
        }

        leg
    }

    fn level_mut(&mut self, side: Side, price: u64) -> Option<&mut PriceLevel> {
        match side {
            Side::Buy => self.bids.get_mut(&Reverse(price)),
            Side::Sell => self.asks.get_mut(&price),
            Side::Unknown => None,
        }
    }

    /// Cancel a fill-and-kill order sitting at the head of the best bid or
    /// best ask level. A FAK cannot wait for the other side to refill.
    pub(super) fn sweep_faks(&mut self) {
        if let Some(key) = self.bids.values().next().and_then(PriceLevel::peek_head) {
            let order = self.orders[key].order;
            if order.order_type == OrderType::Fak {
                debug!(id = order.id, "sweeping unfilled fill-and-kill bid");
                self.cancel(order.id);
            }
        }

        if let Some(key) = self.asks.values().next().and_then(PriceLevel::peek_head) {
            let order = self.orders[key].order;
            if order.order_type == OrderType::Fak {
                debug!(id = order.id, "sweeping unfilled fill-and-kill ask");
                self.cancel(order.id);
            }
        }
    }

    /// Reprice a market order to the worst price on the opposite side, which
    /// lets it sweep the entire opposite book without naming an infinite
    /// price. Returns `None` when the opposite side is empty.
    pub(super) fn reprice_market(&self, order: &Order) -> Option<Order> {
        let worst = match order.side {
            Side::Buy => self.asks.keys().next_back().copied(),
            Side::Sell => self.bids.keys().next_back().map(|price| price.0),
            Side::Unknown => None,
        }?;

        debug!(
            id = order.id,
            price = worst,
            "market order repriced to worst opposite level"
        );
        Some(Order {
            order_type: OrderType::Gtc,
            price: worst,
            ..*order
        })
    }

    /// True if at least one opposite price is marketable for a limit at
    /// `price`.
    pub fn can_match(&self, side: Side, price: u64) -> bool {
        match side {
            Side::Buy => self.best_ask().is_some_and(|ask| ask <= price),
            Side::Sell => self.best_bid().is_some_and(|bid| bid >= price),
            Side::Unknown => false,
        }
    }

    /// True if a `quantity` at `price` could be filled in full right now.
    ///
    /// Walks the opposite side's aggregated depth best-first, so the cost is
    /// proportional to the number of price levels touched, not the number of
    /// resting orders.
    pub fn can_fully_fill(&self, side: Side, price: u64, quantity: u64) -> bool {
        if !self.can_match(side, price) {
            return false;
        }
        if quantity == 0 {
            return true;
        }

        let mut outstanding = quantity;
        match side {
            Side::Buy => {
                for (ask_price, entry) in self.depth.asks_best_first() {
                    if ask_price > price {
                        return false;
                    }
                    if entry.quantity >= outstanding {
                        return true;
                    }
                    outstanding -= entry.quantity;
                }
            }
            Side::Sell => {
                for (bid_price, entry) in self.depth.bids_best_first() {
                    if bid_price < price {
                        return false;
                    }
                    if entry.quantity >= outstanding {
                        return true;
                    }
                    outstanding -= entry.quantity;
                }
            }
            Side::Unknown => {}
        }

        false
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
