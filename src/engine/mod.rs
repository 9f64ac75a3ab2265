//! Thread-safe order book engine with the good-for-day pruner.
//!
//! ## Concurrency Model
//!
//! One coarse mutex serializes every public operation and the pruner's
//! mutations; all book invariants cross structures and belong to a single
//! critical section, so there is no fine-grained locking to get wrong.
//! Operations are linearizable on that mutex and each call returns exactly
//! the trades it produced.
//!
//! The pruner thread is started at construction and joined on drop. It
//! waits on a dedicated shutdown mutex/condvar pair and never holds the
//! book lock while sleeping.
//!
//! ## Example
//!
//! ```
//! use lobcore::{OrderBook, Order, OrderType, Side};
//!
//! let book = OrderBook::new();
//! book.add(Order::new(1, OrderType::Gtc, Side::Buy, 100, 10)).unwrap();
//! let trades = book.add(Order::new(2, OrderType::Gtc, Side::Sell, 100, 10)).unwrap();
//!
//! assert_eq!(trades.len(), 1);
//! assert_eq!(book.order_count(), 0);
//! ```

mod pruner;

use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};

use crate::orderbook::{Book, DepthEntry, OrderBookError};
use crate::types::{Change, Order, Side, Trade};

/// Hour of day (local time) at which good-for-day orders are pruned.
pub const PRUNE_HOUR: u32 = 16;

/// State shared between the API handle and the pruner thread.
pub(crate) struct Shared {
    pub(crate) book: Mutex<Book>,
    pub(crate) shutdown: Mutex<bool>,
    pub(crate) shutdown_signal: Condvar,
    pub(crate) prune_hour: u32,
}

impl Shared {
    /// Lock the book. A panic while the lock is held leaves the invariants
    /// unrestorable, so a poisoned lock is fatal.
    pub(crate) fn lock_book(&self) -> MutexGuard<'_, Book> {
        self.book.lock().expect("order book mutex poisoned")
    }
}

/// Synchronized limit order book for one symbol.
///
/// Construction starts the pruner thread; dropping the handle signals it
/// and joins. Clone-free by design: share it behind an [`Arc`] if multiple
/// threads submit orders.
pub struct OrderBook {
    shared: Arc<Shared>,
    pruner: Option<JoinHandle<()>>,
}

impl Default for OrderBook {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderBook {
    /// Create a book pruning good-for-day orders at [`PRUNE_HOUR`].
    pub fn new() -> Self {
        Self::with_prune_hour(PRUNE_HOUR)
    }

    /// Create a book with a custom daily prune hour (clamped to 0..=23,
    /// local time).
    pub fn with_prune_hour(prune_hour: u32) -> Self {
        let shared = Arc::new(Shared {
            book: Mutex::new(Book::new()),
            shutdown: Mutex::new(false),
            shutdown_signal: Condvar::new(),
            prune_hour: prune_hour.min(23),
        });

        let worker = Arc::clone(&shared);
        let pruner = thread::spawn(move || pruner::run(&worker));

        Self {
            shared,
            pruner: Some(pruner),
        }
    }

    // ========================================================================
    // Public operations
    // ========================================================================

    /// Admit an order and return the trades produced by this call.
    ///
    /// See [`Book::add`] for the admission gates and type policies.
    pub fn add(&self, order: Order) -> Result<Vec<Trade>, OrderBookError> {
        self.shared.lock_book().add(order)
    }

    /// Cancel one order. Unknown ids are a silent no-op.
    pub fn cancel(&self, order_id: u64) {
        self.shared.lock_book().cancel(order_id);
    }

    /// Cancel a batch of orders under a single lock acquisition.
    pub fn cancel_many(&self, order_ids: &[u64]) {
        self.shared.lock_book().cancel_many(order_ids);
    }

    /// Replace an order's side, price and remainder, losing queue priority.
    ///
    /// See [`Book::modify`].
    pub fn modify(&self, order_id: u64, change: Change) -> Result<Vec<Trade>, OrderBookError> {
        self.shared.lock_book().modify(order_id, change)
    }

    /// Cancel every resting good-for-day order now, without waiting for the
    /// scheduled prune moment. Returns how many were cancelled.
    ///
    /// This is the same pass the pruner thread runs daily.
    pub fn prune_gfd(&self) -> usize {
        pruner::prune_cycle(&self.shared)
    }

    // ========================================================================
    // Read access
    // ========================================================================

    /// Highest resting bid price.
    pub fn best_bid(&self) -> Option<u64> {
        self.shared.lock_book().best_bid()
    }

    /// Lowest resting ask price.
    pub fn best_ask(&self) -> Option<u64> {
        self.shared.lock_book().best_ask()
    }

    /// Best ask minus best bid; `None` unless both sides are populated.
    pub fn spread(&self) -> Option<u64> {
        self.shared.lock_book().spread()
    }

    /// Number of resting orders across both sides.
    pub fn order_count(&self) -> usize {
        self.shared.lock_book().order_count()
    }

    /// True if an order with `order_id` rests on the book.
    pub fn contains_order(&self, order_id: u64) -> bool {
        self.shared.lock_book().contains_order(order_id)
    }

    /// A copy of the resting order with `order_id`, if any.
    pub fn get_order(&self, order_id: u64) -> Option<Order> {
        self.shared.lock_book().get_order(order_id).copied()
    }

    /// Ids resting at `(side, price)` in queue order, head first.
    pub fn orders_at(&self, side: Side, price: u64) -> Vec<u64> {
        self.shared.lock_book().orders_at(side, price)
    }

    /// The aggregated depth row at `(side, price)`.
    pub fn depth_at(&self, side: Side, price: u64) -> Option<DepthEntry> {
        self.shared.lock_book().depth_at(side, price)
    }
}

impl Drop for OrderBook {
    fn drop(&mut self) {
        if let Ok(mut stop) = self.shared.shutdown.lock() {
            *stop = true;
        }
        self.shared.shutdown_signal.notify_all();

        if let Some(pruner) = self.pruner.take() {
            let _ = pruner.join();
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
