//! # lobcore
//!
//! A price-time priority limit order book engine. One book instance covers
//! one symbol; callers submit orders through a synchronous in-process API
//! and serialize their own side effects on the returned trade list.
//!
//! ## Key Features
//!
//! - **Price-time priority matching**: best price first, FIFO within a
//!   price level, one two-leg [`Trade`] per matching step.
//!
//! - **Order-type policies**: good-till-cancel, fill-and-kill (IOC),
//!   fill-or-kill, good-for-day, and market orders repriced to the worst
//!   opposite level at admission.
//!
//! - **O(1) cancel**: resting orders live in a slab; the id directory maps
//!   straight to a stable slot that unlinks from its level queue in place.
//!
//! - **Aggregated depth**: per-side price → (count, quantity) rows keep
//!   fill-or-kill feasibility at O(price levels), never O(orders).
//!
//! - **GFD pruning daemon**: a background thread cancels good-for-day
//!   orders at a configurable local wall-clock hour, sharing the one book
//!   mutex with the API.
//!
//! ## Design Principles
//!
//! 1. **Integer arithmetic**: prices are tick counts, quantities are plain
//!    integers; no floating point anywhere in the engine.
//! 2. **One critical section**: every invariant spans the directory, both
//!    side indexes and the depth rows, so a single coarse mutex guards them
//!    all — correctness over micro-concurrency.
//! 3. **Self-contained trades**: a [`Trade`] carries both legs by id and
//!    price, so the return path never references book internals.
//!
//! ## Example
//!
//! ```
//! use lobcore::{OrderBook, Order, OrderType, Side};
//!
//! let book = OrderBook::new();
//!
//! // A resting bid, then a crossing ask.
//! book.add(Order::new(1, OrderType::Gtc, Side::Buy, 100, 10)).unwrap();
//! let trades = book.add(Order::new(2, OrderType::Gtc, Side::Sell, 100, 4)).unwrap();
//!
//! assert_eq!(trades.len(), 1);
//! assert_eq!(trades[0].quantity(), 4);
//! assert_eq!(book.get_order(1).unwrap().remainder, 6);
//! ```
//!
//! The single-threaded core is also available directly as [`Book`] for
//! embedding without the mutex and pruner thread.

pub mod engine;
pub mod orderbook;
pub mod types;

pub use engine::{OrderBook, PRUNE_HOUR};
pub use orderbook::{Book, DepthEntry, OrderBookError};
pub use types::{Change, Order, OrderType, Side, Trade, TradeInfo};
