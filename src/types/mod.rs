//! Core value types for the order book.
//!
//! ## Types
//!
//! - [`Order`]: an order handed to the book (id, type, side, price, remainder)
//! - [`Side`] / [`OrderType`]: enums with stable integer wire codes
//! - [`Change`]: replacement terms for a modify
//! - [`Trade`] / [`TradeInfo`]: a two-leg execution record
//!
//! All prices are integer tick counts and all quantities are integers; the
//! engine never touches floating point. [`price`] holds the decimal ↔ tick
//! conversion helpers for the edges.

mod order;
mod trade;
pub mod price;

pub use order::{Change, Order, OrderType, Side};
pub use trade::{Trade, TradeInfo};
