//! Order, side and order-type definitions.
//!
//! ## Wire Codes
//!
//! Both enums carry stable integer codes so gateways can round-trip them
//! without renegotiation:
//!
//! - `Side`: UNKNOWN=0, BUY=1, SELL=2
//! - `OrderType`: UNKNOWN=0, GTC=1, FAK=2, FOK=3, GFD=4, MAR=5
//!
//! ## Integer Prices and Quantities
//!
//! Prices are non-negative tick counts, quantities are positive integers.
//! No floating point anywhere in the engine.

use serde::{Deserialize, Serialize};

// ============================================================================
// Side enum
// ============================================================================

/// Order side.
///
/// `Unknown` exists for wire compatibility; admitting an order with an
/// unknown side is an [`InvalidOrder`](crate::OrderBookError::InvalidOrder)
/// error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Side {
    /// Side not set (wire code 0). Never rests on the book.
    #[default]
    Unknown,
    /// Buy order (bid) — wants to purchase.
    Buy,
    /// Sell order (ask) — wants to sell.
    Sell,
}

impl Side {
    /// Convert to the stable wire code.
    pub fn to_u8(self) -> u8 {
        match self {
            Side::Unknown => 0,
            Side::Buy => 1,
            Side::Sell => 2,
        }
    }

    /// Convert from a wire code.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Side::Unknown),
            1 => Some(Side::Buy),
            2 => Some(Side::Sell),
            _ => None,
        }
    }

    /// Returns the opposite side. `Unknown` has no opposite.
    pub fn opposite(self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
            Side::Unknown => Side::Unknown,
        }
    }
}

// ============================================================================
// OrderType enum
// ============================================================================

/// Order time-in-force / admission policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OrderType {
    /// Type not set (wire code 0).
    #[default]
    Unknown,
    /// Good-Till-Cancel: rests until filled or cancelled.
    Gtc,
    /// Fill-And-Kill (IOC): match what is possible now, never rest.
    Fak,
    /// Fill-Or-Kill: fully fill on admission or drop entirely.
    Fok,
    /// Good-For-Day: cancelled at the daily prune moment.
    Gfd,
    /// Market: repriced at admission to the opposite side's worst resting
    /// price, then treated as GTC.
    Mar,
}

impl OrderType {
    /// Convert to the stable wire code.
    pub fn to_u8(self) -> u8 {
        match self {
            OrderType::Unknown => 0,
            OrderType::Gtc => 1,
            OrderType::Fak => 2,
            OrderType::Fok => 3,
            OrderType::Gfd => 4,
            OrderType::Mar => 5,
        }
    }

    /// Convert from a wire code.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(OrderType::Unknown),
            1 => Some(OrderType::Gtc),
            2 => Some(OrderType::Fak),
            3 => Some(OrderType::Fok),
            4 => Some(OrderType::Gfd),
            5 => Some(OrderType::Mar),
            _ => None,
        }
    }
}

// ============================================================================
// Order struct
// ============================================================================

/// An order handed to the book.
///
/// Identity (`id`, `order_type`, `side`, `price`) is immutable once resting;
/// only `remainder` changes, and only downward. An order is on the book iff
/// `remainder > 0` and the directory holds an entry for its id.
///
/// ## Example
///
/// ```
/// use lobcore::{Order, OrderType, Side};
///
/// let order = Order::new(1, OrderType::Gtc, Side::Buy, 100, 10);
/// assert_eq!(order.remainder, 10);
/// assert!(!order.filled());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Order {
    /// Caller-assigned identifier, unique while resting.
    pub id: u64,

    /// Admission policy. Immutable; MAR orders are repriced to GTC before
    /// they ever rest.
    pub order_type: OrderType,

    /// Buy or sell.
    pub side: Side,

    /// Limit price in ticks.
    pub price: u64,

    /// Unfilled quantity. Strictly positive while resting.
    pub remainder: u64,
}

impl Order {
    /// Create a new order with `remainder` set to the full quantity.
    pub fn new(id: u64, order_type: OrderType, side: Side, price: u64, quantity: u64) -> Self {
        Self {
            id,
            order_type,
            side,
            price,
            remainder: quantity,
        }
    }

    /// Consume `quantity` from the remainder.
    ///
    /// # Panics
    ///
    /// Filling an order for more than its remaining quantity breaks an
    /// invariant that cannot be restored, so it is fatal.
    pub fn fill(&mut self, quantity: u64) {
        assert!(
            quantity <= self.remainder,
            "order {} cannot be filled for more than its remaining quantity",
            self.id
        );
        self.remainder -= quantity;
    }

    /// True once the remainder reaches zero.
    #[inline]
    pub fn filled(&self) -> bool {
        self.remainder == 0
    }
}

// ============================================================================
// Change struct
// ============================================================================

/// Replacement terms for [`modify`](crate::OrderBook::modify).
///
/// The modified order keeps its id and type but re-enters the book at the
/// tail of its new level, so queue priority is lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Change {
    /// New side.
    pub side: Side,
    /// New limit price in ticks.
    pub price: u64,
    /// New unfilled quantity.
    pub remainder: u64,
}

// ============================================================================
// Unit Tests
// ============================================================================
