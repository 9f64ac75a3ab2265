//! Trade record produced when a bid head and an ask head cross.

use serde::{Deserialize, Serialize};

/// One leg of a trade.
///
/// Each leg records its order's own resting price; the two legs necessarily
/// cross at the moment of match, but they are kept explicit for audit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TradeInfo {
    /// Id of the order on this leg.
    pub order_id: u64,
    /// The leg's resting price in ticks.
    pub price: u64,
    /// Executed quantity. Always positive, always equal on both legs.
    pub quantity: u64,
}

/// A two-leg trade: the bid head and the ask head that filled against each
/// other in one matching step.
///
/// ## Example
///
/// ```
/// use lobcore::{Trade, TradeInfo};
///
/// let trade = Trade {
///     bid: TradeInfo { order_id: 1, price: 100, quantity: 10 },
///     ask: TradeInfo { order_id: 2, price: 100, quantity: 10 },
/// };
/// assert_eq!(trade.quantity(), 10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Trade {
    /// The buying leg.
    pub bid: TradeInfo,
    /// The selling leg.
    pub ask: TradeInfo,
}

impl Trade {
    /// Executed quantity, identical on both legs.
    #[inline]
    pub fn quantity(&self) -> u64 {
        self.bid.quantity
    }
}
