//! Decimal price ↔ integer tick conversion.
//!
//! The book itself only ever sees integer tick counts; quantities and prices
//! are `u64` and no floating point is involved. These helpers sit at the
//! edge, converting human decimal quotes to ticks and back for display.
//!
//! Off-tick prices are rejected rather than rounded: a gateway that quotes
//! between ticks has a bug upstream, and rounding would hide it.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// Convert a decimal price string to a tick count for a given tick size.
///
/// Returns `None` for negative prices, prices not on the tick grid, or
/// values out of `u64` range.
///
/// # Example
///
/// ```
/// use lobcore::types::price::to_ticks;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let tick = Decimal::from_str("0.25").unwrap();
/// assert_eq!(to_ticks("100.25", tick), Some(401));
/// assert_eq!(to_ticks("100.30", tick), None); // off-tick
/// ```
pub fn to_ticks(price: &str, tick_size: Decimal) -> Option<u64> {
    let price = Decimal::from_str(price).ok()?;
    decimal_to_ticks(price, tick_size)
}

/// Convert a `Decimal` price to a tick count for a given tick size.
pub fn decimal_to_ticks(price: Decimal, tick_size: Decimal) -> Option<u64> {
    if price.is_sign_negative() || tick_size <= Decimal::ZERO {
        return None;
    }

    let ticks = price.checked_div(tick_size)?;
    if !ticks.fract().is_zero() {
        return None;
    }

    ticks.to_u64()
}

/// Convert a tick count back to a decimal price.
pub fn ticks_to_decimal(ticks: u64, tick_size: Decimal) -> Decimal {
    Decimal::from(ticks) * tick_size
}
