//! Order book error types.
//!
//! The error surface is deliberately narrow. Duplicate adds and cancels or
//! modifies of unknown ids are silent no-ops (an idempotence contract for
//! gateway retries), and overfilling an order is a fatal programming error,
//! so the only reportable failure is admission with an unknown side.

use thiserror::Error;

/// Errors reported by order book operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OrderBookError {
    /// The order (or modify change) has no side and cannot be admitted.
    /// The book is unchanged.
    #[error("order {id} has an unknown side and cannot be added to the book")]
    InvalidOrder {
        /// Id of the offending order.
        id: u64,
    },
}
