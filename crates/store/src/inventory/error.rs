//! Inventory error types.

use thiserror::Error;

use stockbook_core::ProductId;

/// Reasons a product input is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Name is empty after trimming.
    #[error("product name cannot be empty")]
    EmptyName,

    /// Price is not a finite number.
    #[error("price is not a number: {0:?}")]
    InvalidPrice(String),

    /// Price is below zero.
    #[error("price cannot be negative")]
    NegativePrice,

    /// Stock is not a finite number.
    #[error("stock is not a number: {0:?}")]
    InvalidStock(String),

    /// Stock is below zero.
    #[error("stock cannot be negative")]
    NegativeStock,

    /// Stock does not fit the supported range.
    #[error("stock must be at most {max}")]
    StockTooLarge {
        /// Largest accepted stock.
        max: u32,
    },

    /// `price * stock` does not fit the supported range.
    #[error("price times stock is too large")]
    TotalTooLarge,
}

/// Errors returned by [`InventoryStore`](super::InventoryStore) operations.
///
/// Every variant is recoverable; the store is left unchanged when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProductError {
    /// The supplied fields failed validation.
    #[error("invalid product: {0}")]
    Validation(#[from] ValidationError),

    /// Row position outside `0..len`.
    #[error("no product at position {index} (inventory has {len})")]
    IndexOutOfRange {
        /// Requested position.
        index: usize,
        /// Number of records at the time of the call.
        len: usize,
    },

    /// No record carries this ID.
    #[error("product not found: {0}")]
    NotFound(ProductId),
}

impl ProductError {
    /// Whether this is an input validation failure.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Whether this is a lookup failure (bad position or unknown ID).
    #[must_use]
    pub const fn is_range(&self) -> bool {
        matches!(self, Self::IndexOutOfRange { .. } | Self::NotFound(_))
    }
}
