//! Error types for cart stores.

use crate::model::QuantityOverflow;
use thiserror::Error;

/// Errors that can occur during cart store operations.
///
/// A missing cart is never an error: stores answer with an empty cart instead.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    /// The backing store could not be reached.
    #[error("Cart store unavailable: {0}")]
    Unavailable(String),

    /// A stored cart could not be decoded or encoded.
    #[error("Corrupt cart for user {user_id}: {reason}")]
    Corrupt { user_id: String, reason: String },

    /// The add would overflow the quantity of an existing line.
    #[error("Cannot add to cart for user {user_id}: {source}")]
    QuantityOverflow {
        user_id: String,
        #[source]
        source: QuantityOverflow,
    },
}

impl StoreError {
    pub(crate) fn overflow(user_id: &str, source: QuantityOverflow) -> Self {
        StoreError::QuantityOverflow {
            user_id: user_id.to_string(),
            source,
        }
    }
}
