//! Error types for the cart service handler.

use crate::store::StoreError;
use thiserror::Error;

/// Errors raised by [`CartService`](super::CartService) while handling a call.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ServiceError {
    /// The cart store failed the operation.
    #[error(transparent)]
    Store(#[from] StoreError),
}
