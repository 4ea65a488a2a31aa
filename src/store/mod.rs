//! # Cart Stores
//!
//! The storage capability behind the cart service. Everything above this
//! module (the [`CartService`](crate::service::CartService), the
//! [`HealthProbe`](crate::health::HealthProbe)) talks to a [`CartStore`] and
//! never to a concrete backend.
//!
//! ## Implementations
//!
//! - [`InMemoryCartStore`] - sharded in-process map, always live.
//! - [`RemoteCartStore`] - carts serialized into an external key-value
//!   backend reached through [`KvBackend`].
//! - [`MockCartStore`](mock::MockCartStore) - expectation-driven store for tests.
//!
//! ## Concurrency Contract
//!
//! Operations on different users never block each other. Concurrent
//! `add_item` calls for the same user are all reflected in the final cart:
//! the read-modify-write sequence is installed atomically, so a lost update
//! is impossible. `empty_cart` is a plain overwrite and races with `add_item`
//! on a last-writer-wins basis.

pub mod backend;
pub mod error;
pub mod memory;
pub mod mock;
pub mod remote;

pub use backend::*;
pub use error::*;
pub use memory::*;
pub use remote::*;

use crate::model::Cart;
use async_trait::async_trait;
use std::sync::Arc;

/// Storage contract for per-user carts.
#[async_trait]
pub trait CartStore: Send + Sync {
    /// Prepares the store for use. Idempotent.
    ///
    /// # Errors
    /// [`StoreError::Unavailable`] if the backend cannot be reached.
    async fn initialize(&self) -> Result<(), StoreError>;

    /// Adds `quantity` of `product_id` to the user's cart, creating the cart
    /// if needed and accumulating into an existing line for the product.
    async fn add_item(&self, user_id: &str, product_id: &str, quantity: i32) -> Result<(), StoreError>;

    /// Replaces the user's cart with an empty one.
    async fn empty_cart(&self, user_id: &str) -> Result<(), StoreError>;

    /// Returns a copy of the user's cart, or an empty cart if there is none.
    async fn get_cart(&self, user_id: &str) -> Result<Cart, StoreError>;

    /// Cheap liveness check. Backend failures are reported as `false`.
    async fn ping(&self) -> bool;
}

#[async_trait]
impl<S: CartStore + ?Sized> CartStore for Arc<S> {
    async fn initialize(&self) -> Result<(), StoreError> {
        (**self).initialize().await
    }

    async fn add_item(&self, user_id: &str, product_id: &str, quantity: i32) -> Result<(), StoreError> {
        (**self).add_item(user_id, product_id, quantity).await
    }

    async fn empty_cart(&self, user_id: &str) -> Result<(), StoreError> {
        (**self).empty_cart(user_id).await
    }

    async fn get_cart(&self, user_id: &str) -> Result<Cart, StoreError> {
        (**self).get_cart(user_id).await
    }

    async fn ping(&self) -> bool {
        (**self).ping().await
    }
}
