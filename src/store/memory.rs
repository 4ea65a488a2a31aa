//! In-process cart store backed by a sharded concurrent map.

use super::{CartStore, StoreError};
use crate::model::{Cart, CartItem};
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::{debug, info};

/// Cart store that keeps every cart in process memory.
///
/// # Concurrency Model
/// Carts live in a [`DashMap`], which splits the key space into shards that
/// are locked independently. `add_item` performs its whole
/// read-locate-increment-or-append sequence while holding the entry guard for
/// that user, so two concurrent adds for the same user serialize while adds
/// for users in other shards never wait on each other. The mutation finishes
/// synchronously inside the guard, so a cancelled caller can never leave a
/// cart half updated.
#[derive(Debug, Default)]
pub struct InMemoryCartStore {
    carts: DashMap<String, Cart>,
}

impl InMemoryCartStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with room for `capacity` carts before reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            carts: DashMap::with_capacity(capacity),
        }
    }

    /// Number of users with a cart entry (including emptied carts).
    pub fn len(&self) -> usize {
        self.carts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.carts.is_empty()
    }
}

#[async_trait]
impl CartStore for InMemoryCartStore {
    async fn initialize(&self) -> Result<(), StoreError> {
        debug!("In-memory cart store initialized");
        Ok(())
    }

    async fn add_item(&self, user_id: &str, product_id: &str, quantity: i32) -> Result<(), StoreError> {
        info!(user_id, product_id, quantity, "AddItem");
        match self.carts.entry(user_id.to_string()) {
            Entry::Occupied(mut entry) => entry
                .get_mut()
                .add(product_id, quantity)
                .map_err(|e| StoreError::overflow(user_id, e)),
            Entry::Vacant(entry) => {
                entry.insert(Cart::with_item(user_id, CartItem::new(product_id, quantity)));
                Ok(())
            }
        }
    }

    async fn empty_cart(&self, user_id: &str) -> Result<(), StoreError> {
        info!(user_id, "EmptyCart");
        self.carts.insert(user_id.to_string(), Cart::empty(user_id));
        Ok(())
    }

    async fn get_cart(&self, user_id: &str) -> Result<Cart, StoreError> {
        let cart = self.carts.get(user_id).map(|entry| entry.value().clone());
        debug!(user_id, found = cart.is_some(), "GetCart");
        Ok(cart.unwrap_or_else(|| Cart::empty(user_id)))
    }

    async fn ping(&self) -> bool {
        true
    }
}
