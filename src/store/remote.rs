//! Cart store over an external key-value backend.

use super::{CartStore, KvBackend, StoreError};
use crate::model::Cart;
use async_trait::async_trait;
use tracing::{debug, info, warn};

/// Cart store that serializes each cart as JSON under its user id in a
/// [`KvBackend`].
///
/// `add_item` is an optimistic loop: read the stored bytes, apply the change,
/// and install the result with [`KvBackend::compare_and_set`] against the
/// bytes that were read. A concurrent writer makes the swap fail and the loop
/// starts over from the fresh value, so no increment is ever lost. The single
/// swap is the only write, so dropping the call midway leaves the stored cart
/// either untouched or fully updated.
#[derive(Debug)]
pub struct RemoteCartStore<B> {
    backend: B,
}

impl<B: KvBackend> RemoteCartStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn decode(user_id: &str, bytes: &[u8]) -> Result<Cart, StoreError> {
        serde_json::from_slice(bytes).map_err(|e| StoreError::Corrupt {
            user_id: user_id.to_string(),
            reason: e.to_string(),
        })
    }

    fn encode(cart: &Cart) -> Result<Vec<u8>, StoreError> {
        serde_json::to_vec(cart).map_err(|e| StoreError::Corrupt {
            user_id: cart.user_id.clone(),
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl<B: KvBackend> CartStore for RemoteCartStore<B> {
    async fn initialize(&self) -> Result<(), StoreError> {
        self.backend.ping().await?;
        info!("Remote cart store initialized");
        Ok(())
    }

    async fn add_item(&self, user_id: &str, product_id: &str, quantity: i32) -> Result<(), StoreError> {
        info!(user_id, product_id, quantity, "AddItem");
        let mut attempt: u32 = 0;
        loop {
            let current = self.backend.get(user_id).await?;
            let mut cart = match current.as_deref() {
                Some(bytes) => Self::decode(user_id, bytes)?,
                None => Cart::empty(user_id),
            };
            cart.add(product_id, quantity)
                .map_err(|e| StoreError::overflow(user_id, e))?;
            let updated = Self::encode(&cart)?;

            if self
                .backend
                .compare_and_set(user_id, current.as_deref(), updated)
                .await?
            {
                return Ok(());
            }

            attempt += 1;
            debug!(user_id, attempt, "Concurrent update, retrying");
            tokio::task::yield_now().await;
        }
    }

    async fn empty_cart(&self, user_id: &str) -> Result<(), StoreError> {
        info!(user_id, "EmptyCart");
        let encoded = Self::encode(&Cart::empty(user_id))?;
        self.backend.set(user_id, encoded).await
    }

    async fn get_cart(&self, user_id: &str) -> Result<Cart, StoreError> {
        let stored = self.backend.get(user_id).await?;
        debug!(user_id, found = stored.is_some(), "GetCart");
        match stored {
            Some(bytes) => Self::decode(user_id, &bytes),
            None => Ok(Cart::empty(user_id)),
        }
    }

    async fn ping(&self) -> bool {
        match self.backend.ping().await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Backend ping failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryBackend;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_add_and_get_round_trip_through_backend() {
        let store = RemoteCartStore::new(MemoryBackend::new());
        store.initialize().await.unwrap();

        store.add_item("user_1", "p1", 2).await.unwrap();
        store.add_item("user_1", "p1", 3).await.unwrap();
        store.add_item("user_1", "p2", 1).await.unwrap();

        let cart = store.get_cart("user_1").await.unwrap();
        assert_eq!(cart.user_id, "user_1");
        assert_eq!(cart.items.len(), 2);
        assert_eq!(cart.quantity_of("p1"), Some(5));
        assert_eq!(cart.quantity_of("p2"), Some(1));
    }

    #[tokio::test]
    async fn test_missing_and_emptied_carts_read_as_empty() {
        let store = RemoteCartStore::new(MemoryBackend::new());

        assert!(store.get_cart("user_1").await.unwrap().is_empty());

        store.add_item("user_1", "p1", 1).await.unwrap();
        store.empty_cart("user_1").await.unwrap();
        assert!(store.get_cart("user_1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unavailable_backend() {
        let store = RemoteCartStore::new(MemoryBackend::new());
        store.backend().set_available(false);

        assert!(!store.ping().await);
        assert!(matches!(store.initialize().await, Err(StoreError::Unavailable(_))));
        assert!(matches!(
            store.add_item("user_1", "p1", 1).await,
            Err(StoreError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_garbage_in_backend_is_reported_as_corrupt() {
        let store = RemoteCartStore::new(MemoryBackend::new());
        store.backend().set("user_1", b"not json".to_vec()).await.unwrap();

        let result = store.get_cart("user_1").await;
        assert!(matches!(result, Err(StoreError::Corrupt { .. })));
    }

    #[tokio::test]
    async fn test_overflowing_add_fails_and_leaves_stored_cart() {
        let store = RemoteCartStore::new(MemoryBackend::new());
        store.add_item("user_1", "p1", i32::MAX).await.unwrap();

        let result = store.add_item("user_1", "p1", 1).await;

        assert!(matches!(result, Err(StoreError::QuantityOverflow { .. })));
        let cart = store.get_cart("user_1").await.unwrap();
        assert_eq!(cart.quantity_of("p1"), Some(i32::MAX));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_adds_retry_instead_of_losing_updates() {
        let store = Arc::new(RemoteCartStore::new(MemoryBackend::new()));

        let mut handles = vec![];
        for i in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                for _ in 0..20 {
                    store.add_item("user_1", "p1", 1).await.unwrap();
                    store.add_item("user_1", &format!("p{}", i + 2), 1).await.unwrap();
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let cart = store.get_cart("user_1").await.unwrap();
        assert_eq!(cart.quantity_of("p1"), Some(320));
        assert_eq!(cart.items.len(), 17);
    }
}
