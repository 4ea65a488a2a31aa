//! Key-value backend capability used by [`RemoteCartStore`](super::RemoteCartStore).
//!
//! The wire protocol of the real backend (a remote cache) lives outside this
//! crate; a client for it only has to implement [`KvBackend`].

use super::StoreError;
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Minimal get/set/ping capability against an external key-value service.
#[async_trait]
pub trait KvBackend: Send + Sync {
    /// Reads the raw value stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Unconditionally stores `value` under `key`.
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError>;

    /// Stores `value` under `key` only if the current value equals `expected`
    /// (`None` meaning the key is absent). Returns `false` when another writer
    /// got there first.
    async fn compare_and_set(
        &self,
        key: &str,
        expected: Option<&[u8]>,
        value: Vec<u8>,
    ) -> Result<bool, StoreError>;

    /// Round-trips to the backend.
    async fn ping(&self) -> Result<(), StoreError>;
}

#[async_trait]
impl<B: KvBackend + ?Sized> KvBackend for Arc<B> {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        (**self).set(key, value).await
    }

    async fn compare_and_set(
        &self,
        key: &str,
        expected: Option<&[u8]>,
        value: Vec<u8>,
    ) -> Result<bool, StoreError> {
        (**self).compare_and_set(key, expected, value).await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        (**self).ping().await
    }
}

/// In-process [`KvBackend`] with an availability switch.
///
/// Used to run [`RemoteCartStore`](super::RemoteCartStore) without a network
/// dependency and to simulate outages.
#[derive(Debug)]
pub struct MemoryBackend {
    entries: DashMap<String, Vec<u8>>,
    available: AtomicBool,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self {
            entries: DashMap::new(),
            available: AtomicBool::new(true),
        }
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates the backend going away (`false`) or coming back (`true`).
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable("memory backend switched off".to_string()))
        }
    }
}

#[async_trait]
impl KvBackend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        self.check_available()?;
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        self.check_available()?;
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    async fn compare_and_set(
        &self,
        key: &str,
        expected: Option<&[u8]>,
        value: Vec<u8>,
    ) -> Result<bool, StoreError> {
        self.check_available()?;
        match self.entries.entry(key.to_string()) {
            Entry::Occupied(mut entry) => {
                if expected == Some(entry.get().as_slice()) {
                    entry.insert(value);
                    Ok(true)
                } else {
                    Ok(false)
                }
            }
            Entry::Vacant(entry) => {
                if expected.is_none() {
                    entry.insert(value);
                    Ok(true)
                } else {
                    Ok(false)
                }
            }
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check_available()
    }
}
