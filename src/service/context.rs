//! Per-call context handed to every [`CallHandler`](super::CallHandler).

use std::collections::HashMap;

/// Request metadata (headers) attached to an inbound call.
///
/// Keys are case-insensitive and stored lowercased.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    entries: HashMap<String, String>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl AsRef<str>, value: impl Into<String>) {
        self.entries.insert(key.as_ref().to_ascii_lowercase(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(&key.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut metadata = Metadata::new();
        for (key, value) in iter {
            metadata.insert(key, value);
        }
        metadata
    }
}

/// What the dispatcher knows about a call besides its request body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallContext {
    /// Fully qualified method name, e.g. `/hipstershop.CartService/AddItem`.
    pub method: String,
    pub metadata: Metadata,
}

impl CallContext {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            metadata: Metadata::new(),
        }
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_keys_are_case_insensitive() {
        let metadata: Metadata = [("X-Datadog-Trace-Id", "42")].into_iter().collect();

        assert_eq!(metadata.get("x-datadog-trace-id"), Some("42"));
        assert_eq!(metadata.get("X-DATADOG-TRACE-ID"), Some("42"));
        assert_eq!(metadata.get("x-datadog-parent-id"), None);
    }
}
