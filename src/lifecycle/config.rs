//! Environment-driven configuration for [`CartSystem`](super::CartSystem).

use crate::health::CART_SERVICE_NAME;
use thiserror::Error;

/// Address of the remote cart backend. Selects [`StoreSelection::Remote`].
pub const REDIS_ADDR_VAR: &str = "REDIS_ADDR";
/// Service name the health probe answers for.
pub const SERVICE_NAME_VAR: &str = "CART_SERVICE_NAME";
/// Initial capacity of the in-memory store.
pub const STORE_CAPACITY_VAR: &str = "CART_STORE_CAPACITY";

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },

    #[error("Remote store configured at {addr} but no backend client was supplied")]
    MissingBackend { addr: String },
}

/// Which cart store the system runs on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreSelection {
    InMemory { capacity: usize },
    Remote { addr: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartConfig {
    pub store: StoreSelection,
    pub service_name: String,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            store: StoreSelection::InMemory { capacity: 0 },
            service_name: CART_SERVICE_NAME.to_string(),
        }
    }
}

impl CartConfig {
    /// Loads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Loads the configuration through `lookup`, which maps a variable name
    /// to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let store = match non_empty(REDIS_ADDR_VAR) {
            Some(addr) => StoreSelection::Remote { addr },
            None => {
                let capacity = match non_empty(STORE_CAPACITY_VAR) {
                    Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                        var: STORE_CAPACITY_VAR,
                        value: raw.clone(),
                    })?,
                    None => 0,
                };
                StoreSelection::InMemory { capacity }
            }
        };

        let service_name = non_empty(SERVICE_NAME_VAR).unwrap_or_else(|| CART_SERVICE_NAME.to_string());

        Ok(Self { store, service_name })
    }
}
