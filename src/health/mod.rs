//! # Health Probe
//!
//! Answers liveness checks for the cart service by asking the configured
//! [`CartStore`] whether its backend is reachable. The status is recomputed on
//! every check; nothing is cached.

use crate::store::CartStore;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Default name the probe answers for in [`HealthProbe::check_service`].
pub const CART_SERVICE_NAME: &str = "hipstershop.CartService";

/// Serving status reported by a health check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServingStatus {
    /// The service name is not one this probe knows about.
    Unknown,
    Serving,
    NotServing,
}

impl fmt::Display for ServingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ServingStatus::Unknown => "UNKNOWN",
            ServingStatus::Serving => "SERVING",
            ServingStatus::NotServing => "NOT_SERVING",
        };
        f.write_str(label)
    }
}

/// Liveness probe over a cart store.
#[derive(Clone)]
pub struct HealthProbe {
    store: Arc<dyn CartStore>,
    service_name: String,
}

impl HealthProbe {
    pub fn new(store: Arc<dyn CartStore>) -> Self {
        Self::with_service_name(store, CART_SERVICE_NAME)
    }

    pub fn with_service_name(store: Arc<dyn CartStore>, service_name: impl Into<String>) -> Self {
        Self {
            store,
            service_name: service_name.into(),
        }
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Checks the store: `Serving` if it answers its ping, `NotServing` if not.
    ///
    /// Never fails; stores report backend errors as a negative ping.
    pub async fn check(&self) -> ServingStatus {
        debug!("Checking cart service health");
        if self.store.ping().await {
            ServingStatus::Serving
        } else {
            ServingStatus::NotServing
        }
    }

    /// Handles a standard health request for `service`.
    ///
    /// The empty name stands for the whole server. Names other than that and
    /// this probe's service name report `Unknown` without touching the store.
    pub async fn check_service(&self, service: &str) -> ServingStatus {
        if service.is_empty() || service == self.service_name {
            self.check().await
        } else {
            debug!(service, "Health check for unknown service");
            ServingStatus::Unknown
        }
    }
}
