use super::config::{CartConfig, ConfigError, StoreSelection};
use crate::clients::{CartClient, SharedHandler};
use crate::health::HealthProbe;
use crate::interceptor::{Tracer, TracingInterceptor};
use crate::service::CartService;
use crate::store::{CartStore, InMemoryCartStore, KvBackend, RemoteCartStore, StoreError};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Errors raised while bringing the system up.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SystemError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// The runtime orchestrator for the cart service.
///
/// `CartSystem` is responsible for:
/// - **Store Selection**: picking and initializing the [`CartStore`]
/// - **Handler Wiring**: stacking the [`TracingInterceptor`] around the
///   [`CartService`]
/// - **Shared Access**: handing the same store to the [`HealthProbe`]
///
/// # Example
///
/// ```ignore
/// let system = CartSystem::start(
///     Arc::new(InMemoryCartStore::new()),
///     Arc::new(LogTracer),
///     CART_SERVICE_NAME,
/// ).await?;
///
/// system.client.add_item("user_1", "OLJCESPC7Z", 2).await?;
/// assert_eq!(system.health.check().await, ServingStatus::Serving);
///
/// system.shutdown();
/// ```
pub struct CartSystem {
    /// Typed client over the traced handler chain
    pub client: CartClient,

    /// Liveness probe over the same store
    pub health: HealthProbe,

    handler: SharedHandler,
    store: Arc<dyn CartStore>,
}

impl CartSystem {
    /// Initializes `store` and wires the handler chain and health probe
    /// around it.
    ///
    /// # Errors
    /// Whatever the store's `initialize` reports, typically
    /// [`StoreError::Unavailable`].
    pub async fn start(
        store: Arc<dyn CartStore>,
        tracer: Arc<dyn Tracer>,
        service_name: &str,
    ) -> Result<Self, StoreError> {
        store.initialize().await?;

        let handler: SharedHandler = Arc::new(TracingInterceptor::new(
            CartService::new(store.clone()),
            tracer,
        ));
        let client = CartClient::new(handler.clone());
        let health = HealthProbe::with_service_name(store.clone(), service_name);

        info!(service = service_name, "Cart system started");
        Ok(Self {
            client,
            health,
            handler,
            store,
        })
    }

    /// Builds the store described by `config` and starts the system on it.
    ///
    /// A remote store needs `backend`: this crate carries no network client
    /// of its own, so the caller supplies one.
    pub async fn from_config(
        config: &CartConfig,
        backend: Option<Arc<dyn KvBackend>>,
        tracer: Arc<dyn Tracer>,
    ) -> Result<Self, SystemError> {
        let store: Arc<dyn CartStore> = match &config.store {
            StoreSelection::InMemory { capacity } => {
                info!(capacity, "Using in-memory cart store");
                Arc::new(InMemoryCartStore::with_capacity(*capacity))
            }
            StoreSelection::Remote { addr } => {
                let backend = backend.ok_or_else(|| ConfigError::MissingBackend { addr: addr.clone() })?;
                info!(addr = %addr, "Using remote cart store");
                Arc::new(RemoteCartStore::new(backend))
            }
        };
        Ok(Self::start(store, tracer, &config.service_name).await?)
    }

    /// The traced handler chain, for plugging into an external dispatcher.
    pub fn handler(&self) -> SharedHandler {
        self.handler.clone()
    }

    pub fn store(&self) -> &Arc<dyn CartStore> {
        &self.store
    }

    /// Shuts the system down.
    ///
    /// Carts held by an in-memory store are dropped with it.
    pub fn shutdown(self) {
        info!("Shutting down cart system...");
        drop(self.client);
        drop(self.handler);
        drop(self.health);
        drop(self.store);
        info!("Cart system shutdown complete.");
    }
}
