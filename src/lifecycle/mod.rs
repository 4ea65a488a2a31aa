//! # System Lifecycle & Orchestration
//!
//! Brings the cart service up and down: picks a store from configuration,
//! initializes it, stacks the handler chain, and installs logging.
//!
//! ## Startup Order
//!
//! 1. [`setup_tracing`] - once per process, before the first call
//! 2. [`CartConfig::from_env`] - choose in-memory or remote storage
//! 3. [`CartSystem::from_config`] - initialize the store (fails with
//!    `StoreUnavailable` if the backend is unreachable) and wire
//!    `TracingInterceptor -> CartService -> CartStore`
//!
//! ## Shutdown
//!
//! [`CartSystem::shutdown`] drops every handle. Nothing is flushed: the
//! in-memory store has no persistence guarantee.

pub mod cart_system;
pub mod config;
pub mod tracing;

pub use cart_system::*;
pub use config::*;
pub use self::tracing::*;
