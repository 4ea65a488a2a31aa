//! # Cart Service
//!
//! > **A concurrent per-user shopping cart behind a storage-agnostic interface.**
//!
//! Given a user id, what is in their cart, and can many callers add and
//! remove items at once without corrupting it? This crate answers that with a
//! pluggable [`CartStore`](store::CartStore), a health probe over it, and a
//! tracing interceptor that wraps every call in a span.
//!
//! ## 🏗️ Design Philosophy
//!
//! ### Storage is a capability, not a dependency
//! The service, the health probe and the lifecycle code only ever see the
//! [`CartStore`](store::CartStore) trait. The in-memory store and the remote
//! store are interchangeable at startup.
//!
//! ### No lost updates, no global lock
//! Adding an item is a read-modify-write. The in-memory store runs it inside
//! a per-key entry guard of a sharded map; the remote store runs it as a
//! compare-and-set retry loop. Either way, concurrent adds for one user all
//! land, and users in different shards never wait on each other.
//!
//! ### Observability composes around any handler
//! [`TracingInterceptor`](interceptor::TracingInterceptor) implements the same
//! [`CallHandler`](service::CallHandler) trait as the service it wraps, so it
//! can sit in front of any handler chain.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Data ([`model`])
//! [`Cart`](model::Cart) and [`CartItem`](model::CartItem), including the
//! accumulate-on-add rule.
//!
//! ### 2. The Storage ([`store`])
//! - **Role**: Owns every cart. Nothing else mutates them.
//! - **Key items**: [`CartStore`](store::CartStore),
//!   [`InMemoryCartStore`](store::InMemoryCartStore),
//!   [`RemoteCartStore`](store::RemoteCartStore),
//!   [`MockCartStore`](store::mock::MockCartStore).
//!
//! ### 3. The Handler Chain ([`service`], [`interceptor`])
//! - **Role**: Turns dispatched calls into store operations and traces them.
//! - **Key items**: [`CartService`](service::CartService),
//!   [`TracingInterceptor`](interceptor::TracingInterceptor),
//!   [`Status`](interceptor::Status).
//!
//! ### 4. The Probe ([`health`])
//! [`HealthProbe`](health::HealthProbe) maps the store's ping to
//! `SERVING` / `NOT_SERVING`.
//!
//! ### 5. The Interface ([`clients`]) and Orchestrator ([`lifecycle`])
//! [`CartClient`](clients::CartClient) hides request construction;
//! [`CartSystem`](lifecycle::CartSystem) wires it all together from
//! [`CartConfig`](lifecycle::CartConfig).
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # Run the demo with info logs
//! RUST_LOG=info cargo run
//!
//! # Run the tests
//! cargo test
//! ```

pub mod clients;
pub mod health;
pub mod interceptor;
pub mod lifecycle;
pub mod model;
pub mod service;
pub mod store;
