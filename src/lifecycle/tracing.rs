//! # Observability & Logging
//!
//! [`setup_tracing`] installs the process-wide `tracing` subscriber. Call it
//! once at startup, before the first request; there is no teardown.
//!
//! ## What Gets Logged
//!
//! - **Store operations**: `AddItem`, `EmptyCart`, `GetCart` with `user_id`
//!   and product fields
//! - **Call spans**: one `grpc.server` span per call from the default
//!   [`LogTracer`](crate::interceptor::LogTracer), carrying `resource`,
//!   `trace_id`, `span_id`, `parent_id`, `span_kind` and `span_type`
//! - **Failures**: handler errors logged inside their call span; tracer
//!   bookkeeping problems as warnings
//! - **Health checks**: one debug line per check
//!
//! ## Usage
//!
//! ```bash
//! # Compact logs (default)
//! RUST_LOG=info cargo run
//!
//! # Include health checks and full request payloads
//! RUST_LOG=debug cargo run
//!
//! # Only the store
//! RUST_LOG=cart_service::store=debug cargo run
//! ```
//!
//! With `RUST_LOG=info`, a traced `AddItem` looks like:
//!
//! ```text
//! INFO grpc.server{resource=/hipstershop.CartService/AddItem trace_id=1111 span_id=... parent_id=2222 span_kind="server" span_type="custom"}: AddItem user_id="user_1" product_id="OLJCESPC7Z" quantity=2
//! ```

use tracing::debug;

/// Initializes the `tracing` subscriber with `RUST_LOG` filtering and the
/// compact format. A second call leaves the first subscriber in place.
pub fn setup_tracing() {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .try_init();

    if let Err(e) = installed {
        debug!(error = %e, "Tracing subscriber already installed, keeping it");
    }
}
