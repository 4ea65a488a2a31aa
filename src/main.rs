//! Demo entry point: starts the cart system from the environment and drives
//! a handful of concurrent calls through the traced handler chain.

use cart_service::interceptor::{LogTracer, SpanContext};
use cart_service::lifecycle::{setup_tracing, CartConfig, CartSystem};
use std::sync::Arc;
use tracing::{error, info, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = CartConfig::from_env().map_err(|e| e.to_string())?;
    info!(?config, "Starting cart service");

    let system = CartSystem::from_config(&config, None, Arc::new(LogTracer))
        .await
        .map_err(|e| e.to_string())?;

    info!(status = %system.health.check().await, "Health check");

    // Ten shoppers adding the same product at once
    let span = tracing::info_span!("concurrent_adds");
    let mut handles = vec![];
    for _ in 0..10 {
        let client = system.client.clone();
        handles.push(tokio::spawn(
            async move { client.add_item("user_1", "OLJCESPC7Z", 1).await }.instrument(span.clone()),
        ));
    }
    for handle in handles {
        match handle.await {
            Ok(Ok(())) => {}
            Ok(Err(status)) => error!(%status, "AddItem failed"),
            Err(e) => error!(error = %e, "AddItem task panicked"),
        }
    }

    // A call continuing a trace started upstream
    let traced = system.client.with_trace(SpanContext::new(1111, 2222));
    traced
        .add_item("user_1", "66VCHSJNUP", 2)
        .await
        .map_err(|e| e.to_string())?;

    let cart = system.client.get_cart("user_1").await.map_err(|e| e.to_string())?;
    for item in &cart.items {
        info!(product_id = %item.product_id, quantity = item.quantity, "Cart item");
    }

    system.client.empty_cart("user_1").await.map_err(|e| e.to_string())?;
    let emptied = system.client.get_cart("user_1").await.map_err(|e| e.to_string())?;
    info!(items = emptied.items.len(), "Cart emptied");

    system.shutdown();
    Ok(())
}
