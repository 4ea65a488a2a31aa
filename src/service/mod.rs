//! # Cart Service
//!
//! The call-dispatch seam. An external framework decodes inbound calls into a
//! [`CartRequest`] plus a [`CallContext`] and hands them to a [`CallHandler`].
//! [`CartService`] is the innermost handler and runs each request against a
//! [`CartStore`]; wrappers such as
//! [`TracingInterceptor`](crate::interceptor::TracingInterceptor) implement the
//! same trait so they can be stacked around it.

pub mod context;
pub mod error;

pub use context::*;
pub use error::*;

use crate::model::{Cart, CartItem};
use crate::store::CartStore;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

pub const ADD_ITEM_METHOD: &str = "/hipstershop.CartService/AddItem";
pub const GET_CART_METHOD: &str = "/hipstershop.CartService/GetCart";
pub const EMPTY_CART_METHOD: &str = "/hipstershop.CartService/EmptyCart";

/// A decoded cart service call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartRequest {
    AddItem { user_id: String, item: CartItem },
    GetCart { user_id: String },
    EmptyCart { user_id: String },
}

impl CartRequest {
    /// Fully qualified method name the request is dispatched under.
    pub fn method(&self) -> &'static str {
        match self {
            CartRequest::AddItem { .. } => ADD_ITEM_METHOD,
            CartRequest::GetCart { .. } => GET_CART_METHOD,
            CartRequest::EmptyCart { .. } => EMPTY_CART_METHOD,
        }
    }
}

/// Result of a cart service call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartResponse {
    /// Acknowledgement for `AddItem` and `EmptyCart`.
    Empty,
    Cart(Cart),
}

/// Something that can handle a dispatched cart call.
#[async_trait]
pub trait CallHandler: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn call(&self, request: CartRequest, ctx: &CallContext) -> Result<CartResponse, Self::Error>;
}

#[async_trait]
impl<H: CallHandler + ?Sized> CallHandler for Arc<H> {
    type Error = H::Error;

    async fn call(&self, request: CartRequest, ctx: &CallContext) -> Result<CartResponse, Self::Error> {
        (**self).call(request, ctx).await
    }
}

/// Innermost handler: executes cart calls against a store.
#[derive(Debug, Clone)]
pub struct CartService<S> {
    store: S,
}

impl<S: CartStore> CartService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[async_trait]
impl<S: CartStore> CallHandler for CartService<S> {
    type Error = ServiceError;

    async fn call(&self, request: CartRequest, ctx: &CallContext) -> Result<CartResponse, ServiceError> {
        debug!(method = %ctx.method, ?request, "Handling call");
        match request {
            CartRequest::AddItem { user_id, item } => {
                self.store
                    .add_item(&user_id, &item.product_id, item.quantity)
                    .await?;
                Ok(CartResponse::Empty)
            }
            CartRequest::GetCart { user_id } => {
                let cart = self.store.get_cart(&user_id).await?;
                Ok(CartResponse::Cart(cart))
            }
            CartRequest::EmptyCart { user_id } => {
                self.store.empty_cart(&user_id).await?;
                Ok(CartResponse::Empty)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::mock::MockCartStore;
    use crate::store::{InMemoryCartStore, StoreError};

    #[tokio::test]
    async fn test_service_runs_requests_against_store() {
        let service = CartService::new(InMemoryCartStore::new());
        let add = CartRequest::AddItem {
            user_id: "user_1".into(),
            item: CartItem::new("p1", 3),
        };

        let ack = service.call(add.clone(), &CallContext::new(add.method())).await.unwrap();
        assert_eq!(ack, CartResponse::Empty);

        let get = CartRequest::GetCart { user_id: "user_1".into() };
        let response = service.call(get, &CallContext::new(GET_CART_METHOD)).await.unwrap();
        match response {
            CartResponse::Cart(cart) => assert_eq!(cart.quantity_of("p1"), Some(3)),
            other => panic!("Expected a cart, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_store_failure_surfaces_as_service_error() {
        let mock = MockCartStore::new();
        mock.expect_empty_cart("user_1")
            .return_err(StoreError::Unavailable("connection refused".into()));
        let service = CartService::new(mock.clone());

        let request = CartRequest::EmptyCart { user_id: "user_1".into() };
        let err = service
            .call(request, &CallContext::new(EMPTY_CART_METHOD))
            .await
            .unwrap_err();

        assert_eq!(err, ServiceError::Store(StoreError::Unavailable("connection refused".into())));
        assert_eq!(err.to_string(), "Cart store unavailable: connection refused");
        mock.verify();
    }
}
