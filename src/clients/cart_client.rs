use crate::interceptor::{SpanContext, Status, StatusCode};
use crate::model::{Cart, CartItem};
use crate::service::{CallContext, CallHandler, CartRequest, CartResponse, Metadata};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Handler chain as seen from a client: any stack that ends in a [`Status`].
pub type SharedHandler = Arc<dyn CallHandler<Error = Status>>;

/// Typed client for the cart service.
///
/// Builds the request and [`CallContext`] for each operation and unwraps the
/// response, so callers never deal with [`CartRequest`] or [`CartResponse`].
#[derive(Clone)]
pub struct CartClient {
    inner: SharedHandler,
    trace: Option<SpanContext>,
}

impl CartClient {
    pub fn new(inner: SharedHandler) -> Self {
        Self { inner, trace: None }
    }

    /// Returns a client whose calls carry `trace` as their remote parent.
    pub fn with_trace(&self, trace: SpanContext) -> Self {
        Self {
            inner: self.inner.clone(),
            trace: Some(trace),
        }
    }

    #[instrument(skip(self))]
    pub async fn add_item(&self, user_id: &str, product_id: &str, quantity: i32) -> Result<(), Status> {
        debug!("Sending request");
        let request = CartRequest::AddItem {
            user_id: user_id.to_string(),
            item: CartItem::new(product_id, quantity),
        };
        self.send(request).await.map(|_| ())
    }

    #[instrument(skip(self))]
    pub async fn get_cart(&self, user_id: &str) -> Result<Cart, Status> {
        debug!("Sending request");
        let request = CartRequest::GetCart {
            user_id: user_id.to_string(),
        };
        match self.send(request).await? {
            CartResponse::Cart(cart) => Ok(cart),
            other => Err(Status::new(
                StatusCode::Internal,
                format!("unexpected response to GetCart: {:?}", other),
            )),
        }
    }

    #[instrument(skip(self))]
    pub async fn empty_cart(&self, user_id: &str) -> Result<(), Status> {
        debug!("Sending request");
        let request = CartRequest::EmptyCart {
            user_id: user_id.to_string(),
        };
        self.send(request).await.map(|_| ())
    }

    async fn send(&self, request: CartRequest) -> Result<CartResponse, Status> {
        let mut metadata = Metadata::new();
        if let Some(trace) = &self.trace {
            trace.inject(&mut metadata);
        }
        let ctx = CallContext::new(request.method()).with_metadata(metadata);
        self.inner.call(request, &ctx).await
    }
}
