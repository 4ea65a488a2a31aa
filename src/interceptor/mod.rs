//! # Tracing Interceptor
//!
//! Wraps a [`CallHandler`] so that every call runs inside a server span.
//!
//! ## Protocol
//!
//! 1. Read the caller's trace and parent span ids from the request metadata
//!    (see [`propagation`]). Missing or malformed headers start a root span.
//! 2. Open a `grpc.server` span whose resource is the call's method name.
//! 3. Await the wrapped handler with the span entered.
//! 4. On success, close the span and return the response untouched.
//! 5. On failure, record the error message on the span, close it, and return
//!    a [`Status`] built from the explicit error mapping in [`status`].
//!
//! Span bookkeeping never decides the outcome of a call: a tracer that fails
//! to start, annotate or close a span is logged and otherwise ignored.
//!
//! ## Cancellation
//!
//! The span lives in a guard that closes it on drop. If the call future is
//! dropped before the handler finishes, the span is still closed and marked
//! as cancelled.

pub mod propagation;
pub mod recording;
pub mod status;
pub mod tracer;

pub use propagation::*;
pub use status::*;
pub use tracer::*;

use crate::service::{CallContext, CallHandler, CartRequest, CartResponse};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{warn, Instrument, Span};

/// [`CallHandler`] decorator that traces every call.
pub struct TracingInterceptor<H> {
    inner: H,
    tracer: Arc<dyn Tracer>,
}

impl<H> TracingInterceptor<H> {
    pub fn new(inner: H, tracer: Arc<dyn Tracer>) -> Self {
        Self { inner, tracer }
    }

    pub fn inner(&self) -> &H {
        &self.inner
    }
}

#[async_trait]
impl<H> CallHandler for TracingInterceptor<H>
where
    H: CallHandler,
    H::Error: ToStatusCode,
{
    type Error = Status;

    async fn call(&self, request: CartRequest, ctx: &CallContext) -> Result<CartResponse, Status> {
        let parent = SpanContext::extract(&ctx.metadata);
        let mut guard = SpanGuard::start(self.tracer.as_ref(), SpanOptions::server(&ctx.method, parent));

        let span = guard.tracing_span();
        let result = self.inner.call(request, ctx).instrument(span).await;

        match result {
            Ok(response) => {
                guard.finish();
                Ok(response)
            }
            Err(e) => {
                let message = e.to_string();
                guard.fail(&message);
                guard.finish();
                Err(Status::new(e.status_code(), message))
            }
        }
    }
}

/// Owns the active span for one call and guarantees it gets closed.
struct SpanGuard {
    span: Option<Box<dyn ActiveSpan>>,
    completed: bool,
}

impl SpanGuard {
    fn start(tracer: &dyn Tracer, options: SpanOptions) -> Self {
        let resource = options.resource.clone();
        let span = match tracer.start_active(options) {
            Ok(span) => Some(span),
            Err(e) => {
                warn!(error = %e, resource = %resource, "Could not start span, continuing untraced");
                None
            }
        };
        Self { span, completed: false }
    }

    fn tracing_span(&self) -> Span {
        self.span.as_ref().map_or_else(Span::none, |span| span.tracing_span())
    }

    fn fail(&mut self, message: &str) {
        if let Some(span) = self.span.as_mut() {
            if let Err(e) = span.set_exception(message) {
                warn!(error = %e, "Could not record error on span");
            }
        }
    }

    fn finish(mut self) {
        self.completed = true;
        self.close();
    }

    fn close(&mut self) {
        if let Some(span) = self.span.take() {
            if let Err(e) = span.close() {
                warn!(error = %e, "Could not close span");
            }
        }
    }
}

impl Drop for SpanGuard {
    fn drop(&mut self) {
        if !self.completed {
            self.fail("call cancelled before completion");
        }
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::recording::RecordingTracer;
    use super::*;
    use crate::model::CartItem;
    use crate::service::{CartService, Metadata, ServiceError, GET_CART_METHOD};
    use crate::store::mock::MockCartStore;
    use crate::store::{CartStore, InMemoryCartStore, StoreError};
    use std::time::Duration;

    fn traced_context(method: &str, trace: &str, parent: &str) -> CallContext {
        let metadata: Metadata = [(TRACE_ID_HEADER, trace), (PARENT_ID_HEADER, parent)]
            .into_iter()
            .collect();
        CallContext::new(method).with_metadata(metadata)
    }

    #[tokio::test]
    async fn test_span_continues_propagated_trace() {
        let tracer = RecordingTracer::new();
        let interceptor = TracingInterceptor::new(
            CartService::new(InMemoryCartStore::new()),
            Arc::new(tracer.clone()),
        );

        let request = CartRequest::GetCart { user_id: "user_1".into() };
        let ctx = traced_context(GET_CART_METHOD, "1111", "2222");
        interceptor.call(request, &ctx).await.unwrap();

        let spans = tracer.spans();
        assert_eq!(spans.len(), 1);
        let span = &spans[0];
        assert_eq!(span.operation, SERVER_OPERATION);
        assert_eq!(span.resource, GET_CART_METHOD);
        assert_eq!(span.kind, SpanKind::Server);
        assert_eq!(span.span_type, "custom");
        assert_eq!(span.trace_id, 1111);
        assert_eq!(span.parent_id, Some(2222));
        assert_eq!(span.error, None);
    }

    #[tokio::test]
    async fn test_malformed_headers_start_root_span() {
        let tracer = RecordingTracer::new();
        let interceptor = TracingInterceptor::new(
            CartService::new(InMemoryCartStore::new()),
            Arc::new(tracer.clone()),
        );

        let request = CartRequest::GetCart { user_id: "user_1".into() };
        let ctx = traced_context(GET_CART_METHOD, "not-a-number", "2222");
        let response = interceptor.call(request.clone(), &ctx).await;
        assert!(response.is_ok());

        interceptor.call(request, &CallContext::new(GET_CART_METHOD)).await.unwrap();

        let spans = tracer.spans();
        assert_eq!(spans.len(), 2);
        assert!(spans.iter().all(|s| s.parent_id.is_none()));
        assert_ne!(spans[0].trace_id, spans[1].trace_id);
    }

    #[tokio::test]
    async fn test_handler_error_marks_span_and_returns_cancelled() {
        let tracer = RecordingTracer::new();
        let mock = MockCartStore::new();
        mock.expect_add_item("user_1")
            .return_err(StoreError::Unavailable("connection reset".into()));
        let interceptor = TracingInterceptor::new(CartService::new(mock.clone()), Arc::new(tracer.clone()));

        let request = CartRequest::AddItem {
            user_id: "user_1".into(),
            item: CartItem::new("p1", 1),
        };
        let status = interceptor
            .call(request.clone(), &CallContext::new(request.method()))
            .await
            .unwrap_err();

        let expected_message = ServiceError::Store(StoreError::Unavailable("connection reset".into())).to_string();
        assert_eq!(status.code, StatusCode::Cancelled);
        assert_eq!(status.message, expected_message);

        let spans = tracer.spans();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].error.as_deref(), Some(expected_message.as_str()));
        mock.verify();
    }

    #[tokio::test]
    async fn test_tracer_failures_do_not_fail_the_call() {
        let tracer = RecordingTracer::new();
        let interceptor = TracingInterceptor::new(
            CartService::new(InMemoryCartStore::new()),
            Arc::new(tracer.clone()),
        );
        let request = CartRequest::AddItem {
            user_id: "user_1".into(),
            item: CartItem::new("p1", 1),
        };

        tracer.fail_on_start(true);
        let untraced = interceptor.call(request.clone(), &CallContext::new(request.method())).await;
        assert_eq!(untraced, Ok(CartResponse::Empty));

        tracer.fail_on_start(false);
        tracer.fail_on_close(true);
        let unclosed = interceptor.call(request.clone(), &CallContext::new(request.method())).await;
        assert_eq!(unclosed, Ok(CartResponse::Empty));

        assert!(tracer.spans().is_empty());
        let cart = interceptor.inner().store().get_cart("user_1").await.unwrap();
        assert_eq!(cart.quantity_of("p1"), Some(2));
    }

    struct StalledHandler;

    #[async_trait]
    impl CallHandler for StalledHandler {
        type Error = ServiceError;

        async fn call(&self, _request: CartRequest, _ctx: &CallContext) -> Result<CartResponse, ServiceError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(CartResponse::Empty)
        }
    }

    #[tokio::test]
    async fn test_dropped_call_still_closes_span() {
        let tracer = RecordingTracer::new();
        let interceptor = TracingInterceptor::new(StalledHandler, Arc::new(tracer.clone()));

        let request = CartRequest::GetCart { user_id: "user_1".into() };
        let ctx = CallContext::new(GET_CART_METHOD);
        let outcome = tokio::time::timeout(Duration::from_millis(20), interceptor.call(request, &ctx)).await;
        assert!(outcome.is_err(), "Handler should still be stalled");

        let spans = tracer.spans();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].error.as_deref(), Some("call cancelled before completion"));
    }
}
