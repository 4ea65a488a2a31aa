//! Span backend capability and the default `tracing`-based implementation.

use super::SpanContext;
use thiserror::Error;
use tracing::{debug, error, field, info_span, Span};
use uuid::Uuid;

/// Operation name given to every span opened around an inbound call.
pub const SERVER_OPERATION: &str = "grpc.server";

/// Errors from span bookkeeping. These never fail a call.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TraceError {
    #[error("Tracer backend error: {0}")]
    Backend(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    Server,
}

impl SpanKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpanKind::Server => "server",
        }
    }
}

/// Everything needed to open a span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanOptions {
    pub operation: &'static str,
    /// The call's logical operation, e.g. its fully qualified method name.
    pub resource: String,
    pub kind: SpanKind,
    pub span_type: &'static str,
    /// Remote parent; `None` starts a new trace.
    pub parent: Option<SpanContext>,
}

impl SpanOptions {
    /// Options for a server-side span of a custom request type.
    pub fn server(resource: impl Into<String>, parent: Option<SpanContext>) -> Self {
        Self {
            operation: SERVER_OPERATION,
            resource: resource.into(),
            kind: SpanKind::Server,
            span_type: "custom",
            parent,
        }
    }
}

/// "Start active span / set exception / close" capability of a tracing backend.
pub trait Tracer: Send + Sync {
    fn start_active(&self, options: SpanOptions) -> Result<Box<dyn ActiveSpan>, TraceError>;
}

/// A span that has been started and not yet closed.
pub trait ActiveSpan: Send {
    fn trace_id(&self) -> u64;

    fn span_id(&self) -> u64;

    /// `tracing` span to enter while the traced work runs.
    fn tracing_span(&self) -> Span {
        Span::none()
    }

    /// Marks the span as failed with `message`.
    fn set_exception(&mut self, message: &str) -> Result<(), TraceError>;

    fn close(self: Box<Self>) -> Result<(), TraceError>;
}

/// Generates a fresh non-zero 64-bit id.
pub fn new_id() -> u64 {
    Uuid::new_v4().as_u64_pair().0.max(1)
}

/// Default tracer: reports spans as `tracing` spans so they reach whatever
/// subscriber the process installed.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTracer;

impl Tracer for LogTracer {
    fn start_active(&self, options: SpanOptions) -> Result<Box<dyn ActiveSpan>, TraceError> {
        let trace_id = options.parent.map_or_else(new_id, |p| p.trace_id);
        let span_id = new_id();
        let span = info_span!(
            "grpc.server",
            operation = options.operation,
            resource = %options.resource,
            trace_id,
            span_id,
            parent_id = field::Empty,
            span_kind = options.kind.as_str(),
            span_type = options.span_type,
            error = field::Empty,
        );
        if let Some(parent) = options.parent {
            span.record("parent_id", parent.parent_id);
        }
        Ok(Box::new(LogSpan { span, trace_id, span_id }))
    }
}

struct LogSpan {
    span: Span,
    trace_id: u64,
    span_id: u64,
}

impl ActiveSpan for LogSpan {
    fn trace_id(&self) -> u64 {
        self.trace_id
    }

    fn span_id(&self) -> u64 {
        self.span_id
    }

    fn tracing_span(&self) -> Span {
        self.span.clone()
    }

    fn set_exception(&mut self, message: &str) -> Result<(), TraceError> {
        self.span.record("error", message);
        error!(parent: &self.span, error = message, "Call failed");
        Ok(())
    }

    fn close(self: Box<Self>) -> Result<(), TraceError> {
        debug!(parent: &self.span, "Span closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_tracer_continues_remote_trace() {
        let parent = SpanContext::new(77, 5);
        let span = LogTracer
            .start_active(SpanOptions::server("/svc/Method", Some(parent)))
            .unwrap();

        assert_eq!(span.trace_id(), 77);
        assert_ne!(span.span_id(), 0);
        span.close().unwrap();
    }

    #[test]
    fn test_log_tracer_root_span_gets_fresh_trace() {
        let a = LogTracer.start_active(SpanOptions::server("/svc/Method", None)).unwrap();
        let b = LogTracer.start_active(SpanOptions::server("/svc/Method", None)).unwrap();

        assert_ne!(a.trace_id(), 0);
        assert_ne!(a.trace_id(), b.trace_id());
    }
}
