//! # Recording Tracer
//!
//! In-memory [`Tracer`] that keeps every closed span so tests can assert on
//! parent linkage and error status. It can also be told to fail its own
//! bookkeeping, to check that tracing trouble never leaks into call results.

use super::{new_id, ActiveSpan, SpanKind, SpanOptions, TraceError, Tracer};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// A span as it looked when it was closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinishedSpan {
    pub operation: &'static str,
    pub resource: String,
    pub kind: SpanKind,
    pub span_type: &'static str,
    pub trace_id: u64,
    pub span_id: u64,
    /// `None` for root spans.
    pub parent_id: Option<u64>,
    /// Exception message, if the span was marked as failed.
    pub error: Option<String>,
}

#[derive(Debug, Default)]
struct Shared {
    finished: Mutex<Vec<FinishedSpan>>,
    fail_start: AtomicBool,
    fail_close: AtomicBool,
}

#[derive(Debug, Clone, Default)]
pub struct RecordingTracer {
    shared: Arc<Shared>,
}

impl RecordingTracer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spans closed so far, in closing order.
    pub fn spans(&self) -> Vec<FinishedSpan> {
        self.shared
            .finished
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Makes `start_active` fail while `fail` is set.
    pub fn fail_on_start(&self, fail: bool) {
        self.shared.fail_start.store(fail, Ordering::SeqCst);
    }

    /// Makes `set_exception` and `close` fail while `fail` is set. Failed
    /// closes are not recorded.
    pub fn fail_on_close(&self, fail: bool) {
        self.shared.fail_close.store(fail, Ordering::SeqCst);
    }
}

impl Tracer for RecordingTracer {
    fn start_active(&self, options: SpanOptions) -> Result<Box<dyn ActiveSpan>, TraceError> {
        if self.shared.fail_start.load(Ordering::SeqCst) {
            return Err(TraceError::Backend("start refused".to_string()));
        }
        let span = FinishedSpan {
            operation: options.operation,
            resource: options.resource,
            kind: options.kind,
            span_type: options.span_type,
            trace_id: options.parent.map_or_else(new_id, |p| p.trace_id),
            span_id: new_id(),
            parent_id: options.parent.map(|p| p.parent_id),
            error: None,
        };
        Ok(Box::new(RecordingSpan {
            span,
            shared: self.shared.clone(),
        }))
    }
}

struct RecordingSpan {
    span: FinishedSpan,
    shared: Arc<Shared>,
}

impl RecordingSpan {
    fn check(&self) -> Result<(), TraceError> {
        if self.shared.fail_close.load(Ordering::SeqCst) {
            Err(TraceError::Backend("bookkeeping refused".to_string()))
        } else {
            Ok(())
        }
    }
}

impl ActiveSpan for RecordingSpan {
    fn trace_id(&self) -> u64 {
        self.span.trace_id
    }

    fn span_id(&self) -> u64 {
        self.span.span_id
    }

    fn set_exception(&mut self, message: &str) -> Result<(), TraceError> {
        self.check()?;
        self.span.error = Some(message.to_string());
        Ok(())
    }

    fn close(self: Box<Self>) -> Result<(), TraceError> {
        self.check()?;
        let RecordingSpan { span, shared } = *self;
        shared
            .finished
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(span);
        Ok(())
    }
}
