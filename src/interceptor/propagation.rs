//! Trace context propagation through request metadata.

use crate::service::Metadata;

/// Header carrying the trace id of the calling span.
pub const TRACE_ID_HEADER: &str = "x-datadog-trace-id";
/// Header carrying the span id of the calling span.
pub const PARENT_ID_HEADER: &str = "x-datadog-parent-id";

/// Identity of a remote parent span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpanContext {
    pub trace_id: u64,
    pub parent_id: u64,
}

impl SpanContext {
    pub fn new(trace_id: u64, parent_id: u64) -> Self {
        Self { trace_id, parent_id }
    }

    /// Reads the parent linkage from `metadata`.
    ///
    /// Both headers must be present and hold non-zero decimal ids; otherwise
    /// there is no usable parent and the caller starts a root span.
    pub fn extract(metadata: &Metadata) -> Option<Self> {
        let trace_id = parse_id(metadata.get(TRACE_ID_HEADER)?)?;
        let parent_id = parse_id(metadata.get(PARENT_ID_HEADER)?)?;
        Some(Self { trace_id, parent_id })
    }

    /// Writes this context into `metadata` for an outgoing call.
    pub fn inject(&self, metadata: &mut Metadata) {
        metadata.insert(TRACE_ID_HEADER, self.trace_id.to_string());
        metadata.insert(PARENT_ID_HEADER, self.parent_id.to_string());
    }
}

fn parse_id(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok().filter(|id| *id != 0)
}
