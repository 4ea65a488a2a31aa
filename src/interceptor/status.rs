//! Caller-visible call status and the mapping from internal errors onto it.

use crate::service::ServiceError;
use crate::store::StoreError;
use std::fmt;
use thiserror::Error;

/// Status codes a caller can observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    Cancelled,
    /// The client received a response of the wrong shape.
    Internal,
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StatusCode::Cancelled => "CANCELLED",
            StatusCode::Internal => "INTERNAL",
        };
        f.write_str(label)
    }
}

/// Error returned to callers once a failure has crossed the interceptor.
///
/// Only the message of the original error survives; its type does not.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("status: {code}, message: \"{message}\"")]
pub struct Status {
    pub code: StatusCode,
    pub message: String,
}

impl Status {
    pub fn new(code: StatusCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Maps a handler error onto the status code the caller sees.
pub trait ToStatusCode {
    fn status_code(&self) -> StatusCode;
}

// Every handler failure is reported as CANCELLED, whatever its cause.
impl ToStatusCode for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Store(StoreError::Unavailable(_)) => StatusCode::Cancelled,
            ServiceError::Store(StoreError::Corrupt { .. }) => StatusCode::Cancelled,
            ServiceError::Store(StoreError::QuantityOverflow { .. }) => StatusCode::Cancelled,
        }
    }
}

impl ToStatusCode for Status {
    fn status_code(&self) -> StatusCode {
        self.code
    }
}
