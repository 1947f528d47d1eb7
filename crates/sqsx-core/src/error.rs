//! Shared error type across sqsx crates.

use std::fmt;

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Outgoing message rejected before any I/O.
    InvalidMessage,
    /// Payload store put/get/delete failed.
    PayloadStore,
    /// Body or receipt handle does not carry a usable pointer.
    InvalidPointer,
    /// Underlying queue transport failed.
    Transport,
    /// Operation cancelled by the caller.
    Cancelled,
    /// Configuration rejected.
    BadConfig,
    /// Internal error.
    Internal,
}

impl ErrorCode {
    /// String representation used in logs and test vectors.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidMessage => "INVALID_MESSAGE",
            ErrorCode::PayloadStore => "PAYLOAD_STORE",
            ErrorCode::InvalidPointer => "INVALID_POINTER",
            ErrorCode::Transport => "TRANSPORT",
            ErrorCode::Cancelled => "CANCELLED",
            ErrorCode::BadConfig => "BAD_CONFIG",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Payload store operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    Store,
    Read,
    Delete,
}

impl fmt::Display for StoreOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            StoreOp::Store => "failed to store the message content in the payload store",
            StoreOp::Read => "failed to read the payload from the payload store",
            StoreOp::Delete => "failed to delete the payload from the payload store",
        };
        f.write_str(msg)
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, SqsxError>;

/// Unified error type used by core and client.
#[derive(Debug, Error)]
pub enum SqsxError {
    #[error("invalid message: {0}")]
    InvalidMessage(String),
    #[error("{op}: {reason}")]
    PayloadStore { op: StoreOp, reason: String },
    #[error("invalid pointer: {0}")]
    InvalidPointer(String),
    #[error("transport: {0}")]
    Transport(String),
    #[error("cancelled")]
    Cancelled,
    #[error("bad config: {0}")]
    BadConfig(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl SqsxError {
    /// Wrap a store backend failure with the fixed message for `op`.
    pub fn payload_store(op: StoreOp, reason: impl fmt::Display) -> Self {
        SqsxError::PayloadStore {
            op,
            reason: reason.to_string(),
        }
    }

    /// Map internal error to a stable client-facing code.
    pub fn code(&self) -> ErrorCode {
        match self {
            SqsxError::InvalidMessage(_) => ErrorCode::InvalidMessage,
            SqsxError::PayloadStore { .. } => ErrorCode::PayloadStore,
            SqsxError::InvalidPointer(_) => ErrorCode::InvalidPointer,
            SqsxError::Transport(_) => ErrorCode::Transport,
            SqsxError::Cancelled => ErrorCode::Cancelled,
            SqsxError::BadConfig(_) => ErrorCode::BadConfig,
            SqsxError::Internal(_) => ErrorCode::Internal,
        }
    }
}
