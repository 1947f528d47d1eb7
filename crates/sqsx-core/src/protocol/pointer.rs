//! Structured pointer body (JSON).
//!
//! Field names are fixed by peers already on the wire:
//! `{"BucketName":"<location>","Key":"<key>"}`, single line, in that order.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SqsxError};

/// Where an offloaded payload lives.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PayloadPointer {
    /// Store location (bucket name).
    #[serde(rename = "BucketName")]
    pub location: String,
    /// Object key within the location.
    #[serde(rename = "Key")]
    pub key: String,
}

impl PayloadPointer {
    pub fn new(location: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            key: key.into(),
        }
    }

    /// Serialize into the replacement message body.
    pub fn to_body(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| SqsxError::Internal(format!("pointer encode failed: {e}")))
    }

    /// Parse a message body as a pointer.
    ///
    /// Any body that is not exactly a pointer object is rejected; callers on
    /// the receive path treat that as "not offloaded" rather than a failure.
    pub fn from_body(body: &str) -> Result<Self> {
        serde_json::from_str(body)
            .map_err(|e| SqsxError::InvalidPointer(format!("body is not a payload pointer: {e}")))
    }
}
