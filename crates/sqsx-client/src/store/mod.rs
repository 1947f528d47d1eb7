//! Payload store capability and key generation.
//!
//! The extended client never talks to a blob service directly. It goes
//! through [`PayloadStore`], and maps every [`StoreError`] to
//! `SqsxError::PayloadStore` with a fixed per-operation message.

pub mod keys;
pub mod memory;
pub mod tracked;
#[cfg(feature = "s3")]
pub mod s3;

use async_trait::async_trait;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use sqsx_core::PayloadPointer;

pub use keys::{FixedKeyGenerator, KeyGenerator, UuidKeyGenerator};
pub use memory::InMemoryPayloadStore;
pub use tracked::TrackedStore;
#[cfg(feature = "s3")]
pub use s3::S3PayloadStore;

/// Failure reported by a store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no payload at {location}/{key}")]
    NotFound { location: String, key: String },
    #[error("backend: {0}")]
    Backend(String),
    #[error("cancelled")]
    Cancelled,
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Put/get/delete of payload bodies by pointer.
#[async_trait]
pub trait PayloadStore: Send + Sync {
    /// Store `body` under a key from the store's key generator.
    async fn store_payload(&self, body: &str, cancel: &CancellationToken) -> StoreResult<PayloadPointer>;

    /// Store `body` under an explicit key.
    async fn store_payload_with_key(
        &self,
        body: &str,
        key: &str,
        cancel: &CancellationToken,
    ) -> StoreResult<PayloadPointer>;

    async fn read_payload(&self, pointer: &PayloadPointer, cancel: &CancellationToken) -> StoreResult<String>;

    async fn delete_payload(&self, pointer: &PayloadPointer, cancel: &CancellationToken) -> StoreResult<()>;

    /// Release backend resources. Defaults to a no-op.
    async fn close(&self) -> StoreResult<()> {
        Ok(())
    }
}
