//! Queue transport capability.
//!
//! Only the operations the extended client rewrites are part of this trait.
//! Everything else on a native client (queue lifecycle, attributes,
//! permissions, ...) is reached through [`crate::ExtendedClient::inner`].

pub mod memory;
pub mod types;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use sqsx_core::error::Result;

pub use memory::{InMemoryQueue, StoredMessage};
pub use types::*;

/// The mutating queue operations, as exposed by the underlying client.
///
/// Implementations report their own failures as `SqsxError::Transport`; the
/// extended client passes them through untouched.
#[async_trait]
pub trait QueueTransport: Send + Sync {
    async fn send_message(
        &self,
        req: SendMessageRequest,
        cancel: &CancellationToken,
    ) -> Result<SendMessageResponse>;

    async fn send_message_batch(
        &self,
        req: SendMessageBatchRequest,
        cancel: &CancellationToken,
    ) -> Result<SendMessageBatchResponse>;

    async fn receive_message(
        &self,
        req: ReceiveMessageRequest,
        cancel: &CancellationToken,
    ) -> Result<ReceiveMessageResponse>;

    async fn delete_message(
        &self,
        req: DeleteMessageRequest,
        cancel: &CancellationToken,
    ) -> Result<DeleteMessageResponse>;

    async fn delete_message_batch(
        &self,
        req: DeleteMessageBatchRequest,
        cancel: &CancellationToken,
    ) -> Result<DeleteMessageBatchResponse>;

    async fn change_message_visibility(
        &self,
        req: ChangeMessageVisibilityRequest,
        cancel: &CancellationToken,
    ) -> Result<ChangeMessageVisibilityResponse>;

    async fn change_message_visibility_batch(
        &self,
        req: ChangeMessageVisibilityBatchRequest,
        cancel: &CancellationToken,
    ) -> Result<ChangeMessageVisibilityBatchResponse>;

    /// Release client resources. Defaults to a no-op.
    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
