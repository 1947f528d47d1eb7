use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use sqsx_core::constants::RESERVED_ATTRIBUTE_NAME;
use sqsx_core::error::Result;
use sqsx_core::protocol::receipt::embed_pointer;
use sqsx_core::PayloadPointer;

use crate::obs::ClientMetrics;
use crate::store::TrackedStore;
use crate::transport::{Message, ReceiveMessageRequest, ReceiveMessageResponse};

/// Ask the transport to return the marker attribute (idempotent).
pub fn request_marker_attribute(req: &mut ReceiveMessageRequest) {
    if !req.message_attribute_names.iter().any(|n| n == RESERVED_ATTRIBUTE_NAME) {
        req.message_attribute_names.push(RESERVED_ATTRIBUTE_NAME.to_string());
    }
}

/// Restores offloaded bodies on received messages.
pub struct ReceiveResolver {
    store: TrackedStore,
    metrics: Arc<ClientMetrics>,
}

impl ReceiveResolver {
    pub fn new(store: TrackedStore, metrics: Arc<ClientMetrics>) -> Self {
        Self { store, metrics }
    }

    /// Resolve every marked message, in order.
    ///
    /// A marked message whose body is not a usable pointer is returned as the
    /// transport delivered it. Store read failures fail the whole call.
    pub async fn resolve(
        &self,
        mut resp: ReceiveMessageResponse,
        cancel: &CancellationToken,
    ) -> Result<ReceiveMessageResponse> {
        for msg in resp.messages.iter_mut() {
            self.resolve_message(msg, cancel).await?;
        }
        Ok(resp)
    }

    async fn resolve_message(&self, msg: &mut Message, cancel: &CancellationToken) -> Result<()> {
        if !msg.message_attributes.contains_key(RESERVED_ATTRIBUTE_NAME) {
            return Ok(());
        }

        let Some((pointer, receipt_handle)) = self.decode(msg) else {
            self.metrics.pointer_decode_failures.inc(&[]);
            return Ok(());
        };

        let body = self.store.read(&pointer, cancel).await?;
        tracing::debug!(
            message_id = %msg.message_id,
            location = %pointer.location,
            key = %pointer.key,
            size = body.len(),
            "payload resolved"
        );

        msg.body = body;
        msg.receipt_handle = receipt_handle;
        msg.message_attributes.remove(RESERVED_ATTRIBUTE_NAME);
        self.metrics.resolved.inc(&[]);
        Ok(())
    }

    /// Pointer and framed receipt handle, or `None` (logged) if the message
    /// cannot be resolved.
    fn decode(&self, msg: &Message) -> Option<(PayloadPointer, String)> {
        let pointer = match PayloadPointer::from_body(&msg.body) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(message_id = %msg.message_id, error = %e, "marked message body is not a payload pointer");
                return None;
            }
        };
        match embed_pointer(&msg.receipt_handle, &pointer) {
            Ok(handle) => Some((pointer, handle)),
            Err(e) => {
                tracing::warn!(message_id = %msg.message_id, error = %e, "payload pointer cannot be framed into the receipt handle");
                None
            }
        }
    }
}
