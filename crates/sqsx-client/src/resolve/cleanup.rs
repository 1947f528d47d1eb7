use tokio_util::sync::CancellationToken;

use sqsx_core::error::Result;
use sqsx_core::protocol::receipt::{decode_framed, is_store_framed, strip_pointer};
use sqsx_core::{ExtendedClientConfiguration, PayloadPointer};

use crate::store::TrackedStore;

/// A delete as it will reach the transport, plus the stored payload (if any)
/// that has to go first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteTarget {
    pub receipt_handle: String,
    pub payload: Option<PayloadPointer>,
}

/// Delete-side handling of framed receipt handles.
pub struct DeleteCleanup {
    store: TrackedStore,
    cfg: ExtendedClientConfiguration,
}

impl DeleteCleanup {
    pub fn new(store: TrackedStore, cfg: ExtendedClientConfiguration) -> Self {
        Self { store, cfg }
    }

    /// Split a handle into the transport handle and the payload to clean up.
    /// No I/O.
    pub fn unwrap_delete(&self, receipt_handle: String) -> Result<DeleteTarget> {
        if !self.cfg.large_payload_support() || !is_store_framed(&receipt_handle) {
            return Ok(DeleteTarget {
                receipt_handle,
                payload: None,
            });
        }

        let framed = decode_framed(&receipt_handle)?;
        Ok(DeleteTarget {
            receipt_handle: framed.original,
            payload: self.cfg.cleanup_on_delete().then_some(framed.pointer),
        })
    }

    /// Delete the stored payload of `target`, if it has one.
    pub async fn delete_payload(&self, target: &DeleteTarget, cancel: &CancellationToken) -> Result<()> {
        let Some(pointer) = &target.payload else {
            return Ok(());
        };
        self.store.delete(pointer, cancel).await?;
        tracing::debug!(
            location = %pointer.location,
            key = %pointer.key,
            "stored payload deleted"
        );
        Ok(())
    }

    /// Handle to forward to the transport for a single delete.
    ///
    /// With cleanup enabled the stored payload is deleted first; a store
    /// failure is returned and the queue message is left in place.
    pub async fn prepare_delete(&self, receipt_handle: String, cancel: &CancellationToken) -> Result<String> {
        let target = self.unwrap_delete(receipt_handle)?;
        self.delete_payload(&target, cancel).await?;
        Ok(target.receipt_handle)
    }
}

/// Handle to forward for a visibility change. Never touches the store.
pub fn prepare_visibility(receipt_handle: String) -> Result<String> {
    if is_store_framed(&receipt_handle) {
        strip_pointer(&receipt_handle)
    } else {
        Ok(receipt_handle)
    }
}
