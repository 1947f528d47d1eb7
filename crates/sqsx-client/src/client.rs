//! Extended queue client.
//!
//! Wraps a [`QueueTransport`] and a [`PayloadStore`]:
//! - send / send-batch: oversize bodies go to the store, the message carries a pointer
//! - receive: pointers are swapped back for the stored body, the pointer moves into the receipt handle
//! - delete / delete-batch: the handle is unwrapped and (optionally) the stored body removed;
//!   a batch never leaves a queue message behind whose payload was deleted
//! - change-visibility / -batch: the handle is unwrapped
//!
//! All state is immutable after construction; one client can be shared across
//! tasks behind an `Arc`.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use sqsx_core::error::{Result, SqsxError};
use sqsx_core::ExtendedClientConfiguration;

use crate::cancel::run_cancellable;
use crate::obs::ClientMetrics;
use crate::offload::OffloadEngine;
use crate::resolve::{prepare_visibility, request_marker_attribute, DeleteCleanup, ReceiveResolver};
use crate::store::{KeyGenerator, PayloadStore, TrackedStore};
use crate::transport::*;

pub struct ExtendedClient<Q> {
    inner: Arc<Q>,
    store: TrackedStore,
    cfg: ExtendedClientConfiguration,
    offload: OffloadEngine,
    resolver: ReceiveResolver,
    cleanup: DeleteCleanup,
    metrics: Arc<ClientMetrics>,
}

impl<Q: QueueTransport> ExtendedClient<Q> {
    /// Client whose payload keys come from the store's own key generator.
    pub fn new(inner: Arc<Q>, store: Arc<dyn PayloadStore>, cfg: ExtendedClientConfiguration) -> Self {
        Self::build(inner, store, cfg, None)
    }

    /// Client that names every offloaded payload with `keys`.
    pub fn with_key_generator(
        inner: Arc<Q>,
        store: Arc<dyn PayloadStore>,
        cfg: ExtendedClientConfiguration,
        keys: Arc<dyn KeyGenerator>,
    ) -> Self {
        Self::build(inner, store, cfg, Some(keys))
    }

    fn build(
        inner: Arc<Q>,
        store: Arc<dyn PayloadStore>,
        cfg: ExtendedClientConfiguration,
        keys: Option<Arc<dyn KeyGenerator>>,
    ) -> Self {
        let metrics = Arc::new(ClientMetrics::default());
        let store = TrackedStore::new(store, Arc::clone(&metrics));

        Self {
            offload: OffloadEngine::new(store.clone(), keys, cfg, Arc::clone(&metrics)),
            resolver: ReceiveResolver::new(store.clone(), Arc::clone(&metrics)),
            cleanup: DeleteCleanup::new(store.clone(), cfg),
            inner,
            store,
            cfg,
            metrics,
        }
    }

    /// The wrapped client, for every operation this client does not rewrite.
    pub fn inner(&self) -> &Q {
        &self.inner
    }

    pub fn config(&self) -> &ExtendedClientConfiguration {
        &self.cfg
    }

    pub fn metrics(&self) -> &ClientMetrics {
        &self.metrics
    }

    /// Queue-delete the first `cleaned` entries of a batch whose payloads are
    /// already gone. Runs even if the caller has cancelled: a queue message
    /// must not outlive its payload.
    async fn forget_cleaned(&self, mut req: DeleteMessageBatchRequest, cleaned: usize) {
        if cleaned == 0 {
            return;
        }
        req.entries.truncate(cleaned);
        match self.inner.delete_message_batch(req, &CancellationToken::new()).await {
            Ok(resp) if resp.failed.is_empty() => {}
            Ok(resp) => tracing::error!(
                failed = resp.failed.len(),
                "queue delete of cleaned batch entries partially failed"
            ),
            Err(e) => tracing::error!(error = %e, "queue delete of cleaned batch entries failed"),
        }
    }
}

#[async_trait]
impl<Q: QueueTransport> QueueTransport for ExtendedClient<Q> {
    async fn send_message(
        &self,
        req: SendMessageRequest,
        cancel: &CancellationToken,
    ) -> Result<SendMessageResponse> {
        let req = self.offload.rewrite_send(req, cancel).await?;
        run_cancellable(cancel, self.inner.send_message(req, cancel)).await
    }

    async fn send_message_batch(
        &self,
        req: SendMessageBatchRequest,
        cancel: &CancellationToken,
    ) -> Result<SendMessageBatchResponse> {
        let req = self.offload.rewrite_send_batch(req, cancel).await?;
        run_cancellable(cancel, self.inner.send_message_batch(req, cancel)).await
    }

    async fn receive_message(
        &self,
        mut req: ReceiveMessageRequest,
        cancel: &CancellationToken,
    ) -> Result<ReceiveMessageResponse> {
        if !self.cfg.large_payload_support() {
            return run_cancellable(cancel, self.inner.receive_message(req, cancel)).await;
        }

        request_marker_attribute(&mut req);
        let resp = run_cancellable(cancel, self.inner.receive_message(req, cancel)).await?;
        self.resolver.resolve(resp, cancel).await
    }

    async fn delete_message(
        &self,
        mut req: DeleteMessageRequest,
        cancel: &CancellationToken,
    ) -> Result<DeleteMessageResponse> {
        req.receipt_handle = self.cleanup.prepare_delete(req.receipt_handle, cancel).await?;
        run_cancellable(cancel, self.inner.delete_message(req, cancel)).await
    }

    async fn delete_message_batch(
        &self,
        mut req: DeleteMessageBatchRequest,
        cancel: &CancellationToken,
    ) -> Result<DeleteMessageBatchResponse> {
        // Every handle is decoded before the first store delete.
        let mut payloads = Vec::with_capacity(req.entries.len());
        for entry in req.entries.iter_mut() {
            let target = self
                .cleanup
                .unwrap_delete(std::mem::take(&mut entry.receipt_handle))?;
            entry.receipt_handle = target.receipt_handle.clone();
            payloads.push(target);
        }

        for (i, target) in payloads.iter().enumerate() {
            if let Err(e) = self.cleanup.delete_payload(target, cancel).await {
                self.forget_cleaned(req, i).await;
                return Err(e);
            }
        }
        run_cancellable(cancel, self.inner.delete_message_batch(req, cancel)).await
    }

    async fn change_message_visibility(
        &self,
        mut req: ChangeMessageVisibilityRequest,
        cancel: &CancellationToken,
    ) -> Result<ChangeMessageVisibilityResponse> {
        req.receipt_handle = prepare_visibility(req.receipt_handle)?;
        run_cancellable(cancel, self.inner.change_message_visibility(req, cancel)).await
    }

    async fn change_message_visibility_batch(
        &self,
        mut req: ChangeMessageVisibilityBatchRequest,
        cancel: &CancellationToken,
    ) -> Result<ChangeMessageVisibilityBatchResponse> {
        for entry in req.entries.iter_mut() {
            entry.receipt_handle = prepare_visibility(std::mem::take(&mut entry.receipt_handle))?;
        }
        run_cancellable(cancel, self.inner.change_message_visibility_batch(req, cancel)).await
    }

    /// Close the transport, then the store. Both are attempted; the first
    /// failure is returned.
    async fn close(&self) -> Result<()> {
        let transport = self.inner.close().await;
        let store = self
            .store
            .inner()
            .close()
            .await
            .map_err(|e| SqsxError::Internal(format!("payload store close failed: {e}")));
        transport.and(store)
    }
}
