use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use sqsx_core::error::Result;
use sqsx_core::offload::{plan_offload, rewrite_offloaded, OffloadedMessage};
use sqsx_core::size::message_size;
use sqsx_core::{ExtendedClientConfiguration, MessageAttributes};

use crate::obs::ClientMetrics;
use crate::store::{KeyGenerator, TrackedStore};
use crate::transport::{SendMessageBatchRequest, SendMessageRequest};

/// Decides which outgoing messages go to the store and rewrites them.
pub struct OffloadEngine {
    store: TrackedStore,
    /// Overrides the store's own key generator when set.
    keys: Option<Arc<dyn KeyGenerator>>,
    cfg: ExtendedClientConfiguration,
    metrics: Arc<ClientMetrics>,
}

impl OffloadEngine {
    pub fn new(
        store: TrackedStore,
        keys: Option<Arc<dyn KeyGenerator>>,
        cfg: ExtendedClientConfiguration,
        metrics: Arc<ClientMetrics>,
    ) -> Self {
        Self { store, keys, cfg, metrics }
    }

    /// Store `body` and return the message to send in its place.
    ///
    /// Callers must have validated the message with [`plan_offload`] first.
    pub async fn offload(
        &self,
        body: &str,
        attributes: &MessageAttributes,
        cancel: &CancellationToken,
    ) -> Result<OffloadedMessage> {
        let pointer = match &self.keys {
            Some(keys) => self.store.store_with_key(body, &keys.generate_key(), cancel).await?,
            None => self.store.store(body, cancel).await?,
        };
        tracing::debug!(
            location = %pointer.location,
            key = %pointer.key,
            size = body.len(),
            threshold = self.cfg.payload_size_threshold(),
            "payload offloaded"
        );
        rewrite_offloaded(body, attributes, &pointer)
    }

    pub async fn rewrite_send(
        &self,
        mut req: SendMessageRequest,
        cancel: &CancellationToken,
    ) -> Result<SendMessageRequest> {
        if !plan_offload(&req.message_body, &req.message_attributes, &self.cfg)? {
            return Ok(req);
        }

        let out = self.offload(&req.message_body, &req.message_attributes, cancel).await?;
        req.message_body = out.body;
        req.message_attributes = out.attributes;
        self.metrics.offloaded.inc(&[("op", "send")]);
        Ok(req)
    }

    /// Every entry is validated before the first store write, so a bad entry
    /// fails the batch without leaving earlier payloads behind.
    pub async fn rewrite_send_batch(
        &self,
        mut req: SendMessageBatchRequest,
        cancel: &CancellationToken,
    ) -> Result<SendMessageBatchRequest> {
        let mut plan = Vec::with_capacity(req.entries.len());
        for entry in &req.entries {
            plan.push(plan_offload(&entry.message_body, &entry.message_attributes, &self.cfg)?);
        }

        for (entry, offload) in req.entries.iter_mut().zip(plan) {
            if !offload {
                tracing::trace!(
                    id = %entry.id,
                    size = message_size(&entry.message_body, &entry.message_attributes),
                    "batch entry stays inline"
                );
                continue;
            }
            let out = self.offload(&entry.message_body, &entry.message_attributes, cancel).await?;
            entry.message_body = out.body;
            entry.message_attributes = out.attributes;
            self.metrics.offloaded.inc(&[("op", "send_batch")]);
        }
        Ok(req)
    }
}
