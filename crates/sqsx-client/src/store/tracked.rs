//! Store calls as the client makes them: cancellable, timed, counted, and
//! with backend failures mapped to the fixed client-facing messages.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use tokio_util::sync::CancellationToken;

use sqsx_core::error::{Result, SqsxError, StoreOp};
use sqsx_core::PayloadPointer;

use super::{PayloadStore, StoreError};
use crate::cancel::run_cancellable;
use crate::obs::ClientMetrics;

#[derive(Clone)]
pub struct TrackedStore {
    inner: Arc<dyn PayloadStore>,
    metrics: Arc<ClientMetrics>,
}

impl TrackedStore {
    pub fn new(inner: Arc<dyn PayloadStore>, metrics: Arc<ClientMetrics>) -> Self {
        Self { inner, metrics }
    }

    pub fn inner(&self) -> &Arc<dyn PayloadStore> {
        &self.inner
    }

    pub async fn store(&self, body: &str, cancel: &CancellationToken) -> Result<PayloadPointer> {
        self.track(StoreOp::Store, cancel, self.inner.store_payload(body, cancel)).await
    }

    pub async fn store_with_key(&self, body: &str, key: &str, cancel: &CancellationToken) -> Result<PayloadPointer> {
        self.track(StoreOp::Store, cancel, self.inner.store_payload_with_key(body, key, cancel))
            .await
    }

    pub async fn read(&self, pointer: &PayloadPointer, cancel: &CancellationToken) -> Result<String> {
        self.track(StoreOp::Read, cancel, self.inner.read_payload(pointer, cancel)).await
    }

    pub async fn delete(&self, pointer: &PayloadPointer, cancel: &CancellationToken) -> Result<()> {
        self.track(StoreOp::Delete, cancel, self.inner.delete_payload(pointer, cancel)).await
    }

    async fn track<T, F>(&self, op: StoreOp, cancel: &CancellationToken, call: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, StoreError>>,
    {
        let label = op_label(op);
        let started = Instant::now();
        let res = run_cancellable(cancel, async {
            call.await.map_err(|e| match e {
                StoreError::Cancelled => SqsxError::Cancelled,
                other => SqsxError::payload_store(op, other),
            })
        })
        .await;

        self.metrics.store_duration.observe(&[("op", label)], started.elapsed());
        match &res {
            Ok(_) => self.metrics.store_calls.inc(&[("op", label), ("outcome", "ok")]),
            Err(SqsxError::Cancelled) => {
                self.metrics.store_calls.inc(&[("op", label), ("outcome", "cancelled")])
            }
            Err(e) => {
                tracing::error!(op = label, error = %e, "payload store call failed");
                self.metrics.store_calls.inc(&[("op", label), ("outcome", "error")]);
            }
        }
        res
    }
}

fn op_label(op: StoreOp) -> &'static str {
    match op {
        StoreOp::Store => "store",
        StoreOp::Read => "read",
        StoreOp::Delete => "delete",
    }
}
