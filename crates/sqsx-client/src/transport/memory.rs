//! In-process queue (no network).
//!
//! Behaves like the real service where the extended client cares: messages
//! are handed out with fresh receipt handles, delete and visibility calls
//! must present a handle the queue issued, and the attribute filter on
//! receive is honored. Tests read the raw wire messages back through
//! [`InMemoryQueue::pending`].

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use sqsx_core::constants::MAX_TRANSPORT_ATTRIBUTES;
use sqsx_core::error::{Result, SqsxError};
use sqsx_core::MessageAttributes;

use super::types::*;
use super::QueueTransport;

const MAX_BATCH_ENTRIES: usize = 10;

/// A message as stored on the queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMessage {
    pub message_id: String,
    pub body: String,
    pub message_attributes: MessageAttributes,
}

#[derive(Default)]
struct QueueState {
    pending: VecDeque<StoredMessage>,
    in_flight: HashMap<String, StoredMessage>,
}

#[derive(Default)]
pub struct InMemoryQueue {
    queues: DashMap<String, QueueState>,
    closed: AtomicBool,
}

impl InMemoryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages waiting to be received, in queue order.
    pub fn pending(&self, queue_url: &str) -> Vec<StoredMessage> {
        self.queues
            .get(queue_url)
            .map(|q| q.pending.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of received-but-not-deleted messages.
    pub fn in_flight_count(&self, queue_url: &str) -> usize {
        self.queues.get(queue_url).map(|q| q.in_flight.len()).unwrap_or(0)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Relaxed)
    }

    fn enqueue(&self, queue_url: &str, body: String, message_attributes: MessageAttributes) -> Result<String> {
        if message_attributes.len() > MAX_TRANSPORT_ATTRIBUTES {
            return Err(SqsxError::Transport(format!(
                "too many message attributes: {} (max {MAX_TRANSPORT_ATTRIBUTES})",
                message_attributes.len()
            )));
        }
        let message_id = Uuid::new_v4().to_string();
        self.queues
            .entry(queue_url.to_string())
            .or_insert_with(QueueState::default)
            .pending
            .push_back(StoredMessage {
                message_id: message_id.clone(),
                body,
                message_attributes,
            });
        Ok(message_id)
    }

    fn remove_in_flight(&self, queue_url: &str, receipt_handle: &str) -> Result<StoredMessage> {
        self.queues
            .get_mut(queue_url)
            .and_then(|mut q| q.in_flight.remove(receipt_handle))
            .ok_or_else(|| invalid_handle(receipt_handle))
    }

    fn change_visibility(&self, queue_url: &str, receipt_handle: &str, visibility_timeout: i32) -> Result<()> {
        let mut q = self
            .queues
            .get_mut(queue_url)
            .ok_or_else(|| invalid_handle(receipt_handle))?;
        if !q.in_flight.contains_key(receipt_handle) {
            return Err(invalid_handle(receipt_handle));
        }
        // Timeout 0 makes the message visible again right away.
        if visibility_timeout == 0 {
            let msg = q.in_flight.remove(receipt_handle);
            if let Some(msg) = msg {
                q.pending.push_front(msg);
            }
        }
        Ok(())
    }
}

fn invalid_handle(receipt_handle: &str) -> SqsxError {
    SqsxError::Transport(format!("receipt handle is invalid: {receipt_handle}"))
}

fn check_batch_len(len: usize) -> Result<()> {
    if len == 0 {
        return Err(SqsxError::Transport("batch request contains no entries".into()));
    }
    if len > MAX_BATCH_ENTRIES {
        return Err(SqsxError::Transport(format!(
            "batch request contains {len} entries (max {MAX_BATCH_ENTRIES})"
        )));
    }
    Ok(())
}

fn batch_error(id: String, err: SqsxError) -> BatchResultErrorEntry {
    BatchResultErrorEntry {
        id,
        code: err.code().as_str().to_string(),
        message: Some(err.to_string()),
        sender_fault: true,
    }
}

fn filter_attributes(attributes: &MessageAttributes, names: &[String]) -> MessageAttributes {
    if names.iter().any(|n| n == "All" || n == ".*") {
        return attributes.clone();
    }
    attributes
        .iter()
        .filter(|(name, _)| names.contains(*name))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}

#[async_trait]
impl QueueTransport for InMemoryQueue {
    async fn send_message(
        &self,
        req: SendMessageRequest,
        _cancel: &CancellationToken,
    ) -> Result<SendMessageResponse> {
        let message_id = self.enqueue(&req.queue_url, req.message_body, req.message_attributes)?;
        Ok(SendMessageResponse {
            message_id,
            sequence_number: None,
        })
    }

    async fn send_message_batch(
        &self,
        req: SendMessageBatchRequest,
        _cancel: &CancellationToken,
    ) -> Result<SendMessageBatchResponse> {
        check_batch_len(req.entries.len())?;

        let mut out = SendMessageBatchResponse::default();
        for e in req.entries {
            match self.enqueue(&req.queue_url, e.message_body, e.message_attributes) {
                Ok(message_id) => out.successful.push(SendMessageBatchResultEntry { id: e.id, message_id }),
                Err(err) => out.failed.push(batch_error(e.id, err)),
            }
        }
        Ok(out)
    }

    async fn receive_message(
        &self,
        req: ReceiveMessageRequest,
        _cancel: &CancellationToken,
    ) -> Result<ReceiveMessageResponse> {
        let max = req.max_number_of_messages.unwrap_or(1).clamp(1, MAX_BATCH_ENTRIES as i32) as usize;

        let Some(mut q) = self.queues.get_mut(&req.queue_url) else {
            return Ok(ReceiveMessageResponse::default());
        };

        let mut messages = Vec::new();
        while messages.len() < max {
            let Some(stored) = q.pending.pop_front() else { break; };
            let receipt_handle = format!("AQEB{}", Uuid::new_v4().simple());
            messages.push(Message {
                message_id: stored.message_id.clone(),
                receipt_handle: receipt_handle.clone(),
                body: stored.body.clone(),
                message_attributes: filter_attributes(&stored.message_attributes, &req.message_attribute_names),
                attributes: HashMap::new(),
            });
            q.in_flight.insert(receipt_handle, stored);
        }
        Ok(ReceiveMessageResponse { messages })
    }

    async fn delete_message(
        &self,
        req: DeleteMessageRequest,
        _cancel: &CancellationToken,
    ) -> Result<DeleteMessageResponse> {
        self.remove_in_flight(&req.queue_url, &req.receipt_handle)?;
        Ok(DeleteMessageResponse {})
    }

    async fn delete_message_batch(
        &self,
        req: DeleteMessageBatchRequest,
        _cancel: &CancellationToken,
    ) -> Result<DeleteMessageBatchResponse> {
        check_batch_len(req.entries.len())?;

        let mut out = DeleteMessageBatchResponse::default();
        for e in req.entries {
            match self.remove_in_flight(&req.queue_url, &e.receipt_handle) {
                Ok(_) => out.successful.push(e.id),
                Err(err) => out.failed.push(batch_error(e.id, err)),
            }
        }
        Ok(out)
    }

    async fn change_message_visibility(
        &self,
        req: ChangeMessageVisibilityRequest,
        _cancel: &CancellationToken,
    ) -> Result<ChangeMessageVisibilityResponse> {
        self.change_visibility(&req.queue_url, &req.receipt_handle, req.visibility_timeout)?;
        Ok(ChangeMessageVisibilityResponse {})
    }

    async fn change_message_visibility_batch(
        &self,
        req: ChangeMessageVisibilityBatchRequest,
        _cancel: &CancellationToken,
    ) -> Result<ChangeMessageVisibilityBatchResponse> {
        check_batch_len(req.entries.len())?;

        let mut out = ChangeMessageVisibilityBatchResponse::default();
        for e in req.entries {
            match self.change_visibility(&req.queue_url, &e.receipt_handle, e.visibility_timeout) {
                Ok(()) => out.successful.push(e.id),
                Err(err) => out.failed.push(batch_error(e.id, err)),
            }
        }
        Ok(out)
    }

    async fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::Relaxed);
        Ok(())
    }
}
