#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]


use std::sync::atomic::Ordering;

use tokio_util::sync::CancellationToken;

use fixtures::{disabled, enabled, Harness, QUEUE};
use sqsx_client::transport::{
    ChangeMessageVisibilityBatchRequest, ChangeMessageVisibilityBatchRequestEntry,
    ChangeMessageVisibilityRequest, DeleteMessageBatchRequest, DeleteMessageBatchRequestEntry,
    DeleteMessageRequest, Message, ReceiveMessageRequest, SendMessageRequest,
};
use sqsx_client::QueueTransport;
use sqsx_core::constants::{KEY_MARKER, LOCATION_MARKER};
use sqsx_core::error::{ErrorCode, StoreOp};
use sqsx_core::SqsxError;

/// Send one message per body through the extended client and receive them all.
async fn deliver(h: &Harness, bodies: &[String]) -> Vec<Message> {
    let cancel = CancellationToken::new();
    for body in bodies {
        h.client
            .send_message(SendMessageRequest::new(QUEUE, body.clone()), &cancel)
            .await
            .unwrap();
    }
    let mut req = ReceiveMessageRequest::new(QUEUE);
    req.max_number_of_messages = Some(10);
    h.client.receive_message(req, &cancel).await.unwrap().messages
}

fn large() -> String {
    "Q".repeat(101)
}

#[tokio::test]
async fn delete_with_cleanup_removes_the_payload() {
    let h = Harness::new(enabled(100, true));
    let msg = deliver(&h, &[large()]).await.remove(0);
    assert_eq!(h.stored(), 1);

    h.client
        .delete_message(DeleteMessageRequest::new(QUEUE, msg.receipt_handle), &CancellationToken::new())
        .await
        .expect("delete");

    assert_eq!(h.stored(), 0);
    assert_eq!(h.queue.in_flight_count(QUEUE), 0);
}

#[tokio::test]
async fn delete_without_cleanup_keeps_the_payload() {
    let h = Harness::new(enabled(100, false));
    let msg = deliver(&h, &[large()]).await.remove(0);

    h.client
        .delete_message(DeleteMessageRequest::new(QUEUE, msg.receipt_handle), &CancellationToken::new())
        .await
        .expect("framed handle is unwrapped even without cleanup");

    assert_eq!(h.stored(), 1);
    assert_eq!(h.queue.in_flight_count(QUEUE), 0);
}

#[tokio::test]
async fn disabled_client_forwards_framed_handle_as_is() {
    let h = Harness::new(enabled(100, true));
    let msg = deliver(&h, &[large()]).await.remove(0);

    let plain = h.sibling(disabled());
    let err = plain
        .delete_message(DeleteMessageRequest::new(QUEUE, msg.receipt_handle), &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::Transport);
    assert_eq!(h.stored(), 1);
    assert_eq!(h.queue.in_flight_count(QUEUE), 1);
}

#[tokio::test]
async fn inline_message_delete_skips_the_store() {
    let h = Harness::new(enabled(100, true));
    h.store.fail_delete.store(true, Ordering::Relaxed);
    let msg = deliver(&h, &["abc".to_string()]).await.remove(0);

    h.client
        .delete_message(DeleteMessageRequest::new(QUEUE, msg.receipt_handle), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(h.queue.in_flight_count(QUEUE), 0);
}

#[tokio::test]
async fn store_delete_failure_keeps_the_queue_message() {
    let h = Harness::new(enabled(100, true));
    let msg = deliver(&h, &[large()]).await.remove(0);
    h.store.fail_delete.store(true, Ordering::Relaxed);

    let err = h
        .client
        .delete_message(DeleteMessageRequest::new(QUEUE, msg.receipt_handle), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, SqsxError::PayloadStore { op: StoreOp::Delete, .. }));
    assert!(err
        .to_string()
        .starts_with("failed to delete the payload from the payload store"));
    assert_eq!(h.queue.in_flight_count(QUEUE), 1);
}

#[tokio::test]
async fn cancelled_delete_touches_nothing() {
    let h = Harness::new(enabled(100, true));
    let msg = deliver(&h, &[large()]).await.remove(0);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = h
        .client
        .delete_message(DeleteMessageRequest::new(QUEUE, msg.receipt_handle), &cancel)
        .await
        .unwrap_err();

    assert!(matches!(err, SqsxError::Cancelled));
    assert_eq!(h.stored(), 1);
    assert_eq!(h.queue.in_flight_count(QUEUE), 1);
}

#[tokio::test]
async fn batch_delete_unwraps_every_entry() {
    let h = Harness::new(enabled(100, true));
    let msgs = deliver(&h, &[large(), "abc".to_string(), large()]).await;
    assert_eq!(msgs.len(), 3);
    assert_eq!(h.stored(), 2);

    let req = DeleteMessageBatchRequest {
        queue_url: QUEUE.into(),
        entries: msgs
            .into_iter()
            .enumerate()
            .map(|(i, m)| DeleteMessageBatchRequestEntry {
                id: i.to_string(),
                receipt_handle: m.receipt_handle,
            })
            .collect(),
    };
    let resp = h.client.delete_message_batch(req, &CancellationToken::new()).await.unwrap();

    assert_eq!(resp.successful, vec!["0", "1", "2"]);
    assert!(resp.failed.is_empty());
    assert_eq!(h.stored(), 0);
    assert_eq!(h.queue.in_flight_count(QUEUE), 0);
}

#[tokio::test]
async fn visibility_change_unwraps_without_touching_the_store() {
    let h = Harness::new(enabled(100, true));
    let msg = deliver(&h, &[large()]).await.remove(0);
    h.store.fail_delete.store(true, Ordering::Relaxed);
    h.store.fail_read.store(true, Ordering::Relaxed);

    h.client
        .change_message_visibility(
            ChangeMessageVisibilityRequest {
                queue_url: QUEUE.into(),
                receipt_handle: msg.receipt_handle,
                visibility_timeout: 0,
            },
            &CancellationToken::new(),
        )
        .await
        .expect("visibility");

    assert_eq!(h.queue.in_flight_count(QUEUE), 0);
    assert_eq!(h.pending().len(), 1);
    assert_eq!(h.stored(), 1);
}

#[tokio::test]
async fn batch_visibility_change_unwraps_every_entry() {
    let h = Harness::new(enabled(100, true));
    let msgs = deliver(&h, &[large(), "abc".to_string()]).await;

    let req = ChangeMessageVisibilityBatchRequest {
        queue_url: QUEUE.into(),
        entries: msgs
            .into_iter()
            .enumerate()
            .map(|(i, m)| ChangeMessageVisibilityBatchRequestEntry {
                id: i.to_string(),
                receipt_handle: m.receipt_handle,
                visibility_timeout: 30,
            })
            .collect(),
    };
    let resp = h
        .client
        .change_message_visibility_batch(req, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(resp.successful.len(), 2);
    assert!(resp.failed.is_empty());
    assert_eq!(h.queue.in_flight_count(QUEUE), 2);
}

#[tokio::test]
async fn close_reaches_queue_and_store() {
    let h = Harness::new(enabled(100, true));

    h.client.close().await.unwrap();

    assert!(h.queue.is_closed());
    assert!(h.store.closed.load(Ordering::Relaxed));
}

#[tokio::test]
async fn store_delete_only_when_enabled_cleanup_and_framed() {
    for support in [true, false] {
        for cleanup in [true, false] {
            for framed in [true, false] {
                let h = Harness::new(enabled(100, true));
                let body = if framed { large() } else { "abc".to_string() };
                let msg = deliver(&h, &[body]).await.remove(0);

                let cfg = if support { enabled(100, cleanup) } else { disabled().with_cleanup_on_delete(cleanup) };
                let deleter = h.sibling(cfg);
                let _ = deleter
                    .delete_message(DeleteMessageRequest::new(QUEUE, msg.receipt_handle), &CancellationToken::new())
                    .await;

                let expected = usize::from(support && cleanup && framed);
                assert_eq!(
                    h.store.delete_calls.load(Ordering::Relaxed),
                    expected,
                    "support={support} cleanup={cleanup} framed={framed}"
                );
            }
        }
    }
}

fn batch_of(msgs: &[Message]) -> DeleteMessageBatchRequest {
    DeleteMessageBatchRequest {
        queue_url: QUEUE.into(),
        entries: msgs
            .iter()
            .enumerate()
            .map(|(i, m)| DeleteMessageBatchRequestEntry {
                id: i.to_string(),
                receipt_handle: m.receipt_handle.clone(),
            })
            .collect(),
    }
}

#[tokio::test]
async fn batch_store_failure_still_deletes_already_cleaned_messages() {
    let h = Harness::new(enabled(100, true));
    let msgs = deliver(&h, &[large(), large()]).await;
    h.store.fail_delete_from.store(1, Ordering::Relaxed);

    let err = h
        .client
        .delete_message_batch(batch_of(&msgs), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, SqsxError::PayloadStore { op: StoreOp::Delete, .. }));
    // First entry: payload and queue message both gone. Second: both kept.
    assert_eq!(h.stored(), 1);
    assert_eq!(h.queue.in_flight_count(QUEUE), 1);

    // The surviving message is still fully resolvable on redelivery.
    h.client
        .change_message_visibility(
            ChangeMessageVisibilityRequest {
                queue_url: QUEUE.into(),
                receipt_handle: msgs[1].receipt_handle.clone(),
                visibility_timeout: 0,
            },
            &CancellationToken::new(),
        )
        .await
        .unwrap();
    let again = h
        .client
        .receive_message(ReceiveMessageRequest::new(QUEUE), &CancellationToken::new())
        .await
        .expect("redelivered message resolves");
    assert_eq!(again.messages.len(), 1);
    assert_eq!(again.messages[0].body, large());
}

#[tokio::test]
async fn batch_with_malformed_framed_handle_fails_before_any_delete() {
    let h = Harness::new(enabled(100, true));
    let msgs = deliver(&h, &[large()]).await;
    let mut req = batch_of(&msgs);
    req.entries.push(DeleteMessageBatchRequestEntry {
        id: "broken".into(),
        receipt_handle: format!("{LOCATION_MARKER}b{LOCATION_MARKER}{KEY_MARKER}k"),
    });

    let err = h
        .client
        .delete_message_batch(req, &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::InvalidPointer);
    assert_eq!(h.store.delete_calls.load(Ordering::Relaxed), 0);
    assert_eq!(h.stored(), 1);
    assert_eq!(h.queue.in_flight_count(QUEUE), 1);
}
