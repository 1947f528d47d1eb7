//! sqsx loopback
//!
//! Runs one message through the extended client against the in-process
//! queue and payload store:
//! - send (offloaded when over the configured threshold)
//! - receive (body restored, pointer framed into the receipt handle)
//! - delete (handle unwrapped, stored payload cleaned up)
//!
//! Usage: `sqsx-loopback [config.yaml] [payload-bytes]`

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{fmt, EnvFilter};

use sqsx_client::config;
use sqsx_client::store::InMemoryPayloadStore;
use sqsx_client::transport::{
    DeleteMessageRequest, InMemoryQueue, ReceiveMessageRequest, SendMessageRequest,
};
use sqsx_client::{ExtendedClient, QueueTransport};
use sqsx_core::error::{Result, SqsxError};

const QUEUE_URL: &str = "loopback://sqsx";

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let mut args = std::env::args().skip(1);
    let path = args.next().unwrap_or_else(|| "sqsx.yaml".to_string());
    let payload_bytes: usize = match args.next() {
        Some(n) => n
            .parse()
            .map_err(|e| SqsxError::BadConfig(format!("payload-bytes must be a number: {e}")))?,
        None => 300 * 1024,
    };

    let file = config::load_from_file(&path)?;
    let cfg = file.client_config();
    let location = file
        .store
        .as_ref()
        .map(|s| s.bucket_name.clone())
        .unwrap_or_else(|| "loopback".to_string());

    let queue = Arc::new(InMemoryQueue::new());
    let store = Arc::new(InMemoryPayloadStore::new(location));
    let client = ExtendedClient::new(Arc::clone(&queue), store.clone(), cfg);
    let cancel = CancellationToken::new();

    tracing::info!(
        config = %path,
        payload_bytes,
        threshold = cfg.payload_size_threshold(),
        large_payload_support = cfg.large_payload_support(),
        "sqsx-loopback starting"
    );

    let body = "x".repeat(payload_bytes);
    let sent = client
        .send_message(SendMessageRequest::new(QUEUE_URL, body.clone()), &cancel)
        .await?;
    tracing::info!(message_id = %sent.message_id, stored_payloads = store.len(), "sent");

    let received = client
        .receive_message(ReceiveMessageRequest::new(QUEUE_URL), &cancel)
        .await?;
    for msg in received.messages {
        if msg.body != body {
            return Err(SqsxError::Internal("received body differs from sent body".into()));
        }
        tracing::info!(message_id = %msg.message_id, size = msg.body.len(), "received");

        client
            .delete_message(DeleteMessageRequest::new(QUEUE_URL, msg.receipt_handle), &cancel)
            .await?;
        tracing::info!(
            message_id = %msg.message_id,
            stored_payloads = store.len(),
            in_flight = queue.in_flight_count(QUEUE_URL),
            "deleted"
        );
    }

    client.close().await?;
    print!("{}", client.metrics().render());
    Ok(())
}
