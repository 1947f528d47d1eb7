//! S3-backed payload store (feature `s3`).

use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use aws_sdk_s3::Client;
use tokio_util::sync::CancellationToken;

use sqsx_core::PayloadPointer;

use super::keys::{KeyGenerator, UuidKeyGenerator};
use super::{PayloadStore, StoreError, StoreResult};
use crate::config::PayloadStoreConfiguration;

pub struct S3PayloadStore {
    client: Client,
    bucket_name: String,
    canned_acl: ObjectCannedAcl,
    keys: Arc<dyn KeyGenerator>,
}

impl S3PayloadStore {
    pub fn new(client: Client, cfg: &PayloadStoreConfiguration) -> Self {
        Self::with_key_generator(client, cfg, Arc::new(UuidKeyGenerator))
    }

    pub fn with_key_generator(client: Client, cfg: &PayloadStoreConfiguration, keys: Arc<dyn KeyGenerator>) -> Self {
        Self {
            client,
            bucket_name: cfg.bucket_name.clone(),
            canned_acl: ObjectCannedAcl::from(cfg.canned_acl.as_str()),
            keys,
        }
    }
}

async fn until_cancelled<T, F>(cancel: &CancellationToken, fut: F) -> StoreResult<T>
where
    F: std::future::Future<Output = StoreResult<T>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(StoreError::Cancelled),
        res = fut => res,
    }
}

#[async_trait]
impl PayloadStore for S3PayloadStore {
    async fn store_payload(&self, body: &str, cancel: &CancellationToken) -> StoreResult<PayloadPointer> {
        let key = self.keys.generate_key();
        self.store_payload_with_key(body, &key, cancel).await
    }

    async fn store_payload_with_key(
        &self,
        body: &str,
        key: &str,
        cancel: &CancellationToken,
    ) -> StoreResult<PayloadPointer> {
        let put = self
            .client
            .put_object()
            .bucket(&self.bucket_name)
            .key(key)
            .acl(self.canned_acl.clone())
            .body(ByteStream::from(body.as_bytes().to_vec()))
            .send();

        until_cancelled(cancel, async {
            put.await.map_err(|e| StoreError::Backend(e.to_string()))
        })
        .await?;

        Ok(PayloadPointer::new(self.bucket_name.clone(), key))
    }

    async fn read_payload(&self, pointer: &PayloadPointer, cancel: &CancellationToken) -> StoreResult<String> {
        let get = self
            .client
            .get_object()
            .bucket(&pointer.location)
            .key(&pointer.key)
            .send();

        until_cancelled(cancel, async {
            let out = get.await.map_err(|e| StoreError::Backend(e.to_string()))?;
            let bytes = out
                .body
                .collect()
                .await
                .map_err(|e| StoreError::Backend(e.to_string()))?
                .into_bytes();
            String::from_utf8(bytes.to_vec())
                .map_err(|e| StoreError::Backend(format!("payload is not utf-8: {e}")))
        })
        .await
    }

    async fn delete_payload(&self, pointer: &PayloadPointer, cancel: &CancellationToken) -> StoreResult<()> {
        let delete = self
            .client
            .delete_object()
            .bucket(&pointer.location)
            .key(&pointer.key)
            .send();

        until_cancelled(cancel, async {
            delete.await.map_err(|e| StoreError::Backend(e.to_string()))?;
            Ok(())
        })
        .await
    }
}
