use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio_util::sync::CancellationToken;

use sqsx_core::PayloadPointer;

use super::keys::{KeyGenerator, UuidKeyGenerator};
use super::{PayloadStore, StoreError, StoreResult};

/// Payload store backed by a map. One location, any number of keys.
pub struct InMemoryPayloadStore {
    location: String,
    keys: Arc<dyn KeyGenerator>,
    objects: DashMap<PayloadPointer, String>,
}

impl InMemoryPayloadStore {
    pub fn new(location: impl Into<String>) -> Self {
        Self::with_key_generator(location, Arc::new(UuidKeyGenerator))
    }

    pub fn with_key_generator(location: impl Into<String>, keys: Arc<dyn KeyGenerator>) -> Self {
        Self {
            location: location.into(),
            keys,
            objects: DashMap::new(),
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn contains(&self, pointer: &PayloadPointer) -> bool {
        self.objects.contains_key(pointer)
    }

    pub fn get(&self, pointer: &PayloadPointer) -> Option<String> {
        self.objects.get(pointer).map(|body| body.value().clone())
    }
}

fn not_found(pointer: &PayloadPointer) -> StoreError {
    StoreError::NotFound {
        location: pointer.location.clone(),
        key: pointer.key.clone(),
    }
}

#[async_trait]
impl PayloadStore for InMemoryPayloadStore {
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
        if cancel.is_cancelled() {
            return Err(StoreError::Cancelled);
        }
        let pointer = PayloadPointer::new(self.location.clone(), key);
        self.objects.insert(pointer.clone(), body.to_string());
        Ok(pointer)
    }

    async fn read_payload(&self, pointer: &PayloadPointer, cancel: &CancellationToken) -> StoreResult<String> {
        if cancel.is_cancelled() {
            return Err(StoreError::Cancelled);
        }
        self.objects
            .get(pointer)
            .map(|body| body.value().clone())
            .ok_or_else(|| not_found(pointer))
    }

    async fn delete_payload(&self, pointer: &PayloadPointer, cancel: &CancellationToken) -> StoreResult<()> {
        if cancel.is_cancelled() {
            return Err(StoreError::Cancelled);
        }
        // Deleting a missing object succeeds, like blob services do.
        self.objects.remove(pointer);
        Ok(())
    }
}
