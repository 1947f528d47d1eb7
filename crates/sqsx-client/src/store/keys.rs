use uuid::Uuid;

/// Strategy for naming newly stored payloads.
pub trait KeyGenerator: Send + Sync {
    fn generate_key(&self) -> String;
}

/// Random v4 UUID, 32 lowercase hex characters, no dashes.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidKeyGenerator;

impl KeyGenerator for UuidKeyGenerator {
    fn generate_key(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}

/// Always returns the same key. Later writes overwrite earlier ones.
#[derive(Debug, Clone)]
pub struct FixedKeyGenerator {
    key: String,
}

impl FixedKeyGenerator {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl KeyGenerator for FixedKeyGenerator {
    fn generate_key(&self) -> String {
        self.key.clone()
    }
}
