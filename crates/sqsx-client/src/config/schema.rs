use serde::Deserialize;

use sqsx_core::constants::DEFAULT_PAYLOAD_SIZE_THRESHOLD;
use sqsx_core::error::{Result, SqsxError};
use sqsx_core::ExtendedClientConfiguration;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub version: u32,

    #[serde(default)]
    pub client: ClientSection,

    #[serde(default)]
    pub store: Option<PayloadStoreConfiguration>,
}

impl FileConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(SqsxError::BadConfig(format!("unsupported config version {}", self.version)));
        }

        self.client.validate()?;

        match &self.store {
            Some(store) => store.validate()?,
            None if self.client.large_payload_support => {
                return Err(SqsxError::BadConfig(
                    "store section is required when client.large_payload_support is true".into(),
                ));
            }
            None => {}
        }
        Ok(())
    }

    /// Immutable snapshot handed to the client.
    pub fn client_config(&self) -> ExtendedClientConfiguration {
        let c = &self.client;
        let base = ExtendedClientConfiguration::new()
            .with_always_offload(c.always_offload)
            .with_cleanup_on_delete(c.cleanup_on_delete)
            .with_payload_size_threshold(c.payload_size_threshold);
        if c.large_payload_support {
            base.with_large_payload_support_enabled(c.cleanup_on_delete)
        } else {
            base.with_large_payload_support_disabled()
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientSection {
    #[serde(default)]
    pub large_payload_support: bool,

    #[serde(default)]
    pub always_offload: bool,

    #[serde(default)]
    pub cleanup_on_delete: bool,

    #[serde(default = "default_payload_size_threshold")]
    pub payload_size_threshold: u64,
}

impl Default for ClientSection {
    fn default() -> Self {
        Self {
            large_payload_support: false,
            always_offload: false,
            cleanup_on_delete: false,
            payload_size_threshold: default_payload_size_threshold(),
        }
    }
}

impl ClientSection {
    pub fn validate(&self) -> Result<()> {
        if self.payload_size_threshold == 0 {
            return Err(SqsxError::BadConfig(
                "client.payload_size_threshold must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

fn default_payload_size_threshold() -> u64 {
    DEFAULT_PAYLOAD_SIZE_THRESHOLD
}

/// Where offloaded payloads go.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PayloadStoreConfiguration {
    pub bucket_name: String,

    #[serde(default = "default_canned_acl")]
    pub canned_acl: String,
}

impl PayloadStoreConfiguration {
    pub fn new(bucket_name: impl Into<String>) -> Self {
        Self {
            bucket_name: bucket_name.into(),
            canned_acl: default_canned_acl(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.bucket_name.trim().is_empty() {
            return Err(SqsxError::BadConfig("store.bucket_name must not be empty".into()));
        }
        if self.canned_acl.trim().is_empty() {
            return Err(SqsxError::BadConfig("store.canned_acl must not be empty".into()));
        }
        Ok(())
    }
}

fn default_canned_acl() -> String {
    "bucket-owner-full-control".into()
}
