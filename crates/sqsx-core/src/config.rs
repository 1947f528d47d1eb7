//! Immutable client configuration snapshot.
//!
//! Behavior changes go through the consuming `with_*` builders, which return a
//! new value; a client holds one snapshot for its whole lifetime.

use crate::constants::DEFAULT_PAYLOAD_SIZE_THRESHOLD;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtendedClientConfiguration {
    large_payload_support: bool,
    always_offload: bool,
    cleanup_on_delete: bool,
    payload_size_threshold: u64,
}

impl Default for ExtendedClientConfiguration {
    fn default() -> Self {
        Self {
            large_payload_support: false,
            always_offload: false,
            cleanup_on_delete: false,
            payload_size_threshold: DEFAULT_PAYLOAD_SIZE_THRESHOLD,
        }
    }
}

impl ExtendedClientConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_large_payload_support_enabled(self, cleanup_on_delete: bool) -> Self {
        Self {
            large_payload_support: true,
            cleanup_on_delete,
            ..self
        }
    }

    pub fn with_large_payload_support_disabled(self) -> Self {
        Self {
            large_payload_support: false,
            ..self
        }
    }

    pub fn with_always_offload(self, always_offload: bool) -> Self {
        Self {
            always_offload,
            ..self
        }
    }

    pub fn with_cleanup_on_delete(self, cleanup_on_delete: bool) -> Self {
        Self {
            cleanup_on_delete,
            ..self
        }
    }

    pub fn with_payload_size_threshold(self, payload_size_threshold: u64) -> Self {
        Self {
            payload_size_threshold,
            ..self
        }
    }

    pub fn large_payload_support(&self) -> bool {
        self.large_payload_support
    }
    pub fn always_offload(&self) -> bool {
        self.always_offload
    }
    pub fn cleanup_on_delete(&self) -> bool {
        self.cleanup_on_delete
    }
    pub fn payload_size_threshold(&self) -> u64 {
        self.payload_size_threshold
    }

    /// Whether delete calls should remove the stored payload.
    pub fn deletes_payloads(&self) -> bool {
        self.large_payload_support && self.cleanup_on_delete
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_leave_original_untouched() {
        let base = ExtendedClientConfiguration::new();
        let tuned = base
            .with_large_payload_support_enabled(true)
            .with_payload_size_threshold(100);

        assert!(!base.large_payload_support());
        assert_eq!(base.payload_size_threshold(), DEFAULT_PAYLOAD_SIZE_THRESHOLD);
        assert!(tuned.deletes_payloads());
        assert_eq!(tuned.payload_size_threshold(), 100);
    }

    #[test]
    fn disabling_support_keeps_cleanup_flag_inert() {
        let cfg = ExtendedClientConfiguration::new()
            .with_large_payload_support_enabled(true)
            .with_large_payload_support_disabled();
        assert!(cfg.cleanup_on_delete());
        assert!(!cfg.deletes_payloads());
    }
}
