//! Wire constants shared with every peer reading the same queue.
//!
//! These are a cross-client contract (the pub/sub extension uses the same
//! values). Changing any of them breaks interoperability with existing
//! producers and consumers.

/// Marker attribute carrying the original body size of an offloaded message.
pub const RESERVED_ATTRIBUTE_NAME: &str = "ExtendedPayloadSize";

/// Data type of the marker attribute.
pub const RESERVED_ATTRIBUTE_DATA_TYPE: &str = "Number";

/// Maximum number of message attributes accepted by the queue service.
pub const MAX_TRANSPORT_ATTRIBUTES: usize = 10;

/// Attributes a caller may set on an offloaded message (one slot is reserved).
pub const MAX_ALLOWED_ATTRIBUTES: usize = MAX_TRANSPORT_ATTRIBUTES - 1;

/// Default oversize threshold in bytes.
pub const DEFAULT_PAYLOAD_SIZE_THRESHOLD: u64 = 262_144;

/// Frames the pointer location inside a receipt handle.
pub const LOCATION_MARKER: &str = "-..s3BucketName..-";

/// Frames the pointer key inside a receipt handle.
pub const KEY_MARKER: &str = "-..s3Key..-";
