//! Offload planning (pure).
//!
//! Everything here is a function of `(body, attributes, configuration)`; the
//! store write and the transport call live in the client crate. The rewrite
//! never touches the caller's attribute map: [`rewrite_offloaded`] returns a
//! fresh copy with the marker attribute added.

use crate::config::ExtendedClientConfiguration;
use crate::constants::{MAX_ALLOWED_ATTRIBUTES, RESERVED_ATTRIBUTE_DATA_TYPE, RESERVED_ATTRIBUTE_NAME};
use crate::error::{Result, SqsxError};
use crate::message::{MessageAttributeValue, MessageAttributes};
use crate::protocol::pointer::PayloadPointer;
use crate::size::{attributes_size, message_size};

/// Body and attributes to hand to the transport after offloading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffloadedMessage {
    pub body: String,
    pub attributes: MessageAttributes,
}

/// Outgoing bodies must carry at least one non-whitespace character.
pub fn check_body(body: &str) -> Result<()> {
    if body.trim().is_empty() {
        return Err(SqsxError::InvalidMessage("message body must not be empty".into()));
    }
    Ok(())
}

/// The marker attribute name belongs to this client.
pub fn check_reserved_name(attributes: &MessageAttributes) -> Result<()> {
    if attributes.contains_key(RESERVED_ATTRIBUTE_NAME) {
        return Err(SqsxError::InvalidMessage(format!(
            "message attribute name {RESERVED_ATTRIBUTE_NAME} is reserved for the extended client"
        )));
    }
    Ok(())
}

/// Size and count limits for a message about to be offloaded.
pub fn check_offload_limits(attributes: &MessageAttributes, threshold: u64) -> Result<()> {
    let size = attributes_size(attributes);
    if size > threshold {
        return Err(SqsxError::InvalidMessage(format!(
            "total size of message attributes is {size} bytes which is larger than the threshold of {threshold} bytes; \
             consider including the payload in the message body instead of message attributes"
        )));
    }

    let count = attributes.len();
    if count > MAX_ALLOWED_ATTRIBUTES {
        return Err(SqsxError::InvalidMessage(format!(
            "number of message attributes [{count}] exceeds the maximum allowed for large-payload messages [{MAX_ALLOWED_ATTRIBUTES}]"
        )));
    }
    Ok(())
}

/// Oversize predicate. Strict: a message exactly at the threshold stays inline.
pub fn is_oversize(body: &str, attributes: &MessageAttributes, cfg: &ExtendedClientConfiguration) -> bool {
    cfg.always_offload() || message_size(body, attributes) > cfg.payload_size_threshold()
}

/// Validate an outgoing message and decide whether it must be offloaded.
///
/// Runs the guards in order: body, reserved name, then (only for messages
/// that will be offloaded) attribute size and count. Returns `false` when
/// large payload support is disabled.
pub fn plan_offload(body: &str, attributes: &MessageAttributes, cfg: &ExtendedClientConfiguration) -> Result<bool> {
    check_body(body)?;
    if !cfg.large_payload_support() {
        return Ok(false);
    }
    check_reserved_name(attributes)?;

    if !is_oversize(body, attributes, cfg) {
        return Ok(false);
    }
    check_offload_limits(attributes, cfg.payload_size_threshold())?;
    Ok(true)
}

/// Copy of `attributes` with the marker attribute set to `payload_size`.
pub fn with_extended_payload_size(attributes: &MessageAttributes, payload_size: u64) -> MessageAttributes {
    let mut out = attributes.clone();
    out.insert(
        RESERVED_ATTRIBUTE_NAME.to_string(),
        MessageAttributeValue {
            data_type: RESERVED_ATTRIBUTE_DATA_TYPE.to_string(),
            string_value: Some(payload_size.to_string()),
            binary_value: None,
        },
    );
    out
}

/// Rewrite a message whose `original_body` now lives at `pointer`.
pub fn rewrite_offloaded(
    original_body: &str,
    attributes: &MessageAttributes,
    pointer: &PayloadPointer,
) -> Result<OffloadedMessage> {
    Ok(OffloadedMessage {
        body: pointer.to_body()?,
        attributes: with_extended_payload_size(attributes, original_body.len() as u64),
    })
}
