//! Size accounting for the oversize decision.
//!
//! Text is counted as UTF-8 bytes; binary attribute values are counted as-is.
//! Empty strings contribute nothing, so an unset data type and an empty one
//! are indistinguishable here.

use crate::message::MessageAttributes;

/// Sum of name + data type + string value + binary value, over all attributes.
pub fn attributes_size(attributes: &MessageAttributes) -> u64 {
    attributes
        .iter()
        .map(|(name, value)| {
            let string_len = value.string_value.as_ref().map_or(0, |s| s.len());
            let binary_len = value.binary_value.as_ref().map_or(0, |b| b.len());
            (name.len() + value.data_type.len() + string_len + binary_len) as u64
        })
        .sum()
}

/// Byte length of the body plus [`attributes_size`].
pub fn message_size(body: &str, attributes: &MessageAttributes) -> u64 {
    attributes_size(attributes) + body.len() as u64
}
