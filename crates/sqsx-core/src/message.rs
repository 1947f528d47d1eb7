//! Message attribute model.

use std::collections::HashMap;

use bytes::Bytes;

/// Attribute name -> value, as carried by a queue message.
pub type MessageAttributes = HashMap<String, MessageAttributeValue>;

/// One typed message attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageAttributeValue {
    /// Data type tag (`String`, `Number`, `Binary`, optionally with a custom suffix).
    pub data_type: String,
    pub string_value: Option<String>,
    pub binary_value: Option<Bytes>,
}

impl MessageAttributeValue {
    pub fn string(value: impl Into<String>) -> Self {
        Self {
            data_type: "String".into(),
            string_value: Some(value.into()),
            binary_value: None,
        }
    }

    pub fn number(value: impl ToString) -> Self {
        Self {
            data_type: "Number".into(),
            string_value: Some(value.to_string()),
            binary_value: None,
        }
    }

    pub fn binary(value: impl Into<Bytes>) -> Self {
        Self {
            data_type: "Binary".into(),
            string_value: None,
            binary_value: Some(value.into()),
        }
    }
}
