//! Size accounting vector tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use serde::Deserialize;

use sqsx_core::size::{attributes_size, message_size};
use sqsx_core::{MessageAttributeValue, MessageAttributes};

mod vector_loader;
use vector_loader::{load, EncodedData};

#[derive(Debug, Deserialize)]
struct SizeCase {
    description: String,
    body: String,
    attributes: Vec<AttributeData>,
    expect_attributes_size: u64,
    expect_message_size: u64,
}

#[derive(Debug, Deserialize)]
struct AttributeData {
    name: String,
    data_type: String,
    #[serde(default)]
    string_value: Option<String>,
    #[serde(default)]
    binary_value: Option<EncodedData>,
}

#[test]
fn size_cases() {
    let cases: Vec<SizeCase> = load("size_cases.json");
    assert!(!cases.is_empty());

    for c in cases {
        let attrs: MessageAttributes = c
            .attributes
            .iter()
            .map(|a| {
                (
                    a.name.clone(),
                    MessageAttributeValue {
                        data_type: a.data_type.clone(),
                        string_value: a.string_value.clone(),
                        binary_value: a.binary_value.as_ref().map(|b| b.decode().into()),
                    },
                )
            })
            .collect();

        assert_eq!(attributes_size(&attrs), c.expect_attributes_size, "case={}", c.description);
        assert_eq!(message_size(&c.body, &attrs), c.expect_message_size, "case={}", c.description);
    }
}
