//! JSON test vector loader shared by receipt/size tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(dead_code)]

use std::fs;

use base64::Engine;
use serde::de::DeserializeOwned;
use serde::Deserialize;

pub fn load<T: DeserializeOwned>(name: &str) -> T {
    let s = fs::read_to_string(format!("tests/vectors/{name}")).unwrap();
    serde_json::from_str(&s).unwrap()
}

#[derive(Debug, Deserialize)]
pub struct ExpectError {
    pub code: String,
}

/// Opaque test data with an explicit encoding.
#[derive(Debug, Deserialize)]
pub struct EncodedData {
    pub encoding: String,
    pub data: String,
}

impl EncodedData {
    pub fn decode(&self) -> Vec<u8> {
        match self.encoding.as_str() {
            "utf8" => self.data.as_bytes().to_vec(),
            "base64" => base64::engine::general_purpose::STANDARD
                .decode(&self.data)
                .expect("invalid base64 in test vector"),
            "hex" => hex::decode(&self.data).expect("invalid hex in test vector"),
            other => panic!("unsupported encoding: {other}"),
        }
    }

    pub fn decode_utf8(&self) -> String {
        String::from_utf8(self.decode()).expect("test vector is not utf-8")
    }
}
