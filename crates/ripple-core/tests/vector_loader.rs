//! JSON test vector loader shared by the wire tests.

#![allow(dead_code)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::fs;

use serde::Deserialize;

/// Client frame vector: raw text in, parsed envelope (or error code) out.
#[derive(Debug, Deserialize)]
pub struct InboundVector {
    pub description: String,
    pub frame: String,
    #[serde(default)]
    pub expect: Option<InboundExpect>,
    #[serde(default)]
    pub expect_error: Option<ExpectError>,
}

#[derive(Debug, Deserialize)]
pub struct InboundExpect {
    #[serde(rename = "type")]
    pub msg_type: String,
    pub is_ping: bool,
    pub payload: Option<serde_json::Value>,
}

/// Wire vector: the exact object a client receives for one event kind.
#[derive(Debug, Deserialize)]
pub struct WireVector {
    pub description: String,
    pub wire: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct ExpectError {
    pub code: String,
}

pub fn load<T: serde::de::DeserializeOwned>(name: &str) -> T {
    let s = fs::read_to_string(format!("tests/vectors/{name}")).unwrap();
    serde_json::from_str(&s).unwrap_or_else(|e| panic!("bad vector {name}: {e}"))
}
