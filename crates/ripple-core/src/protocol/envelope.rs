//! Envelope (JSON) shared by every delivery path.
//!
//! Outbound frames are always `{"type": <string>, "payload": <any>}`. Broadcast
//! and unicast use the same shape so clients decode one way.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use serde_json::Value;

use crate::error::{Result, RippleError};
use crate::protocol::event::Event;

/// Type of the client keep-alive request.
pub const PING: &str = "ping";
/// Type of the reply to [`PING`].
pub const PONG: &str = "pong";

/// Outbound envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Event discriminator (field name is `type` in JSON).
    #[serde(rename = "type")]
    pub msg_type: String,
    /// Type-specific payload. Missing payload decodes as `null`.
    #[serde(default)]
    pub payload: Value,
}

impl Envelope {
    pub fn new(msg_type: impl Into<String>, payload: Value) -> Self {
        Self {
            msg_type: msg_type.into(),
            payload,
        }
    }

    /// Reply to a client `ping`.
    pub fn pong() -> Self {
        Self::new(PONG, Value::Null)
    }
}

impl TryFrom<&Event> for Envelope {
    type Error = RippleError;

    fn try_from(ev: &Event) -> Result<Self> {
        let v = serde_json::to_value(ev)?;
        Ok(serde_json::from_value(v)?)
    }
}

impl TryFrom<Event> for Envelope {
    type Error = RippleError;

    fn try_from(ev: Event) -> Result<Self> {
        Envelope::try_from(&ev)
    }
}

/// Inbound envelope from a client text frame.
///
/// The payload is kept as `RawValue` so control messages never pay for
/// parsing a body they ignore.
#[derive(Debug, Deserialize)]
pub struct InboundEnvelope {
    #[serde(rename = "type")]
    pub msg_type: String,
    #[serde(default)]
    pub payload: Option<Box<RawValue>>,
}

impl InboundEnvelope {
    pub fn parse(s: &str) -> Result<Self> {
        serde_json::from_str(s)
            .map_err(|e| RippleError::BadRequest(format!("invalid envelope json: {e}")))
    }

    pub fn is_ping(&self) -> bool {
        self.msg_type == PING
    }
}

/// Serialized envelope, built once and shared across every target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedFrame(Arc<str>);

impl PreparedFrame {
    pub fn prepare(env: &Envelope) -> Result<Self> {
        let s = serde_json::to_string(env)?;
        Ok(Self(Arc::from(s)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
