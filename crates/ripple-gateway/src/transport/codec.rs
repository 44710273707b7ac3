//! Decode-once codec for the read pump.
//!
//! - Text frames => `InboundEnvelope` (payload kept raw)
//! - Binary frames are surfaced by size only; the stream is text-only
//! - Ping/Pong/Close are surfaced for lifecycle management

use axum::extract::ws::Message;
use ripple_core::{error::Result, protocol::InboundEnvelope};

#[derive(Debug)]
pub enum Inbound {
    /// Application-level keep-alive (`{"type":"ping"}`).
    KeepAlive,
    /// Any other application message.
    Text { env: InboundEnvelope, bytes_len: usize },
    Binary { bytes_len: usize },
    Ping(Vec<u8>),
    Pong,
    Close,
}

pub fn decode(msg: Message) -> Result<Inbound> {
    match msg {
        Message::Text(s) => {
            let bytes_len = s.len();
            let env = InboundEnvelope::parse(&s)?;
            if env.is_ping() {
                return Ok(Inbound::KeepAlive);
            }
            Ok(Inbound::Text { env, bytes_len })
        }
        Message::Binary(b) => Ok(Inbound::Binary { bytes_len: b.len() }),
        Message::Ping(v) => Ok(Inbound::Ping(v)),
        Message::Pong(_) => Ok(Inbound::Pong),
        Message::Close(_) => Ok(Inbound::Close),
    }
}
