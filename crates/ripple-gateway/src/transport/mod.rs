//! Transport layer (WebSocket).
//!
//! Exposes the WS upgrade handler, the inbound codec, and the read/write
//! pumps that move frames between a connection's queue and its socket.

pub mod codec;
pub mod pump;
pub mod ws;
