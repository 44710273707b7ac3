//! ripple gateway library entry.
//!
//! This crate wires the WebSocket transport, the connection hub, presence,
//! and the typed event producers into one service. It is consumed by the
//! binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod auth;
pub mod clock;
pub mod config;
pub mod obs;
pub mod ops;
pub mod realtime;
pub mod router;
pub mod services;
pub mod transport;
