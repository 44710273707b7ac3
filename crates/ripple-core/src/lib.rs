//! ripple core: transport-agnostic wire types and the shared error surface.
//!
//! This crate defines the envelope every client parses, the closed set of
//! typed events producers emit, and the error type shared with the gateway.
//! It carries no transport or runtime dependencies.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! A bad event must surface as `RippleError`, never take the hub down.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod protocol;

/// Shared result type.
pub use error::{Result, RippleError};
pub use protocol::{Envelope, Event, InboundEnvelope, PreparedFrame};
