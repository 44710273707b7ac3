//! Wire protocol for the event stream.
//!
//! - `envelope`: the generic `{"type","payload"}` object every client parses,
//!   plus the lazily parsed inbound form and the serialize-once frame.
//! - `event`: the closed set of typed events producers construct.
//!
//! Typed events only become a generic envelope at the wire edge, so producers
//! keep compile-time payload shapes while the wire stays schema-less.

pub mod envelope;
pub mod event;

pub use envelope::{Envelope, InboundEnvelope, PreparedFrame};
pub use event::Event;
