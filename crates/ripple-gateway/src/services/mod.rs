//! Event producers.
//!
//! Domain services call these after a state change; they build a typed event
//! and hand it to the hub. Nothing here sees a connection.

pub mod notify;

pub use notify::{Actor, Notifier};
