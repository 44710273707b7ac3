//! Realtime runtime: live-connection registry, fan-out, and presence.
//!
//! - `connection`: one client's identity, lifecycle state and outbound queue.
//! - `hub`: the registry (primary set + user index) and delivery primitives.
//! - `presence`: online/offline status driven by hub membership.

pub mod connection;
pub mod hub;
pub mod presence;

pub use connection::{ConnState, Connection, Enqueue, Outbound, Outbox};
pub use hub::{DeliveryReport, Hub, HubStats};
pub use presence::{FollowerDirectory, MemoryFollowers, MemoryStatusStore, StatusService, StatusStore, UserStatus};
