//! Top-level facade crate for ripple.
//!
//! Re-exports the wire types and the gateway library so users can depend on a single crate.

pub mod core {
    pub use ripple_core::*;
}

pub mod gateway {
    pub use ripple_gateway::*;
}
