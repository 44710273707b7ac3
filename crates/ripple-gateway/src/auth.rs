//! Identity resolution for incoming upgrades.
//!
//! The hub trusts whatever user id comes out of here. Session or JWT
//! middleware plugs in by implementing [`IdentityResolver`].

use std::collections::HashMap;

use ripple_core::error::{Result, RippleError};

pub trait IdentityResolver: Send + Sync {
    /// Map a connection ticket to a user id.
    fn resolve(&self, ticket: &str) -> Result<String>;
}

/// Fixed ticket table, loaded from `auth.tickets`.
#[derive(Debug, Default)]
pub struct StaticTickets {
    tickets: HashMap<String, String>,
}

impl StaticTickets {
    pub fn new(tickets: HashMap<String, String>) -> Self {
        Self { tickets }
    }
}

impl IdentityResolver for StaticTickets {
    fn resolve(&self, ticket: &str) -> Result<String> {
        self.tickets
            .get(ticket)
            .filter(|u| !u.is_empty())
            .cloned()
            .ok_or(RippleError::AuthFailed)
    }
}
