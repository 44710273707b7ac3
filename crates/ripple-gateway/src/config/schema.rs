use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;
use ripple_core::error::{Result, RippleError};

use crate::transport::pump::PumpConfig;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    pub version: u32,

    #[serde(default)]
    pub gateway: GatewaySection,

    #[serde(default)]
    pub auth: AuthSection,
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(RippleError::BadRequest(format!(
                "unsupported config version: {}",
                self.version
            )));
        }
        self.gateway.validate()?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewaySection {
    #[serde(default = "default_listen")]
    pub listen: String,

    #[serde(default = "default_ping_interval_ms")]
    pub ping_interval_ms: u64,

    #[serde(default = "default_read_deadline_ms")]
    pub read_deadline_ms: u64,

    #[serde(default = "default_write_timeout_ms")]
    pub write_timeout_ms: u64,

    #[serde(default = "default_outbound_queue")]
    pub outbound_queue: usize,

    #[serde(default = "default_max_message_bytes")]
    pub max_message_bytes: usize,
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            ping_interval_ms: default_ping_interval_ms(),
            read_deadline_ms: default_read_deadline_ms(),
            write_timeout_ms: default_write_timeout_ms(),
            outbound_queue: default_outbound_queue(),
            max_message_bytes: default_max_message_bytes(),
        }
    }
}

impl GatewaySection {
    pub fn validate(&self) -> Result<()> {
        if !(5000..=120000).contains(&self.ping_interval_ms) {
            return Err(RippleError::BadRequest(
                "gateway.ping_interval_ms must be between 5000 and 120000".into(),
            ));
        }
        if !(10000..=600000).contains(&self.read_deadline_ms) {
            return Err(RippleError::BadRequest(
                "gateway.read_deadline_ms must be between 10000 and 600000".into(),
            ));
        }
        // a keep-alive must be able to land before the peer's answer is overdue
        if self.read_deadline_ms <= self.ping_interval_ms {
            return Err(RippleError::BadRequest(
                "gateway.read_deadline_ms must be greater than ping_interval_ms".into(),
            ));
        }
        if !(1000..=60000).contains(&self.write_timeout_ms) {
            return Err(RippleError::BadRequest(
                "gateway.write_timeout_ms must be between 1000 and 60000".into(),
            ));
        }
        if self.write_timeout_ms >= self.ping_interval_ms {
            return Err(RippleError::BadRequest(
                "gateway.write_timeout_ms must be less than ping_interval_ms".into(),
            ));
        }
        if !(1..=65536).contains(&self.outbound_queue) {
            return Err(RippleError::BadRequest(
                "gateway.outbound_queue must be between 1 and 65536".into(),
            ));
        }
        if !(1024..=16 * 1024 * 1024).contains(&self.max_message_bytes) {
            return Err(RippleError::BadRequest(
                "gateway.max_message_bytes must be between 1024 and 16777216".into(),
            ));
        }
        Ok(())
    }

    pub fn pump_config(&self) -> PumpConfig {
        PumpConfig {
            ping_interval: Duration::from_millis(self.ping_interval_ms),
            read_deadline: Duration::from_millis(self.read_deadline_ms),
            write_timeout: Duration::from_millis(self.write_timeout_ms),
        }
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_ping_interval_ms() -> u64 {
    30000
}
fn default_read_deadline_ms() -> u64 {
    60000
}
fn default_write_timeout_ms() -> u64 {
    10000
}
fn default_outbound_queue() -> usize {
    256
}
fn default_max_message_bytes() -> usize {
    512 * 1024
}

/// Ticket -> user id table for the built-in resolver.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct AuthSection {
    #[serde(default)]
    pub tickets: HashMap<String, String>,
}
