//! Lightweight in-process metrics.
//!
//! Counters, gauges and histograms are stored as atomics keyed by label sets
//! and rendered in Prometheus text format by the `/metrics` handler.

pub mod metrics;

pub use metrics::HubMetrics;
