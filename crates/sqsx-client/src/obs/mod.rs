//! Lightweight in-process metrics.
//!
//! Counters and latency histograms for the offload and resolve paths, stored
//! as atomics and rendered in Prometheus text format on demand.

pub mod metrics;

pub use metrics::ClientMetrics;
