//! sqsx client library entry.
//!
//! This crate wires the offload engine, the receive-side resolver, and the
//! delete/visibility cleanup path into [`ExtendedClient`], a decorator over any
//! [`QueueTransport`]. Payload bytes go to a [`PayloadStore`]; in-memory
//! implementations of both collaborators back the tests and the loopback
//! binary.

pub mod cancel;
pub mod client;
pub mod config;
pub mod obs;
pub mod offload;
pub mod resolve;
pub mod store;
pub mod transport;

pub use client::ExtendedClient;
pub use store::{PayloadStore, StoreError};
pub use transport::QueueTransport;
