//! sqsx core: transport-agnostic payload-offload primitives, error types, and wire constants.
//!
//! This crate defines the wire-level contracts shared by every peer that reads
//! or writes an offloaded message: the reserved marker attribute, the
//! structured pointer body, the framed receipt handle, and the size accounting
//! that drives the oversize decision. It carries no transport or runtime
//! dependencies so the decision logic can be tested as plain functions.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `SqsxError`/`Result` so a malformed
//! message from a foreign peer never brings a consumer down.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod config;
pub mod constants;
pub mod error;
pub mod message;
pub mod offload;
pub mod protocol;
pub mod size;

/// Shared result type.
pub use error::{Result, SqsxError};

pub use config::ExtendedClientConfiguration;
pub use message::{MessageAttributeValue, MessageAttributes};
pub use protocol::pointer::PayloadPointer;
