//! Send path: oversize decision and payload offloading.
//!
//! The pure decision lives in `sqsx_core::offload`; this module adds the
//! store write and applies the rewrite to send requests.

pub mod engine;

pub use engine::OffloadEngine;
