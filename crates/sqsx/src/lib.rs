//! Top-level facade crate for sqsx.
//!
//! Re-exports the core primitives and the async client so users can depend on a single crate.

pub mod core {
    pub use sqsx_core::*;
}

pub mod client {
    pub use sqsx_client::*;
}
