//! Inverse path: receive-side body restoration and the delete/visibility
//! handle unwrapping that follows it.

pub mod cleanup;
pub mod receive;

pub use cleanup::{prepare_visibility, DeleteCleanup, DeleteTarget};
pub use receive::{request_marker_attribute, ReceiveResolver};
