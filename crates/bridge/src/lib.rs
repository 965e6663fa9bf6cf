//! Native bridge to the Conductor client
//!
//! Exposes the relayed event and workflow operations as `extern "C"`
//! functions over opaque integer client handles, for hosts that cannot link
//! Rust directly. Every call returns a heap-allocated JSON envelope that the
//! host must release with [`conductor_free_string`].
//!
//! See `include/conductor_relay.h` for the C declarations.

pub mod error;
mod exports;
mod registry;
mod runtime;

pub use error::{BridgeError, BridgeResult};
pub use exports::*;
