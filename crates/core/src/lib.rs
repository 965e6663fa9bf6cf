// Core types and dispatch for the Conductor relay surfaces

pub mod api;
pub mod dispatch;
pub mod envelope;
pub mod error;
pub mod operation;
pub mod params;
pub mod types;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use api::ConductorApi;
pub use dispatch::{execute, prepare, run};
pub use envelope::SdkResponse;
pub use error::{RelayError, RelayResult};
pub use operation::{Operation, Resource, WorkflowSearch};
pub use params::Parameters;
pub use types::*;
