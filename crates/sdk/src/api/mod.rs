//! API groups of the orchestration service.

pub mod events;
pub mod workflows;

pub use events::EventsApi;
pub use workflows::{SearchQuery, WorkflowsApi};
