//! # Conductor Relay SDK
//!
//! Async REST client for the Conductor workflow orchestration service.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use conductor_relay_sdk::{ConductorClient, ConductorResult, EventHandler};
//!
//! #[tokio::main]
//! async fn main() -> ConductorResult<()> {
//!     let client = ConductorClient::builder()
//!         .base_url("http://localhost:8080/api")
//!         .build()?;
//!
//!     client
//!         .events()
//!         .add(&EventHandler::new("order_placed_handler", "kafka:orders", true))
//!         .await?;
//!
//!     let handlers = client.events().list().await?;
//!     println!("Found {} event handlers", handlers.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Environment
//!
//! [`ConductorClient::from_env`] reads `CONDUCTOR_SERVER_URL`,
//! `CONDUCTOR_AUTH_TOKEN` and `CONDUCTOR_TIMEOUT_SECS`.
//!
//! The client also implements [`conductor_relay_core::ConductorApi`], so it
//! can be handed straight to [`conductor_relay_core::run`].

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod transport;

// Re-export main client
pub use client::{ConductorClient, ConductorClientBuilder};
pub use config::{ClientConfig, RetryConfig};
pub use error::{ConductorError, ConductorResult};

// Re-export core types for convenience
pub use conductor_relay_core::types::{
    ActionType, EventAction, EventHandler, SearchResult, StartWorkflowRequest, Workflow,
    WorkflowStatus, WorkflowSummary,
};
pub use conductor_relay_core::ConductorApi;
