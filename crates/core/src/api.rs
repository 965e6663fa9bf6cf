// Client seam between the relay surfaces and the orchestration service

use crate::types::{EventHandler, SearchResult, StartWorkflowRequest, Workflow, WorkflowSummary};
use anyhow::Result;
use std::sync::Arc;

/// The orchestration calls the relay surfaces can make.
///
/// Every relayed operation maps to exactly one of these methods. Errors are
/// surfaced to callers by their display text, unmodified.
#[async_trait::async_trait]
pub trait ConductorApi: Send + Sync {
    /// Register a new event handler
    async fn add_event_handler(&self, handler: EventHandler) -> Result<()>;

    /// Replace an existing event handler, matched by name
    async fn update_event_handler(&self, handler: EventHandler) -> Result<()>;

    /// List every registered event handler
    async fn get_event_handlers(&self) -> Result<Vec<EventHandler>>;

    /// List handlers listening on `event`
    async fn get_event_handlers_for_event(
        &self,
        event: &str,
        active_only: Option<bool>,
    ) -> Result<Vec<EventHandler>>;

    /// Remove an event handler by name
    async fn remove_event_handler(&self, name: &str) -> Result<()>;

    /// Execution state of one workflow
    async fn get_workflow(&self, workflow_id: &str, include_tasks: bool) -> Result<Workflow>;

    /// Search workflow executions
    async fn search_workflows(
        &self,
        start: i32,
        size: i32,
        free_text: &str,
        query: Option<&str>,
    ) -> Result<SearchResult<WorkflowSummary>>;

    /// Start a workflow and return its id
    async fn start_workflow(&self, request: StartWorkflowRequest) -> Result<String>;

    /// Terminate a running workflow
    async fn terminate_workflow(&self, workflow_id: &str, reason: Option<&str>) -> Result<()>;
}

#[async_trait::async_trait]
impl<T: ConductorApi + ?Sized> ConductorApi for Arc<T> {
    async fn add_event_handler(&self, handler: EventHandler) -> Result<()> {
        (**self).add_event_handler(handler).await
    }

    async fn update_event_handler(&self, handler: EventHandler) -> Result<()> {
        (**self).update_event_handler(handler).await
    }

    async fn get_event_handlers(&self) -> Result<Vec<EventHandler>> {
        (**self).get_event_handlers().await
    }

    async fn get_event_handlers_for_event(
        &self,
        event: &str,
        active_only: Option<bool>,
    ) -> Result<Vec<EventHandler>> {
        (**self).get_event_handlers_for_event(event, active_only).await
    }

    async fn remove_event_handler(&self, name: &str) -> Result<()> {
        (**self).remove_event_handler(name).await
    }

    async fn get_workflow(&self, workflow_id: &str, include_tasks: bool) -> Result<Workflow> {
        (**self).get_workflow(workflow_id, include_tasks).await
    }

    async fn search_workflows(
        &self,
        start: i32,
        size: i32,
        free_text: &str,
        query: Option<&str>,
    ) -> Result<SearchResult<WorkflowSummary>> {
        (**self).search_workflows(start, size, free_text, query).await
    }

    async fn start_workflow(&self, request: StartWorkflowRequest) -> Result<String> {
        (**self).start_workflow(request).await
    }

    async fn terminate_workflow(&self, workflow_id: &str, reason: Option<&str>) -> Result<()> {
        (**self).terminate_workflow(workflow_id, reason).await
    }
}
