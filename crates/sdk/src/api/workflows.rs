//! Workflow API endpoints.

use crate::client::ConductorClient;
use crate::error::ConductorResult;
use conductor_relay_core::types::{SearchResult, StartWorkflowRequest, Workflow, WorkflowSummary};
use serde::Serialize;

/// Workflow API for starting, inspecting and terminating executions.
pub struct WorkflowsApi<'a> {
    client: &'a ConductorClient,
}

impl<'a> WorkflowsApi<'a> {
    pub(crate) fn new(client: &'a ConductorClient) -> Self {
        Self { client }
    }

    /// Get the execution status of a workflow.
    pub async fn get(&self, workflow_id: &str, include_tasks: bool) -> ConductorResult<Workflow> {
        self.client
            .http
            .get_with_query(
                &["workflow", workflow_id],
                &[("includeTasks", include_tasks)],
            )
            .await
    }

    /// Search workflow executions.
    pub async fn search(&self, query: &SearchQuery<'_>) -> ConductorResult<SearchResult<WorkflowSummary>> {
        self.client
            .http
            .get_with_query(&["workflow", "search"], query)
            .await
    }

    /// Start a workflow, returning the new workflow id.
    pub async fn start(&self, request: &StartWorkflowRequest) -> ConductorResult<String> {
        let id = self.client.http.post_text(&["workflow"], request).await?;
        Ok(id.trim().trim_matches('"').to_string())
    }

    /// Terminate a workflow execution.
    pub async fn terminate(&self, workflow_id: &str, reason: Option<&str>) -> ConductorResult<()> {
        let query: Vec<(&str, &str)> = reason.map(|r| ("reason", r)).into_iter().collect();
        self.client
            .http
            .delete_no_response(&["workflow", workflow_id], &query)
            .await
    }
}

/// Query string of the workflow search endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery<'a> {
    pub start: i32,
    pub size: i32,
    pub free_text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<&'a str>,
}
