// In-memory `ConductorApi` that records calls, for tests of the relay surfaces

use crate::api::ConductorApi;
use crate::types::{EventHandler, SearchResult, StartWorkflowRequest, Workflow, WorkflowSummary};
use anyhow::{anyhow, Result};
use std::sync::Mutex;

/// A client call as observed by `RecordingConductor`
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    AddEventHandler(EventHandler),
    UpdateEventHandler(EventHandler),
    GetEventHandlers,
    GetEventHandlersForEvent {
        event: String,
        active_only: Option<bool>,
    },
    RemoveEventHandler(String),
    GetWorkflow {
        workflow_id: String,
        include_tasks: bool,
    },
    SearchWorkflows {
        start: i32,
        size: i32,
        free_text: String,
        query: Option<String>,
    },
    StartWorkflow(StartWorkflowRequest),
    TerminateWorkflow {
        workflow_id: String,
        reason: Option<String>,
    },
}

/// Records every call and answers with canned data, or fails every call
/// with a fixed message.
#[derive(Debug, Default)]
pub struct RecordingConductor {
    calls: Mutex<Vec<Call>>,
    failure: Option<String>,
    event_handlers: Vec<EventHandler>,
    workflow: Option<Workflow>,
    search: Option<SearchResult<WorkflowSummary>>,
    started_workflow_id: String,
}

impl RecordingConductor {
    pub fn new() -> Self {
        Self {
            started_workflow_id: "workflow-1".to_string(),
            ..Default::default()
        }
    }

    /// Every call fails with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::new()
        }
    }

    pub fn with_event_handlers(mut self, handlers: Vec<EventHandler>) -> Self {
        self.event_handlers = handlers;
        self
    }

    pub fn with_workflow(mut self, workflow: Workflow) -> Self {
        self.workflow = Some(workflow);
        self
    }

    pub fn with_search_result(mut self, result: SearchResult<WorkflowSummary>) -> Self {
        self.search = Some(result);
        self
    }

    pub fn with_started_workflow_id(mut self, id: impl Into<String>) -> Self {
        self.started_workflow_id = id.into();
        self
    }

    /// Calls observed so far, in order
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, call: Call) -> Result<()> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
        match &self.failure {
            Some(message) => Err(anyhow!("{}", message)),
            None => Ok(()),
        }
    }
}

#[async_trait::async_trait]
impl ConductorApi for RecordingConductor {
    async fn add_event_handler(&self, handler: EventHandler) -> Result<()> {
        self.record(Call::AddEventHandler(handler))
    }

    async fn update_event_handler(&self, handler: EventHandler) -> Result<()> {
        self.record(Call::UpdateEventHandler(handler))
    }

    async fn get_event_handlers(&self) -> Result<Vec<EventHandler>> {
        self.record(Call::GetEventHandlers)?;
        Ok(self.event_handlers.clone())
    }

    async fn get_event_handlers_for_event(
        &self,
        event: &str,
        active_only: Option<bool>,
    ) -> Result<Vec<EventHandler>> {
        self.record(Call::GetEventHandlersForEvent {
            event: event.to_string(),
            active_only,
        })?;
        Ok(self
            .event_handlers
            .iter()
            .filter(|h| h.event == event && (!active_only.unwrap_or(false) || h.active))
            .cloned()
            .collect())
    }

    async fn remove_event_handler(&self, name: &str) -> Result<()> {
        self.record(Call::RemoveEventHandler(name.to_string()))
    }

    async fn get_workflow(&self, workflow_id: &str, include_tasks: bool) -> Result<Workflow> {
        self.record(Call::GetWorkflow {
            workflow_id: workflow_id.to_string(),
            include_tasks,
        })?;
        self.workflow
            .clone()
            .ok_or_else(|| anyhow!("workflow not found: {}", workflow_id))
    }

    async fn search_workflows(
        &self,
        start: i32,
        size: i32,
        free_text: &str,
        query: Option<&str>,
    ) -> Result<SearchResult<WorkflowSummary>> {
        self.record(Call::SearchWorkflows {
            start,
            size,
            free_text: free_text.to_string(),
            query: query.map(str::to_string),
        })?;
        Ok(self.search.clone().unwrap_or(SearchResult {
            total_hits: 0,
            results: Vec::new(),
        }))
    }

    async fn start_workflow(&self, request: StartWorkflowRequest) -> Result<String> {
        self.record(Call::StartWorkflow(request))?;
        Ok(self.started_workflow_id.clone())
    }

    async fn terminate_workflow(&self, workflow_id: &str, reason: Option<&str>) -> Result<()> {
        self.record(Call::TerminateWorkflow {
            workflow_id: workflow_id.to_string(),
            reason: reason.map(str::to_string),
        })
    }
}
