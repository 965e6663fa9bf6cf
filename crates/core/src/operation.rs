// Catalogue of relayed operations and their parameter shapes

use crate::error::{RelayError, RelayResult};
use crate::params::Parameters;
use crate::types::{EventHandler, StartWorkflowRequest};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_SEARCH_SIZE: i32 = 100;
pub const DEFAULT_FREE_TEXT: &str = "*";

/// Resource family an operation belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Event,
    Workflow,
}

impl Resource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Event => "event",
            Self::Workflow => "workflow",
        }
    }

    /// Operation names accepted for this resource
    pub fn operations(&self) -> &'static [&'static str] {
        match self {
            Self::Event => &[
                "add-event",
                "get-event",
                "get-event-by-name",
                "update-event",
                "delete-event",
            ],
            Self::Workflow => &[
                "get-workflow",
                "get-workflows",
                "start-workflow",
                "terminate-workflow",
            ],
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resource {
    type Err = RelayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "event" => Ok(Self::Event),
            "workflow" => Ok(Self::Workflow),
            other => Err(RelayError::UnknownResource(other.to_string())),
        }
    }
}

/// Paging and filter for workflow search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowSearch {
    pub start: i32,
    pub size: i32,
    pub free_text: String,
    pub query: Option<String>,
}

impl Default for WorkflowSearch {
    fn default() -> Self {
        Self {
            start: 0,
            size: DEFAULT_SEARCH_SIZE,
            free_text: DEFAULT_FREE_TEXT.to_string(),
            query: None,
        }
    }
}

/// A fully validated operation, ready to be executed against a client
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    AddEvent(EventHandler),
    GetEvents,
    GetEventsByName {
        event: String,
        active_only: Option<bool>,
    },
    UpdateEvent(EventHandler),
    DeleteEvent {
        name: String,
    },
    GetWorkflow {
        workflow_id: String,
        include_tasks: bool,
    },
    GetWorkflows(WorkflowSearch),
    StartWorkflow(StartWorkflowRequest),
    TerminateWorkflow {
        workflow_id: String,
        reason: Option<String>,
    },
}

impl Operation {
    /// Validate `name` against the catalogue of `resource` and extract its
    /// parameters.
    pub fn parse(resource: Resource, name: &str, params: &Parameters) -> RelayResult<Self> {
        match (resource, name) {
            (Resource::Event, "add-event") => {
                Ok(Self::AddEvent(EventHandler::from_parameters(params)?))
            }
            (Resource::Event, "get-event") => Ok(Self::GetEvents),
            (Resource::Event, "get-event-by-name") => Ok(Self::GetEventsByName {
                event: params.require_string("event")?,
                active_only: params.optional_bool("activeOnly"),
            }),
            (Resource::Event, "update-event") => {
                Ok(Self::UpdateEvent(EventHandler::from_parameters(params)?))
            }
            (Resource::Event, "delete-event") => Ok(Self::DeleteEvent {
                name: params.require_string("name")?,
            }),
            (Resource::Workflow, "get-workflow") => Ok(Self::GetWorkflow {
                workflow_id: params.require_string("workflowId")?,
                include_tasks: params.optional_bool("includeTasks").unwrap_or(true),
            }),
            (Resource::Workflow, "get-workflows") => {
                Ok(Self::GetWorkflows(WorkflowSearch::from_parameters(params)))
            }
            (Resource::Workflow, "start-workflow") => Ok(Self::StartWorkflow(
                StartWorkflowRequest::from_parameters(params)?,
            )),
            (Resource::Workflow, "terminate-workflow") => Ok(Self::TerminateWorkflow {
                workflow_id: params.require_string("workflowId")?,
                reason: params.optional_string("reason").filter(|s| !s.is_empty()),
            }),
            (resource, operation) => Err(RelayError::UnknownOperation {
                resource,
                operation: operation.to_string(),
            }),
        }
    }

    /// Canonical operation name, as accepted by `parse`
    pub fn name(&self) -> &'static str {
        match self {
            Self::AddEvent(_) => "add-event",
            Self::GetEvents => "get-event",
            Self::GetEventsByName { .. } => "get-event-by-name",
            Self::UpdateEvent(_) => "update-event",
            Self::DeleteEvent { .. } => "delete-event",
            Self::GetWorkflow { .. } => "get-workflow",
            Self::GetWorkflows(_) => "get-workflows",
            Self::StartWorkflow(_) => "start-workflow",
            Self::TerminateWorkflow { .. } => "terminate-workflow",
        }
    }

    pub fn resource(&self) -> Resource {
        match self {
            Self::AddEvent(_)
            | Self::GetEvents
            | Self::GetEventsByName { .. }
            | Self::UpdateEvent(_)
            | Self::DeleteEvent { .. } => Resource::Event,
            _ => Resource::Workflow,
        }
    }
}

impl WorkflowSearch {
    /// `start`, `size`, `freeText` and `query`, each optional
    pub fn from_parameters(params: &Parameters) -> Self {
        Self {
            start: params.i32("start", 0),
            size: params.i32("size", DEFAULT_SEARCH_SIZE),
            free_text: params
                .optional_string("freeText")
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_FREE_TEXT.to_string()),
            query: params.optional_string("query").filter(|s| !s.is_empty()),
        }
    }
}

impl EventHandler {
    /// Handler from `name`, `event`, `active` and `condition`; no actions
    pub fn from_parameters(params: &Parameters) -> RelayResult<Self> {
        let mut handler = Self::new(
            params.require_string("name")?,
            params.require_string("event")?,
            params.bool("active"),
        );
        handler.condition = params.optional_string("condition").filter(|c| !c.is_empty());
        Ok(handler)
    }
}

impl StartWorkflowRequest {
    pub fn from_parameters(params: &Parameters) -> RelayResult<Self> {
        let mut request = Self::new(params.require_string("name")?);
        request.version = params.optional_i32("version");
        request.correlation_id = params
            .optional_string("correlationId")
            .filter(|c| !c.is_empty());
        request.input = params.object("input");
        request.priority = params.optional_i32("priority");
        Ok(request)
    }
}
