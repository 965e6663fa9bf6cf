use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Free-form JSON object used for workflow inputs, outputs and variables
pub type JsonObject = Map<String, Value>;

/// A named rule that reacts to an external event by running actions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventHandler {
    pub name: String,
    pub event: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(default)]
    pub actions: Vec<EventAction>,
    #[serde(default)]
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluator_type: Option<String>,
    /// Server fields this crate does not model, kept for pass-through
    #[serde(flatten)]
    pub extra: JsonObject,
}

impl EventHandler {
    /// Handler with no actions, the shape every relay surface registers
    pub fn new(name: impl Into<String>, event: impl Into<String>, active: bool) -> Self {
        Self {
            name: name.into(),
            event: event.into(),
            condition: None,
            actions: Vec::new(),
            active,
            evaluator_type: None,
            extra: JsonObject::new(),
        }
    }

    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }
}

/// Kind of action an event handler performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    StartWorkflow,
    CompleteTask,
    FailTask,
    TerminateWorkflow,
    UpdateWorkflowVariables,
}

/// A single action attached to an event handler.
///
/// Payload keys are snake_case on the wire (`start_workflow`, `complete_task`,
/// ...); camelCase spellings are accepted on input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventAction {
    pub action: ActionType,
    #[serde(default, alias = "startWorkflow", skip_serializing_if = "Option::is_none")]
    pub start_workflow: Option<StartWorkflow>,
    #[serde(default, alias = "completeTask", skip_serializing_if = "Option::is_none")]
    pub complete_task: Option<TaskDetails>,
    #[serde(default, alias = "failTask", skip_serializing_if = "Option::is_none")]
    pub fail_task: Option<TaskDetails>,
    #[serde(default, alias = "terminateWorkflow", skip_serializing_if = "Option::is_none")]
    pub terminate_workflow: Option<TerminateWorkflow>,
    #[serde(
        default,
        alias = "updateWorkflowVariables",
        skip_serializing_if = "Option::is_none"
    )]
    pub update_workflow_variables: Option<UpdateWorkflowVariables>,
    #[serde(
        default,
        rename = "expandInlineJSON",
        skip_serializing_if = "Option::is_none"
    )]
    pub expand_inline_json: Option<bool>,
    #[serde(flatten)]
    pub extra: JsonObject,
}

/// Payload of a `start_workflow` action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartWorkflow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<JsonObject>,
    #[serde(flatten)]
    pub extra: JsonObject,
}

/// Payload of `complete_task` / `fail_task` actions. A task is addressed
/// either by workflow id and reference name or by task id alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_ref_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<JsonObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(flatten)]
    pub extra: JsonObject,
}

/// Payload of a `terminate_workflow` action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerminateWorkflow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub termination_reason: Option<String>,
    #[serde(flatten)]
    pub extra: JsonObject,
}

/// Payload of an `update_workflow_variables` action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWorkflowVariables {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<JsonObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub append_array: Option<bool>,
    #[serde(flatten)]
    pub extra: JsonObject,
}

/// Request body for starting a workflow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartWorkflowRequest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub input: JsonObject,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
}

impl StartWorkflowRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            correlation_id: None,
            input: JsonObject::new(),
            priority: None,
        }
    }
}

/// Execution status of a workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkflowStatus {
    Running,
    Completed,
    Failed,
    TimedOut,
    Terminated,
    Paused,
}

impl WorkflowStatus {
    /// Whether the workflow can no longer make progress
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Completed | Self::Failed | Self::TimedOut | Self::Terminated
        )
    }
}

/// Execution state of a workflow as reported by the orchestration service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    pub workflow_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_version: Option<i32>,
    pub status: WorkflowStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<JsonObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<JsonObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason_for_incompletion: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "chrono::serde::ts_milliseconds_option"
    )]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "chrono::serde::ts_milliseconds_option"
    )]
    pub end_time: Option<DateTime<Utc>>,
    /// Tasks and other server fields, kept for pass-through
    #[serde(flatten)]
    pub extra: JsonObject,
}

/// One page of search hits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult<T> {
    #[serde(default)]
    pub total_hits: i64,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

/// Condensed workflow record returned by search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowSummary {
    pub workflow_id: String,
    #[serde(default)]
    pub workflow_type: String,
    #[serde(default)]
    pub version: i32,
    pub status: WorkflowStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(flatten)]
    pub extra: JsonObject,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_handler_wire_names() {
        let handler = EventHandler::new("n1", "e1", true).with_condition("$.ok");
        let value = serde_json::to_value(&handler).unwrap();

        assert_eq!(
            value,
            json!({
                "name": "n1",
                "event": "e1",
                "condition": "$.ok",
                "actions": [],
                "active": true
            })
        );
    }

    #[test]
    fn test_event_handler_keeps_unknown_fields() {
        let raw = json!({
            "name": "n1",
            "event": "kafka:topic",
            "actions": [{
                "action": "start_workflow",
                "start_workflow": {
                    "name": "wf",
                    "version": 2,
                    "input": {"a": 1},
                    "taskToDomain": {"*": "blue"}
                },
                "expandInlineJSON": true
            }],
            "active": false,
            "description": "server-side field"
        });

        let handler: EventHandler = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(handler.actions[0].action, ActionType::StartWorkflow);
        assert_eq!(handler.actions[0].expand_inline_json, Some(true));
        let start = handler.actions[0].start_workflow.as_ref().unwrap();
        assert_eq!(start.name.as_deref(), Some("wf"));
        assert_eq!(start.extra["taskToDomain"]["*"], "blue");
        assert_eq!(handler.extra["description"], "server-side field");
        assert_eq!(serde_json::to_value(&handler).unwrap(), raw);
    }

    #[test]
    fn test_workflow_deserialize() {
        let raw = json!({
            "workflowId": "wf-1",
            "workflowName": "order_flow",
            "workflowVersion": 3,
            "status": "TIMED_OUT",
            "input": {"orderId": 7},
            "output": null,
            "startTime": 1700000000000i64,
            "tasks": [{"taskId": "t1"}]
        });

        let workflow: Workflow = serde_json::from_value(raw).unwrap();
        assert_eq!(workflow.workflow_id, "wf-1");
        assert_eq!(workflow.status, WorkflowStatus::TimedOut);
        assert_eq!(workflow.input.as_ref().unwrap()["orderId"], 7);
        assert!(workflow.output.is_none());
        assert_eq!(workflow.start_time.unwrap().timestamp_millis(), 1700000000000);
        assert!(workflow.end_time.is_none());
        assert_eq!(workflow.extra["tasks"][0]["taskId"], "t1");
    }

    #[test]
    fn test_event_action_accepts_camel_case_payload_keys() {
        let action: EventAction = serde_json::from_value(json!({
            "action": "terminate_workflow",
            "terminateWorkflow": {"workflowId": "wf-1", "terminationReason": "done"}
        }))
        .unwrap();

        let terminate = action.terminate_workflow.as_ref().unwrap();
        assert_eq!(terminate.workflow_id.as_deref(), Some("wf-1"));
        assert_eq!(
            serde_json::to_value(&action).unwrap(),
            json!({
                "action": "terminate_workflow",
                "terminate_workflow": {"workflowId": "wf-1", "terminationReason": "done"}
            })
        );
    }

    #[test]
    fn test_task_action_by_task_id_only() {
        let raw = json!({
            "action": "complete_task",
            "complete_task": {"taskId": "t-9", "output": {"ok": true}}
        });

        let action: EventAction = serde_json::from_value(raw.clone()).unwrap();
        let task = action.complete_task.as_ref().unwrap();
        assert_eq!(task.task_id.as_deref(), Some("t-9"));
        assert!(task.workflow_id.is_none());
        assert!(task.task_ref_name.is_none());
        assert_eq!(serde_json::to_value(&action).unwrap(), raw);
    }

    #[test]
    fn test_update_variables_keeps_unset_flags_absent() {
        let raw = json!({
            "action": "update_workflow_variables",
            "update_workflow_variables": {"workflowId": "wf-1", "variables": {"n": 1}}
        });

        let action: EventAction = serde_json::from_value(raw.clone()).unwrap();
        let update = action.update_workflow_variables.as_ref().unwrap();
        assert!(update.append_array.is_none());
        assert!(action.expand_inline_json.is_none());
        assert_eq!(serde_json::to_value(&action).unwrap(), raw);
    }

    #[test]
    fn test_workflow_status_terminal() {
        assert!(WorkflowStatus::Completed.is_terminal());
        assert!(WorkflowStatus::Terminated.is_terminal());
        assert!(!WorkflowStatus::Running.is_terminal());
        assert!(!WorkflowStatus::Paused.is_terminal());
    }

    #[test]
    fn test_start_workflow_request_omits_unset_fields() {
        let request = StartWorkflowRequest::new("order_flow");
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value, json!({"name": "order_flow", "input": {}}));
    }

    #[test]
    fn test_search_result_defaults() {
        let result: SearchResult<WorkflowSummary> = serde_json::from_value(json!({})).unwrap();
        assert_eq!(result.total_hits, 0);
        assert!(result.results.is_empty());
    }
}
