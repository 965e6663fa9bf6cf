// One operation in, one client call, one envelope out

use crate::api::ConductorApi;
use crate::envelope::SdkResponse;
use crate::error::RelayResult;
use crate::operation::{Operation, Resource};
use crate::params::Parameters;
use tracing::{debug, warn};

/// Execute a validated operation with exactly one client call.
///
/// Queries carry the downstream payload as `data`; mutations carry none,
/// except `start-workflow` which carries the new workflow id.
pub async fn execute(api: &dyn ConductorApi, operation: Operation) -> SdkResponse {
    let name = operation.name();
    debug!(operation = name, "executing operation");

    let response: SdkResponse = match operation {
        Operation::AddEvent(handler) => api.add_event_handler(handler).await.into(),
        Operation::GetEvents => api.get_event_handlers().await.into(),
        Operation::GetEventsByName { event, active_only } => api
            .get_event_handlers_for_event(&event, active_only)
            .await
            .into(),
        Operation::UpdateEvent(handler) => api.update_event_handler(handler).await.into(),
        Operation::DeleteEvent { name } => api.remove_event_handler(&name).await.into(),
        Operation::GetWorkflow {
            workflow_id,
            include_tasks,
        } => api.get_workflow(&workflow_id, include_tasks).await.into(),
        Operation::GetWorkflows(search) => api
            .search_workflows(
                search.start,
                search.size,
                &search.free_text,
                search.query.as_deref(),
            )
            .await
            .into(),
        Operation::StartWorkflow(request) => api.start_workflow(request).await.into(),
        Operation::TerminateWorkflow {
            workflow_id,
            reason,
        } => api
            .terminate_workflow(&workflow_id, reason.as_deref())
            .await
            .into(),
    };

    if let Some(message) = response_error(&response) {
        warn!(operation = name, error = %message, "operation failed");
    }
    response
}

/// Parse and validate raw CLI-style input, then execute it.
///
/// Any input error is returned as an error envelope without touching `api`.
pub async fn run(
    api: &dyn ConductorApi,
    resource: &str,
    operation: &str,
    parameters: &str,
) -> SdkResponse {
    match prepare(resource, operation, parameters) {
        Ok(op) => execute(api, op).await,
        Err(e) => {
            warn!(resource, operation, error = %e, "rejected operation input");
            SdkResponse::error(e.to_string())
        }
    }
}

/// Validate raw input into an `Operation`
pub fn prepare(resource: &str, operation: &str, parameters: &str) -> RelayResult<Operation> {
    let params = Parameters::parse(parameters)?;
    let resource: Resource = resource.parse()?;
    Operation::parse(resource, operation, &params)
}

fn response_error(response: &SdkResponse) -> Option<&str> {
    if response.success {
        None
    } else {
        response.error_message.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, RecordingConductor};
    use crate::types::{EventHandler, Workflow};
    use serde_json::json;

    fn workflow() -> Workflow {
        serde_json::from_value(json!({
            "workflowId": "wf-1",
            "status": "RUNNING",
            "input": {"a": 1},
            "tasks": []
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_add_event_success() {
        let api = RecordingConductor::new();

        let response = run(
            &api,
            "event",
            "add-event",
            r#"{"name":"n1","event":"e1","active":true}"#,
        )
        .await;

        assert_eq!(response.to_json(), r#"{"success":true}"#);
        assert_eq!(
            api.calls(),
            vec![Call::AddEventHandler(EventHandler::new("n1", "e1", true))]
        );
    }

    #[tokio::test]
    async fn test_add_event_downstream_failure() {
        let api = RecordingConductor::failing("boom");

        let response = run(
            &api,
            "event",
            "add-event",
            r#"{"name":"n1","event":"e1","active":true}"#,
        )
        .await;

        assert_eq!(response.to_json(), r#"{"success":false,"errorMessage":"boom"}"#);
        assert_eq!(api.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_malformed_parameters_skip_downstream() {
        let api = RecordingConductor::new();

        let response = run(&api, "event", "add-event", "{not json").await;

        assert!(!response.success);
        assert!(response
            .error_message
            .unwrap()
            .starts_with("failed to parse parameters"));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_resource_and_operation() {
        let api = RecordingConductor::new();

        let response = run(&api, "task", "get-task", "{}").await;
        assert_eq!(response.error_message.as_deref(), Some("unknown resource: task"));

        let response = run(&api, "event", "purge", "{}").await;
        assert_eq!(
            response.error_message.as_deref(),
            Some("unknown event operation: purge")
        );
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_get_events_payload_unchanged() {
        let handler = EventHandler::new("n1", "e1", false);
        let api = RecordingConductor::new().with_event_handlers(vec![handler.clone()]);

        let response = run(&api, "event", "get-event", "{}").await;

        assert!(response.success);
        assert_eq!(response.data, Some(serde_json::to_value(vec![handler]).unwrap()));
    }

    #[tokio::test]
    async fn test_get_workflow_payload_unchanged() {
        let api = RecordingConductor::new().with_workflow(workflow());

        let response = run(&api, "workflow", "get-workflow", r#"{"workflowId":"wf-1"}"#).await;

        assert!(response.success);
        let data = response.data.unwrap();
        assert_eq!(data["workflowId"], "wf-1");
        assert_eq!(data["status"], "RUNNING");
        assert_eq!(data["tasks"], json!([]));
        assert_eq!(
            api.calls(),
            vec![Call::GetWorkflow {
                workflow_id: "wf-1".to_string(),
                include_tasks: true,
            }]
        );
    }

    #[tokio::test]
    async fn test_get_events_server_payload_round_trips() {
        let raw = json!([{
            "name": "order_router",
            "event": "kafka:orders",
            "condition": "$.amount > 10",
            "actions": [
                {
                    "action": "start_workflow",
                    "start_workflow": {
                        "name": "order_flow",
                        "version": 3,
                        "correlationId": "${orderId}",
                        "input": {"orderId": "${orderId}"},
                        "taskToDomain": {"*": "orders"}
                    },
                    "expandInlineJSON": true
                },
                {
                    "action": "complete_task",
                    "complete_task": {"taskId": "t-9", "output": {"ok": true}}
                },
                {
                    "action": "fail_task",
                    "fail_task": {"workflowId": "wf-1", "taskRefName": "charge"}
                }
            ],
            "active": true,
            "evaluatorType": "javascript"
        }]);
        let handlers: Vec<EventHandler> = serde_json::from_value(raw.clone()).unwrap();
        let api = RecordingConductor::new().with_event_handlers(handlers);

        let response = run(&api, "event", "get-event", "{}").await;
        assert!(response.success);
        assert_eq!(response.data, Some(raw.clone()));

        let response = run(
            &api,
            "event",
            "get-event-by-name",
            r#"{"event":"kafka:orders"}"#,
        )
        .await;
        assert!(response.success);
        assert_eq!(response.data, Some(raw));
    }

    #[tokio::test]
    async fn test_get_workflow_without_input_or_output() {
        let raw = json!({
            "workflowId": "wf-2",
            "workflowName": "order_flow",
            "status": "RUNNING",
            "startTime": 1700000000000i64,
            "tasks": []
        });
        let workflow: Workflow = serde_json::from_value(raw.clone()).unwrap();
        let api = RecordingConductor::new().with_workflow(workflow);

        let response = run(&api, "workflow", "get-workflow", r#"{"workflowId":"wf-2"}"#).await;

        assert!(response.success);
        assert_eq!(response.data, Some(raw));
    }

    #[tokio::test]
    async fn test_start_workflow_returns_id() {
        let api = RecordingConductor::new().with_started_workflow_id("wf-42");

        let response = run(&api, "workflow", "start-workflow", r#"{"name":"order_flow"}"#).await;

        assert_eq!(response.to_json(), r#"{"success":true,"data":"wf-42"}"#);
    }

    #[tokio::test]
    async fn test_every_operation_reports_failure() {
        let params = r#"{"name":"n","event":"e","workflowId":"w"}"#;
        for resource in [Resource::Event, Resource::Workflow] {
            for operation in resource.operations() {
                let api = RecordingConductor::failing("downstream unavailable");
                let response = run(&api, resource.as_str(), operation, params).await;

                assert!(!response.success, "{} should fail", operation);
                assert!(response.data.is_none());
                assert_eq!(
                    response.error_message.as_deref(),
                    Some("downstream unavailable")
                );
                assert_eq!(api.calls().len(), 1);
            }
        }
    }
}
