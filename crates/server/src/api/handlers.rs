use super::ApiResult;
use crate::config::AppState;
use axum::{body::Bytes, extract::State, Json};
use conductor_relay_core::{
    EventHandler, Parameters, SearchResult, StartWorkflowRequest, Workflow, WorkflowSearch,
    WorkflowSummary,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Parse a JSON object body. An empty body counts as `{}`.
fn parse_body(body: &Bytes) -> ApiResult<Parameters> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Parameters::default());
    }
    Ok(Parameters::from_slice(body)?)
}

/// Register an event handler
pub async fn add_event(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<Json<MessageResponse>> {
    let handler = EventHandler::from_parameters(&parse_body(&body)?)?;
    let name = handler.name.clone();

    state.client.add_event_handler(handler).await?;

    tracing::info!("Registered event handler: {}", name);
    Ok(Json(MessageResponse::new("Event handler registered successfully")))
}

/// List all event handlers
pub async fn get_events(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<EventHandler>>> {
    Ok(Json(state.client.get_event_handlers().await?))
}

/// List the handlers of one event
pub async fn get_events_by_name(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<Json<Vec<EventHandler>>> {
    let params = parse_body(&body)?;
    let event = params.require_string("eventName")?;

    let handlers = state
        .client
        .get_event_handlers_for_event(&event, params.optional_bool("activeOnly"))
        .await?;
    Ok(Json(handlers))
}

/// Replace an event handler
pub async fn update_event(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<Json<MessageResponse>> {
    let handler = EventHandler::from_parameters(&parse_body(&body)?)?;
    let name = handler.name.clone();

    state.client.update_event_handler(handler).await?;

    tracing::info!("Updated event handler: {}", name);
    Ok(Json(MessageResponse::new("Event handler updated successfully")))
}

/// Remove an event handler
pub async fn delete_event(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<Json<MessageResponse>> {
    let name = parse_body(&body)?.require_string("name")?;

    state.client.remove_event_handler(&name).await?;

    tracing::info!("Unregistered event handler: {}", name);
    Ok(Json(MessageResponse::new("Event handler unregistered successfully")))
}

/// Get the execution state of a workflow
pub async fn get_workflow(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<Json<Workflow>> {
    let params = parse_body(&body)?;
    let workflow_id = params.require_string("workflowId")?;
    let include_tasks = params.optional_bool("includeTasks").unwrap_or(true);

    Ok(Json(state.client.get_workflow(&workflow_id, include_tasks).await?))
}

/// Search workflow executions
pub async fn get_workflows(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<Json<SearchResult<WorkflowSummary>>> {
    let search = WorkflowSearch::from_parameters(&parse_body(&body)?);

    let result = state
        .client
        .search_workflows(
            search.start,
            search.size,
            &search.free_text,
            search.query.as_deref(),
        )
        .await?;
    Ok(Json(result))
}

/// Start a workflow
pub async fn start_workflow(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<Json<StartWorkflowResponse>> {
    let request = StartWorkflowRequest::from_parameters(&parse_body(&body)?)?;
    let name = request.name.clone();

    let workflow_id = state.client.start_workflow(request).await?;

    tracing::info!("Started workflow {}: workflow_id={}", name, workflow_id);
    Ok(Json(StartWorkflowResponse {
        success: true,
        workflow_id,
    }))
}

/// Terminate a workflow
pub async fn terminate_workflow(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<Json<MessageResponse>> {
    let params = parse_body(&body)?;
    let workflow_id = params.require_string("workflowId")?;
    let reason = params.optional_string("reason").filter(|r| !r.is_empty());

    state
        .client
        .terminate_workflow(&workflow_id, reason.as_deref())
        .await?;

    tracing::info!("Terminated workflow: {}", workflow_id);
    Ok(Json(MessageResponse::new("Workflow terminated successfully")))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartWorkflowResponse {
    pub success: bool,
    pub workflow_id: String,
}

#[cfg(test)]
mod tests {
    use crate::api::tests::{router, send};
    use axum::http::StatusCode;
    use conductor_relay_core::testing::{Call, RecordingConductor};
    use conductor_relay_core::{EventHandler, SearchResult, StartWorkflowRequest};
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_add_event() {
        let conductor = Arc::new(RecordingConductor::new());

        let (status, body) = send(
            router(conductor.clone()),
            "POST",
            "/events/add",
            r#"{"name":"n1","event":"e1","active":true}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"success": true, "message": "Event handler registered successfully"})
        );
        assert_eq!(
            conductor.calls(),
            vec![Call::AddEventHandler(EventHandler::new("n1", "e1", true))]
        );
    }

    #[tokio::test]
    async fn test_add_event_missing_name() {
        let conductor = Arc::new(RecordingConductor::new());

        let (status, body) = send(
            router(conductor.clone()),
            "POST",
            "/events/add",
            r#"{"event":"e1"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({"success": false, "errorMessage": "missing required parameter: name"})
        );
        assert!(conductor.calls().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_body_is_rejected() {
        let conductor = Arc::new(RecordingConductor::new());

        let (status, body) = send(router(conductor.clone()), "POST", "/events/update", "{oops").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body["errorMessage"]
            .as_str()
            .unwrap()
            .starts_with("failed to parse parameters"));
        assert!(conductor.calls().is_empty());
    }

    #[tokio::test]
    async fn test_downstream_failure_is_500() {
        let conductor = Arc::new(RecordingConductor::failing("boom"));

        let (status, body) = send(
            router(conductor),
            "POST",
            "/events/delete",
            r#"{"name":"n1"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"success": false, "errorMessage": "boom"}));
    }

    #[tokio::test]
    async fn test_get_events_returns_raw_list() {
        let handlers = vec![
            EventHandler::new("n1", "e1", true),
            EventHandler::new("n2", "e2", false),
        ];
        let conductor = Arc::new(RecordingConductor::new().with_event_handlers(handlers));

        let (status, body) = send(router(conductor), "POST", "/events/get", "").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 2);
        assert_eq!(body[0]["name"], "n1");
        assert_eq!(body[1]["active"], false);
    }

    #[tokio::test]
    async fn test_get_events_by_name() {
        let conductor = Arc::new(RecordingConductor::new().with_event_handlers(vec![
            EventHandler::new("n1", "e1", true),
            EventHandler::new("n2", "e1", false),
            EventHandler::new("n3", "e2", true),
        ]));

        let (status, body) = send(
            router(conductor.clone()),
            "POST",
            "/events/getByName",
            r#"{"eventName":"e1","activeOnly":true}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([{"name": "n1", "event": "e1", "actions": [], "active": true}]));
        assert_eq!(
            conductor.calls(),
            vec![Call::GetEventHandlersForEvent {
                event: "e1".to_string(),
                active_only: Some(true),
            }]
        );
    }

    #[tokio::test]
    async fn test_delete_event() {
        let conductor = Arc::new(RecordingConductor::new());

        let (status, body) = send(
            router(conductor.clone()),
            "POST",
            "/events/delete",
            r#"{"name":"n1"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Event handler unregistered successfully");
        assert_eq!(conductor.calls(), vec![Call::RemoveEventHandler("n1".to_string())]);
    }

    #[tokio::test]
    async fn test_get_workflow() {
        let workflow = serde_json::from_value(json!({
            "workflowId": "wf-1",
            "status": "RUNNING",
            "input": {"orderId": 7}
        }))
        .unwrap();
        let conductor = Arc::new(RecordingConductor::new().with_workflow(workflow));

        let (status, body) = send(
            router(conductor.clone()),
            "POST",
            "/workflows/get",
            r#"{"workflowId":"wf-1","includeTasks":false}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["workflowId"], "wf-1");
        assert_eq!(body["status"], "RUNNING");
        assert_eq!(body["input"]["orderId"], 7);
        assert_eq!(
            conductor.calls(),
            vec![Call::GetWorkflow {
                workflow_id: "wf-1".to_string(),
                include_tasks: false,
            }]
        );
    }

    #[tokio::test]
    async fn test_get_workflows_with_empty_body() {
        let conductor = Arc::new(RecordingConductor::new().with_search_result(SearchResult {
            total_hits: 0,
            results: Vec::new(),
        }));

        let (status, body) = send(router(conductor.clone()), "POST", "/workflows/getAll", "").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"totalHits": 0, "results": []}));
        assert_eq!(
            conductor.calls(),
            vec![Call::SearchWorkflows {
                start: 0,
                size: 100,
                free_text: "*".to_string(),
                query: None,
            }]
        );
    }

    #[tokio::test]
    async fn test_start_workflow() {
        let conductor =
            Arc::new(RecordingConductor::new().with_started_workflow_id("wf-42"));

        let (status, body) = send(
            router(conductor.clone()),
            "POST",
            "/workflows/start",
            r#"{"name":"order_flow","version":3,"correlationId":"c-9"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"success": true, "workflowId": "wf-42"}));

        let mut expected = StartWorkflowRequest::new("order_flow");
        expected.version = Some(3);
        expected.correlation_id = Some("c-9".to_string());
        assert_eq!(conductor.calls(), vec![Call::StartWorkflow(expected)]);
    }

    #[tokio::test]
    async fn test_terminate_workflow() {
        let conductor = Arc::new(RecordingConductor::new());

        let (status, body) = send(
            router(conductor.clone()),
            "POST",
            "/workflows/terminate",
            r#"{"workflowId":"wf-1","reason":"duplicate order"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"success": true, "message": "Workflow terminated successfully"})
        );
        assert_eq!(
            conductor.calls(),
            vec![Call::TerminateWorkflow {
                workflow_id: "wf-1".to_string(),
                reason: Some("duplicate order".to_string()),
            }]
        );
    }

    #[tokio::test]
    async fn test_terminate_requires_workflow_id() {
        let (status, body) = send(
            router(Arc::new(RecordingConductor::new())),
            "POST",
            "/workflows/terminate",
            "{}",
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errorMessage"], "missing required parameter: workflowId");
    }
}
