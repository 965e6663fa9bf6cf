use crate::config::AppState;
use anyhow::Result;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use conductor_relay_core::{RelayError, SdkResponse};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};

mod handlers;

/// Start the API server
pub async fn serve(addr: &str, state: AppState) -> Result<()> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("API server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the API router
pub(crate) fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        // Event handlers
        .route("/events/add", post(handlers::add_event))
        .route("/events/get", post(handlers::get_events))
        .route("/events/getByName", post(handlers::get_events_by_name))
        .route("/events/update", post(handlers::update_event))
        .route("/events/delete", post(handlers::delete_event))
        // Workflows
        .route("/workflows/get", post(handlers::get_workflow))
        .route("/workflows/getAll", post(handlers::get_workflows))
        .route("/workflows/start", post(handlers::start_workflow))
        .route("/workflows/terminate", post(handlers::terminate_workflow))
        // Middleware
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().include_headers(true))
                .on_response(DefaultOnResponse::new().include_headers(true)),
        )
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

/// Health check endpoint
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "conductor-relay",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Error returned by a handler, rendered as an error envelope
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request body could not be used
    #[error(transparent)]
    BadRequest(#[from] RelayError),

    /// The orchestration service call failed
    #[error(transparent)]
    Downstream(#[from] anyhow::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Downstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(error = %self, "downstream call failed");
        } else {
            tracing::debug!(error = %self, "rejected request");
        }

        (status, Json(SdkResponse::error(self.to_string()))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
