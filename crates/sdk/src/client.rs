//! Main client for the orchestration service.

use crate::api::*;
use crate::config::{ClientConfig, RetryConfig};
use crate::error::{ConductorError, ConductorResult};
use crate::transport::HttpTransport;
use conductor_relay_core::types::{
    EventHandler, SearchResult, StartWorkflowRequest, Workflow, WorkflowSummary,
};
use conductor_relay_core::ConductorApi;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Client for the Conductor REST API.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct ConductorClient {
    config: Arc<ClientConfig>,
    pub(crate) http: HttpTransport,
}

impl ConductorClient {
    /// Create a new client builder.
    pub fn builder() -> ConductorClientBuilder {
        ConductorClientBuilder::new()
    }

    /// Create a client from `CONDUCTOR_*` environment variables.
    pub fn from_env() -> ConductorResult<Self> {
        Self::from_config(ClientConfig::from_env()?)
    }

    /// Create a client from configuration.
    pub fn from_config(config: ClientConfig) -> ConductorResult<Self> {
        let config = Arc::new(config);
        let http = HttpTransport::new(config.clone())?;

        tracing::debug!(base_url = %config.base_url, "created conductor client");
        Ok(Self { config, http })
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &Url {
        &self.config.base_url
    }

    /// Get the event handler API.
    pub fn events(&self) -> EventsApi<'_> {
        EventsApi::new(self)
    }

    /// Get the workflow API.
    pub fn workflows(&self) -> WorkflowsApi<'_> {
        WorkflowsApi::new(self)
    }
}

#[async_trait::async_trait]
impl ConductorApi for ConductorClient {
    async fn add_event_handler(&self, handler: EventHandler) -> anyhow::Result<()> {
        Ok(self.events().add(&handler).await?)
    }

    async fn update_event_handler(&self, handler: EventHandler) -> anyhow::Result<()> {
        Ok(self.events().update(&handler).await?)
    }

    async fn get_event_handlers(&self) -> anyhow::Result<Vec<EventHandler>> {
        Ok(self.events().list().await?)
    }

    async fn get_event_handlers_for_event(
        &self,
        event: &str,
        active_only: Option<bool>,
    ) -> anyhow::Result<Vec<EventHandler>> {
        Ok(self.events().list_for_event(event, active_only).await?)
    }

    async fn remove_event_handler(&self, name: &str) -> anyhow::Result<()> {
        Ok(self.events().remove(name).await?)
    }

    async fn get_workflow(&self, workflow_id: &str, include_tasks: bool) -> anyhow::Result<Workflow> {
        Ok(self.workflows().get(workflow_id, include_tasks).await?)
    }

    async fn search_workflows(
        &self,
        start: i32,
        size: i32,
        free_text: &str,
        query: Option<&str>,
    ) -> anyhow::Result<SearchResult<WorkflowSummary>> {
        let search = SearchQuery {
            start,
            size,
            free_text,
            query,
        };
        Ok(self.workflows().search(&search).await?)
    }

    async fn start_workflow(&self, request: StartWorkflowRequest) -> anyhow::Result<String> {
        Ok(self.workflows().start(&request).await?)
    }

    async fn terminate_workflow(&self, workflow_id: &str, reason: Option<&str>) -> anyhow::Result<()> {
        Ok(self.workflows().terminate(workflow_id, reason).await?)
    }
}

/// Builder for creating a ConductorClient.
pub struct ConductorClientBuilder {
    base_url: Option<String>,
    auth_token: Option<String>,
    timeout: Duration,
    retry_config: RetryConfig,
}

impl ConductorClientBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            base_url: None,
            auth_token: None,
            timeout: Duration::from_secs(30),
            retry_config: RetryConfig::default(),
        }
    }

    /// Set the base URL of the orchestration API.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the access token.
    pub fn auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the retry configuration.
    pub fn retry_config(mut self, config: RetryConfig) -> Self {
        self.retry_config = config;
        self
    }

    /// Build the client.
    pub fn build(self) -> ConductorResult<ConductorClient> {
        let base_url_str = self
            .base_url
            .ok_or_else(|| ConductorError::Config("base_url is required".to_string()))?;

        let base_url = Url::parse(&base_url_str)?;

        let config = ClientConfig {
            base_url,
            auth_token: self.auth_token,
            timeout: self.timeout,
            retry_config: self.retry_config,
        };

        ConductorClient::from_config(config)
    }
}

impl Default for ConductorClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
