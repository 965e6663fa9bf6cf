//! Event handler API endpoints.

use crate::client::ConductorClient;
use crate::error::ConductorResult;
use conductor_relay_core::types::EventHandler;

/// Event API for registering and querying event handlers.
pub struct EventsApi<'a> {
    client: &'a ConductorClient,
}

impl<'a> EventsApi<'a> {
    pub(crate) fn new(client: &'a ConductorClient) -> Self {
        Self { client }
    }

    /// Register a new event handler.
    pub async fn add(&self, handler: &EventHandler) -> ConductorResult<()> {
        self.client.http.post_no_response(&["event"], handler).await
    }

    /// Replace an existing event handler.
    pub async fn update(&self, handler: &EventHandler) -> ConductorResult<()> {
        self.client.http.put_no_response(&["event"], handler).await
    }

    /// List all event handlers.
    pub async fn list(&self) -> ConductorResult<Vec<EventHandler>> {
        self.client.http.get(&["event"]).await
    }

    /// List handlers registered for an event, optionally only active ones.
    pub async fn list_for_event(
        &self,
        event: &str,
        active_only: Option<bool>,
    ) -> ConductorResult<Vec<EventHandler>> {
        let query: Vec<(&str, bool)> = active_only.map(|a| ("activeOnly", a)).into_iter().collect();
        self.client
            .http
            .get_with_query(&["event", event], &query)
            .await
    }

    /// Remove an event handler by name.
    pub async fn remove(&self, name: &str) -> ConductorResult<()> {
        let no_query: [(&str, &str); 0] = [];
        self.client
            .http
            .delete_no_response(&["event", name], &no_query)
            .await
    }
}
