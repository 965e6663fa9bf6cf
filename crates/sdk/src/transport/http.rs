//! HTTP transport layer for the Conductor client.

use crate::config::ClientConfig;
use crate::error::{ConductorError, ConductorResult};
use reqwest::{header, Client, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

/// Header carrying the access token.
pub const AUTH_HEADER: &str = "x-authorization";

/// HTTP transport for making API requests.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    config: Arc<ClientConfig>,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given configuration.
    pub fn new(config: Arc<ClientConfig>) -> ConductorResult<Self> {
        if config.base_url.cannot_be_a_base() {
            return Err(ConductorError::Config(format!(
                "{} cannot be used as a base URL",
                config.base_url
            )));
        }

        let mut headers = header::HeaderMap::new();

        if let Some(ref token) = config.auth_token {
            headers.insert(
                header::HeaderName::from_static(AUTH_HEADER),
                header::HeaderValue::from_str(token)
                    .map_err(|_| ConductorError::Config("Invalid auth token format".to_string()))?,
            );
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self { client, config })
    }

    /// Build a URL by appending percent-encoded path segments to the base URL.
    fn build_url(&self, segments: &[&str]) -> ConductorResult<Url> {
        let mut url = self.config.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ConductorError::Config("base URL cannot have a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Execute a request with retries.
    ///
    /// Retryable statuses and timeouts are retried only for idempotent
    /// methods. A connection failure is retried for any method since the
    /// request never reached the server.
    async fn execute_with_retry(&self, request_builder: RequestBuilder) -> ConductorResult<Response> {
        let retry_config = &self.config.retry_config;
        let request = request_builder.build()?;
        let idempotent = request.method().is_idempotent();
        let mut attempts = 0;

        loop {
            let attempt = request
                .try_clone()
                .ok_or_else(|| ConductorError::Config("Request cannot be cloned".to_string()))?;

            match self.client.execute(attempt).await {
                Ok(response) => {
                    let status = response.status().as_u16();

                    if response.status().is_success() {
                        return Ok(response);
                    }

                    if idempotent
                        && attempts < retry_config.max_retries
                        && retry_config.should_retry_status(status)
                    {
                        let backoff = retry_config.backoff_for_attempt(attempts);
                        warn!(
                            status = status,
                            attempt = attempts + 1,
                            backoff_ms = backoff.as_millis(),
                            "Request failed, retrying"
                        );
                        tokio::time::sleep(backoff).await;
                        attempts += 1;
                        continue;
                    }

                    let body = response.text().await.unwrap_or_default();
                    return Err(ConductorError::from_response(status, &body));
                }
                Err(e) => {
                    let retryable = e.is_connect() || (idempotent && e.is_timeout());
                    if attempts < retry_config.max_retries && retryable {
                        let backoff = retry_config.backoff_for_attempt(attempts);
                        warn!(
                            attempt = attempts + 1,
                            backoff_ms = backoff.as_millis(),
                            error = %e,
                            "Request could not be completed, retrying"
                        );
                        tokio::time::sleep(backoff).await;
                        attempts += 1;
                        continue;
                    }
                    return Err(e.into());
                }
            }
        }
    }

    /// Execute a GET request.
    pub async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> ConductorResult<T> {
        let url = self.build_url(segments)?;
        debug!(url = %url, "GET request");

        let response = self.execute_with_retry(self.client.get(url)).await?;
        decode(response).await
    }

    /// Execute a GET request with query parameters.
    pub async fn get_with_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        query: &Q,
    ) -> ConductorResult<T> {
        let url = self.build_url(segments)?;
        debug!(url = %url, "GET request with query");

        let response = self
            .execute_with_retry(self.client.get(url).query(query))
            .await?;
        decode(response).await
    }

    /// Execute a POST request without a response body.
    pub async fn post_no_response<B: Serialize>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> ConductorResult<()> {
        let url = self.build_url(segments)?;
        debug!(url = %url, "POST request (no response)");

        self.execute_with_retry(self.client.post(url).json(body))
            .await?;
        Ok(())
    }

    /// Execute a POST request whose response is plain text.
    pub async fn post_text<B: Serialize>(&self, segments: &[&str], body: &B) -> ConductorResult<String> {
        let url = self.build_url(segments)?;
        debug!(url = %url, "POST request (text response)");

        let response = self
            .execute_with_retry(self.client.post(url).json(body))
            .await?;
        Ok(response.text().await?)
    }

    /// Execute a PUT request without a response body.
    pub async fn put_no_response<B: Serialize>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> ConductorResult<()> {
        let url = self.build_url(segments)?;
        debug!(url = %url, "PUT request (no response)");

        self.execute_with_retry(self.client.put(url).json(body))
            .await?;
        Ok(())
    }

    /// Execute a DELETE request with query parameters and no response body.
    pub async fn delete_no_response<Q: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        query: &Q,
    ) -> ConductorResult<()> {
        let url = self.build_url(segments)?;
        debug!(url = %url, "DELETE request (no response)");

        self.execute_with_retry(self.client.delete(url).query(query))
            .await?;
        Ok(())
    }
}

/// Decode a JSON response body.
async fn decode<T: DeserializeOwned>(response: Response) -> ConductorResult<T> {
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}
