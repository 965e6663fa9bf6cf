use anyhow::{Context, Result};
use conductor_relay_core::ConductorApi;
use conductor_relay_sdk::config::{AUTH_TOKEN_ENV, SERVER_URL_ENV, TIMEOUT_ENV};
use conductor_relay_sdk::{ClientConfig, ConductorClient};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub conductor: ConductorSection,
}

/// `[conductor]` table. Unset keys fall back to the `CONDUCTOR_*` environment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConductorSection {
    pub server_url: Option<String>,
    pub auth_token: Option<String>,
    pub timeout_secs: Option<u64>,
    pub max_retries: Option<u32>,
}

impl ServerConfig {
    pub fn load(config_path: &Path) -> Result<Self> {
        // Load config file if it exists, otherwise use defaults
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)
                .context("Failed to read configuration file")?;
            toml::from_str(&content).context("Failed to parse configuration file")
        } else {
            tracing::info!("Configuration file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Client settings from the process environment and this file
    pub fn client_config(&self) -> Result<ClientConfig> {
        self.client_config_with(|key| std::env::var(key).ok())
    }

    /// Environment values win over file values; blank ones count as unset.
    pub fn client_config_with<F>(&self, env: F) -> Result<ClientConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let section = &self.conductor;
        let lookup = |key: &str| {
            env(key).filter(|v| !v.trim().is_empty()).or_else(|| match key {
                SERVER_URL_ENV => section.server_url.clone(),
                AUTH_TOKEN_ENV => section.auth_token.clone(),
                TIMEOUT_ENV => section.timeout_secs.map(|s| s.to_string()),
                _ => None,
            })
        };

        let mut config =
            ClientConfig::from_lookup(lookup).context("Invalid Conductor client configuration")?;
        if let Some(max_retries) = section.max_retries {
            config.retry_config.max_retries = max_retries;
        }
        Ok(config)
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub client: Arc<dyn ConductorApi>,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let client = ConductorClient::from_config(config.client_config()?)
            .context("Failed to create Conductor client")?;
        tracing::info!(base_url = %client.base_url(), "Conductor client ready");

        Ok(Self::with_client(Arc::new(client)))
    }

    pub fn with_client(client: Arc<dyn ConductorApi>) -> Self {
        Self { client }
    }
}
