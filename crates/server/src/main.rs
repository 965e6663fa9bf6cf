use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

mod api;
mod config;

use config::{AppState, ServerConfig};

#[derive(Parser, Debug)]
#[command(name = "conductor-relay-server")]
#[command(about = "HTTP relay for Conductor event and workflow operations", long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, env = "CONDUCTOR_RELAY_CONFIG", default_value = "conductor-relay.toml")]
    config: PathBuf,

    /// Port to listen on
    #[arg(short, long, env = "CONDUCTOR_RELAY_PORT", default_value = "8081")]
    port: u16,

    /// Host to bind to
    #[arg(long, env = "CONDUCTOR_RELAY_HOST", default_value = "127.0.0.1")]
    host: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "conductor_relay=info,tower_http=debug".into()),
        )
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    let args = Args::parse();

    tracing::info!("Starting Conductor relay server");

    let config = ServerConfig::load(&args.config)?;
    let state = AppState::new(&config)?;

    let addr = format!("{}:{}", args.host, args.port);
    tracing::info!("Starting API server on {}", addr);

    api::serve(&addr, state).await?;

    Ok(())
}
