//! Basic SDK usage example.
//!
//! Registers an event handler, starts a workflow and polls it until it
//! finishes. Point `CONDUCTOR_SERVER_URL` at a running server first.
//!
//! Run with: cargo run --example basic_usage

use conductor_relay_sdk::api::SearchQuery;
use conductor_relay_sdk::{ConductorClient, ConductorResult, EventHandler, StartWorkflowRequest};
use std::time::Duration;

#[tokio::main]
async fn main() -> ConductorResult<()> {
    tracing_subscriber::fmt::init();

    let client = ConductorClient::from_env()?;
    println!("Using {}", client.base_url());

    let handler = EventHandler::new("order_placed_handler", "kafka:orders", true)
        .with_condition("$.amount > 100");
    client.events().add(&handler).await?;
    println!("Registered handler {}", handler.name);

    for h in client.events().list_for_event("kafka:orders", Some(true)).await? {
        println!("  {} -> {} (active: {})", h.name, h.event, h.active);
    }

    let mut request = StartWorkflowRequest::new("order_flow");
    request.version = Some(1);
    request.correlation_id = Some("order-42".to_string());
    let workflow_id = client.workflows().start(&request).await?;
    println!("\nStarted workflow {}", workflow_id);

    for _ in 0..10 {
        let workflow = client.workflows().get(&workflow_id, false).await?;
        println!("Status: {:?}", workflow.status);
        if workflow.status.is_terminal() {
            break;
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    let recent = client
        .workflows()
        .search(&SearchQuery {
            start: 0,
            size: 10,
            free_text: "*",
            query: None,
        })
        .await?;
    println!("\n{} workflows on the server", recent.total_hits);

    client.events().remove(&handler.name).await?;
    println!("Removed handler {}", handler.name);

    Ok(())
}
