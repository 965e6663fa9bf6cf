// Command line entry point: one operation, one envelope on stdout

use conductor_relay_sdk::ConductorClient;
use std::process::ExitCode;

mod runner;

use runner::Invocation;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // stdout carries the envelope only
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let response = match runner::parse_args(std::env::args_os()) {
        Invocation::Run(args) => runner::invoke(&args, connect).await,
        Invocation::Info(info) => {
            let _ = info.print();
            return ExitCode::SUCCESS;
        }
        Invocation::Rejected(response) => response,
    };

    println!("{}", response.to_json());
    ExitCode::from(runner::exit_code(&response))
}

fn connect() -> anyhow::Result<ConductorClient> {
    let client = ConductorClient::from_env()?;
    tracing::debug!(base_url = %client.base_url(), "connected client from environment");
    Ok(client)
}
