use clap::Parser;
use conductor_relay_core::{execute, prepare, ConductorApi, SdkResponse};
use std::ffi::OsString;

#[derive(Parser, Debug)]
#[command(name = "conductor-relay")]
#[command(about = "Run one Conductor operation and print the result envelope", long_about = None)]
#[command(version)]
pub struct Args {
    /// Operation name, e.g. add-event or get-workflow
    #[arg(short = 'o', long)]
    pub operation: String,

    /// Operation parameters as a JSON object
    #[arg(short = 'p', long)]
    pub parameters: String,

    /// Resource the operation belongs to (event or workflow)
    #[arg(short = 'r', long)]
    pub resource: String,
}

/// Outcome of reading the command line
#[derive(Debug)]
pub enum Invocation {
    /// Arguments parsed, run the operation
    Run(Args),
    /// `--help` or `--version`; print it and exit 0
    Info(clap::Error),
    /// Missing or unknown flags, reported as an error envelope
    Rejected(SdkResponse),
}

pub fn parse_args<I, T>(argv: I) -> Invocation
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Args::try_parse_from(argv) {
        Ok(args) => Invocation::Run(args),
        Err(e) if !e.use_stderr() => Invocation::Info(e),
        Err(e) => {
            tracing::warn!(kind = ?e.kind(), "rejected command line");
            Invocation::Rejected(SdkResponse::error(e.render().to_string().trim_end()))
        }
    }
}

/// Validate the input, then build a client and perform the call.
///
/// Input errors are reported before `connect` runs, so a bad invocation
/// never needs a reachable server.
pub async fn invoke<C, F>(args: &Args, connect: F) -> SdkResponse
where
    C: ConductorApi,
    F: FnOnce() -> anyhow::Result<C>,
{
    let operation = match prepare(&args.resource, &args.operation, &args.parameters) {
        Ok(op) => op,
        Err(e) => {
            tracing::warn!(error = %e, "invalid invocation");
            return SdkResponse::error(e.to_string());
        }
    };

    let client = match connect() {
        Ok(client) => client,
        Err(e) => {
            tracing::warn!(error = %e, "failed to create client");
            return SdkResponse::error(format!("failed to create client: {}", e));
        }
    };

    execute(&client, operation).await
}

/// Process status for an envelope: 0 on success, 1 otherwise
pub fn exit_code(response: &SdkResponse) -> u8 {
    if response.is_success() {
        0
    } else {
        1
    }
}
