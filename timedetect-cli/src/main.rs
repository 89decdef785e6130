//! TimeDetect CLI
//!
//! Command-line driver for the TimeDetect demo client: generates synthetic
//! work-time registrations, uploads them to the hosted anomaly-detection
//! API, trains models, and fetches predictions.

mod commands;
mod config;
mod data;
mod generate;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use commands::{Commands, handle_command};
use config::Config;
use timedetect_client::AuthConfig;
use timedetect_simulator::SimulatorConfig;

#[derive(Parser)]
#[command(name = "timedetect")]
#[command(about = "TimeDetect anomaly-detection API demo client", long_about = None)]
struct Cli {
    /// Base URL of the detection API
    #[arg(long, env = "TD_BASE_URL", default_value = "http://localhost:8080")]
    base_url: String,

    /// Tenant namespace for datasets and jobs
    #[arg(long, env = "TD_TENANT_ID", default_value = "demo-tenant")]
    tenant_id: String,

    /// Dataset every workflow operates on
    #[arg(long, env = "TD_DATASET_ID", default_value = "demo-dataset")]
    dataset_id: String,

    /// Directory holding the generated JSON data files
    #[arg(long, env = "TD_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    /// OAuth2 token endpoint
    #[arg(
        long,
        env = "TD_TOKEN_URL",
        default_value = "http://localhost:8080/connect/token"
    )]
    token_url: String,

    /// Client id registered with the identity provider
    #[arg(long, env = "TD_CLIENT_ID", default_value = "demo-client")]
    client_id: String,

    /// Scope granting access to the detection API
    #[arg(long, env = "TD_SCOPE", default_value = "timedetect-api")]
    scope: String,

    /// Seconds between status checks for uploads and training runs
    #[arg(long, env = "TD_POLL_INTERVAL", default_value_t = 5)]
    poll_interval: u64,

    /// Seconds between status checks for batch predictions and streaming
    #[arg(long, env = "TD_STREAM_POLL_INTERVAL", default_value_t = 10)]
    stream_poll_interval: u64,

    /// Give up on a job after this many status checks (default: poll forever)
    #[arg(long, env = "TD_MAX_POLL_ATTEMPTS")]
    max_poll_attempts: Option<u32>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "timedetect_cli=info,timedetect_simulator=info,timedetect_client=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = Config {
        base_url: cli.base_url,
        tenant_id: cli.tenant_id,
        dataset_id: cli.dataset_id,
        data_dir: cli.data_dir,
        auth: AuthConfig {
            token_url: cli.token_url,
            client_id: cli.client_id,
            // The secret is only ever read from the environment so it cannot
            // end up in shell history.
            client_secret: std::env::var("TD_CLIENT_SECRET").unwrap_or_default(),
            scope: cli.scope,
        },
        poll: SimulatorConfig {
            poll_interval: Duration::from_secs(cli.poll_interval),
            stream_poll_interval: Duration::from_secs(cli.stream_poll_interval),
            max_poll_attempts: cli.max_poll_attempts,
        },
    };

    handle_command(cli.command, &config).await
}
