//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod dataset;
mod generate;
mod run;

pub use dataset::DatasetCommands;
pub use generate::GenerateArgs;

use std::path::PathBuf;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Generate synthetic registration data files
    Generate(GenerateArgs),
    /// Check that the detection API is reachable
    Health,
    /// Upload a data file and wait for ingestion to finish
    Upload {
        /// Registrations file (default: train_data.json in the data directory)
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Train models on the uploaded dataset and wait for completion
    Train {
        /// Update existing models instead of rebuilding from scratch
        #[arg(long)]
        incremental: bool,
    },
    /// Request batch predictions and wait for the scored results
    Predict {
        /// Registrations file (default: predict_data.json in the data directory)
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Request synchronous real-time predictions
    PredictRt {
        /// Registrations file (default: predict_data.json in the data directory)
        #[arg(long)]
        file: Option<PathBuf>,

        /// Number of registrations to send
        #[arg(long, default_value_t = 1)]
        rows: usize,
    },
    /// Replay a data file one day at a time (upload + incremental retrain)
    Stream {
        /// Registrations file (default: predict_data.json in the data directory)
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Replay a data file one day at a time, predicting before each upload
    StreamPredict {
        /// Registrations file (default: predict_data.json in the data directory)
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Dataset management
    Dataset {
        #[command(subcommand)]
        command: DatasetCommands,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Generate(args) => generate::handle_generate(args, config),
        Commands::Health => run::health(config).await,
        Commands::Upload { file } => run::upload(config, file).await,
        Commands::Train { incremental } => run::train(config, incremental).await,
        Commands::Predict { file } => run::predict(config, file).await,
        Commands::PredictRt { file, rows } => run::predict_realtime(config, file, rows).await,
        Commands::Stream { file } => run::stream(config, file).await,
        Commands::StreamPredict { file } => run::stream_predict(config, file).await,
        Commands::Dataset { command } => dataset::handle_dataset_command(command, config).await,
    }
}
