//! Dataset command handlers

use anyhow::Result;
use clap::Subcommand;
use colored::*;

use crate::config::Config;

/// Dataset subcommands
#[derive(Subcommand)]
pub enum DatasetCommands {
    /// Show dataset inventory
    Info {
        /// Restrict to one dataset id (default: every dataset of the tenant)
        #[arg(long)]
        id: Option<String>,
    },
    /// Delete the configured dataset
    Delete,
}

/// Handle dataset commands
pub async fn handle_dataset_command(command: DatasetCommands, config: &Config) -> Result<()> {
    let mut simulator = config.simulator()?;

    match command {
        DatasetCommands::Info { id } => {
            let inventory = simulator.data_info(id.as_deref()).await?;
            println!("{}", serde_json::to_string_pretty(&inventory)?);
        }
        DatasetCommands::Delete => {
            simulator.delete_dataset().await?;
            println!(
                "{}",
                format!("Dataset {} deleted.", config.dataset_id).green()
            );
        }
    }

    Ok(())
}
