//! CLI configuration
//!
//! Everything a command handler needs to talk to the detection API and find
//! the local data files.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use timedetect_client::{ApiClient, AuthConfig, TokenProvider};
use timedetect_simulator::{ClientSimulator, SimulatorConfig};

/// Default file written by `generate` and read by `upload`
pub const TRAIN_FILE: &str = "train_data.json";
/// Default file written by `generate` and read by the prediction commands
pub const PREDICT_FILE: &str = "predict_data.json";

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the detection API
    pub base_url: String,
    /// Tenant namespace for datasets and jobs
    pub tenant_id: String,
    /// Dataset every workflow operates on
    pub dataset_id: String,
    /// Directory holding the generated JSON data files
    pub data_dir: PathBuf,
    /// Token-endpoint configuration
    pub auth: AuthConfig,
    /// Polling cadence and attempt cap
    pub poll: SimulatorConfig,
}

impl Config {
    /// Build an API client without validating credentials
    ///
    /// Used by commands that never authenticate (health check).
    pub fn api_client(&self) -> ApiClient {
        let tokens = TokenProvider::new(self.auth.clone());
        ApiClient::new(&self.base_url, &self.tenant_id, tokens)
    }

    /// Build a simulator for the configured tenant and dataset
    pub fn simulator(&self) -> Result<ClientSimulator> {
        self.auth
            .validate()
            .context("invalid token configuration (is TD_CLIENT_SECRET set?)")?;
        self.poll
            .validate()
            .context("invalid polling configuration")?;
        Ok(ClientSimulator::new(
            self.api_client(),
            &self.dataset_id,
            self.poll.clone(),
        ))
    }

    /// Resolve a data file: an explicit path wins, otherwise the named file
    /// inside the data directory
    pub fn data_file(&self, explicit: Option<PathBuf>, default_name: &str) -> PathBuf {
        explicit.unwrap_or_else(|| self.data_dir.join(default_name))
    }

    /// The data directory
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
