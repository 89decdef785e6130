//! TimeDetect HTTP Client
//!
//! A type-safe HTTP client for the hosted time-anomaly-detection API.
//!
//! The client owns two pieces of per-tenant state: a caching bearer-token
//! provider and the id of the most recently dispatched asynchronous job.
//! Every operation that starts a job (upload ingestion, training, batch
//! prediction) clears the tracked id before calling out and stores the new
//! id only on an accepted response, so a status poll can never follow a
//! stale job.
//!
//! # Example
//!
//! ```no_run
//! use timedetect_client::{ApiClient, AuthConfig, TokenProvider};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let tokens = TokenProvider::new(AuthConfig::from_env()?);
//!     let mut client = ApiClient::new("https://api.example.com/td", "my-tenant", tokens);
//!
//!     let job_id = client.start_trainer("my-dataset", true).await?;
//!     println!("training job dispatched: {}", job_id);
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod error;

mod datasets;
mod jobs;
mod predictions;
mod training;

// Re-export commonly used types
pub use auth::{AuthConfig, TokenProvider};
pub use error::{ClientError, Result};

use reqwest::Client;
use serde::de::DeserializeOwned;

/// Header carrying the tenant namespace
pub const TENANT_HEADER: &str = "tenantId";
/// Header carrying a job id on job-scoped calls
pub const JOB_HEADER: &str = "jobId";
/// Header carrying a dataset id on dataset-scoped calls
pub const DATASET_HEADER: &str = "datasetId";

/// HTTP client for the detection API
///
/// One instance serves one tenant. The tracked job id is a single slot:
/// dispatching a new operation invalidates whatever job was tracked before,
/// so at most one asynchronous job is ever followed at a time.
#[derive(Debug)]
pub struct ApiClient {
    /// Base URL of the detection API (e.g., "https://api.example.com/td")
    base_url: String,
    /// Tenant namespace for datasets and jobs
    tenant_id: String,
    /// HTTP client instance
    http: Client,
    /// Bearer-token provider
    tokens: TokenProvider,
    /// Id of the most recently dispatched asynchronous job, if any
    current_job_id: Option<String>,
}

impl ApiClient {
    /// Create a new API client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the detection API
    /// * `tenant_id` - The tenant namespace this client operates in
    /// * `tokens` - The bearer-token provider used on authenticated calls
    pub fn new(
        base_url: impl Into<String>,
        tenant_id: impl Into<String>,
        tokens: TokenProvider,
    ) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            tenant_id: tenant_id.into(),
            http: Client::new(),
            tokens,
            current_job_id: None,
        }
    }

    /// Create a new API client with a custom HTTP client
    ///
    /// This allows configuring timeouts, proxies, TLS settings, etc.
    pub fn with_client(
        base_url: impl Into<String>,
        tenant_id: impl Into<String>,
        tokens: TokenProvider,
        http: Client,
    ) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            tenant_id: tenant_id.into(),
            http,
            tokens,
            current_job_id: None,
        }
    }

    /// Get the base URL of the detection API
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the tenant id this client operates in
    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    /// Id of the asynchronous job currently being tracked, if any
    pub fn current_job_id(&self) -> Option<&str> {
        self.current_job_id.as_deref()
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// Checks the status code and returns an appropriate error if the
    /// request failed, or deserializes the response body if successful.
    pub(crate) async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api(status.as_u16(), message));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::MalformedResponse(e.to_string()))
    }

    /// Convert a non-success response into an API error
    pub(crate) async fn error_for(response: reqwest::Response) -> ClientError {
        let status = response.status().as_u16();
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        ClientError::api(status, message)
    }
}
