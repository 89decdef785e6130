//! Training API endpoints

use reqwest::StatusCode;
use tracing::info;

use timedetect_core::dto::request::TrainingRequest;
use timedetect_core::dto::response::JobAccepted;

use crate::error::{ClientError, Result};
use crate::{ApiClient, TENANT_HEADER};

impl ApiClient {
    /// Start a training run on a dataset
    ///
    /// # Arguments
    /// * `dataset_id` - The dataset to train on
    /// * `rebuild_models` - `true` rebuilds models from scratch, `false`
    ///   updates them incrementally
    ///
    /// # Returns
    /// The job id of the accepted training run. Any response other than
    /// 202 Accepted is an error and leaves no job tracked.
    pub async fn start_trainer(
        &mut self,
        dataset_id: &str,
        rebuild_models: bool,
    ) -> Result<String> {
        self.current_job_id = None;
        let token = self.tokens.get_token().await?;

        let url = format!("{}/start_trainer", self.base_url);
        let request = TrainingRequest::for_dataset(dataset_id, rebuild_models);
        let response = self
            .http
            .post(&url)
            .header(TENANT_HEADER, &self.tenant_id)
            .bearer_auth(token)
            .json(&request)
            .send()
            .await?;

        if response.status() != StatusCode::ACCEPTED {
            return Err(Self::error_for(response).await);
        }

        let accepted: JobAccepted = response
            .json()
            .await
            .map_err(|e| ClientError::MalformedResponse(e.to_string()))?;
        info!(job_id = %accepted.job_id, "trainer started successfully");
        self.current_job_id = Some(accepted.job_id.clone());
        Ok(accepted.job_id)
    }
}
