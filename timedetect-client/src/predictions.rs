//! Prediction API endpoints: batch dispatch and real-time scoring

use reqwest::StatusCode;
use tracing::info;

use timedetect_core::domain::prediction::Prediction;
use timedetect_core::domain::registration::Registration;
use timedetect_core::dto::request::PredictionRequest;
use timedetect_core::dto::response::{JobAccepted, ResultsEnvelope};

use crate::error::{ClientError, Result};
use crate::{ApiClient, TENANT_HEADER};

impl ApiClient {
    /// Dispatch a batch-prediction job
    ///
    /// # Arguments
    /// * `dataset_id` - The dataset whose models score the registrations
    /// * `rows` - Registrations to score; local-only fields are stripped
    /// * `employee_ids` - Aggregation hint: the distinct employees present
    ///   in `rows`
    ///
    /// # Returns
    /// The job id of the accepted prediction run. Any response other than
    /// 202 Accepted is an error and leaves no job tracked.
    pub async fn create_predictions(
        &mut self,
        dataset_id: &str,
        rows: &[Registration],
        employee_ids: &[String],
    ) -> Result<String> {
        self.current_job_id = None;
        let token = self.tokens.get_token().await?;

        let url = format!("{}/create_prediction", self.base_url);
        let request = PredictionRequest::batch(dataset_id, rows, employee_ids)?;
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
        info!(job_id = %accepted.job_id, "prediction job started successfully");
        self.current_job_id = Some(accepted.job_id.clone());
        Ok(accepted.job_id)
    }

    /// Score registrations synchronously
    ///
    /// No job is created and nothing is polled; the predictions come back
    /// inline. An envelope without a result set is a malformed response.
    pub async fn get_real_time_predictions(
        &mut self,
        dataset_id: &str,
        rows: &[Registration],
    ) -> Result<Vec<Prediction>> {
        let token = self.tokens.get_token().await?;

        let url = format!("{}/real_time_prediction", self.base_url);
        let request = PredictionRequest::real_time(dataset_id, rows)?;
        let response = self
            .http
            .post(&url)
            .header(TENANT_HEADER, &self.tenant_id)
            .bearer_auth(token)
            .json(&request)
            .send()
            .await?;

        let envelope: ResultsEnvelope = self.handle_response(response).await?;
        envelope.into_predictions().ok_or_else(|| {
            ClientError::MalformedResponse("results envelope held no prediction set".to_string())
        })
    }
}
