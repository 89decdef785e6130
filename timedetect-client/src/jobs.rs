//! Job-scoped API endpoints: health, status polling, result retrieval

use timedetect_core::domain::job::JobStatusReport;
use timedetect_core::dto::response::ResultsEnvelope;

use crate::error::{ClientError, Result};
use crate::{ApiClient, JOB_HEADER, TENANT_HEADER};

impl ApiClient {
    /// Check that the detection API is reachable
    ///
    /// # Returns
    /// The HTTP status code of the health endpoint; no authentication
    pub async fn health_check(&self) -> Result<u16> {
        let url = format!("{}/health_check", self.base_url);
        let response = self.http.get(&url).send().await?;
        Ok(response.status().as_u16())
    }

    /// Query the status of the currently tracked job
    ///
    /// # Returns
    /// The decoded status report, or [`ClientError::JobAbsent`] when no job
    /// id is tracked — callers treat that as an immediately terminal
    /// failure.
    pub async fn get_job_status(&mut self) -> Result<JobStatusReport> {
        let job_id = self
            .current_job_id
            .clone()
            .ok_or(ClientError::JobAbsent)?;
        let token = self.tokens.get_token().await?;

        let url = format!("{}/status", self.base_url);
        let response = self
            .http
            .get(&url)
            .header(TENANT_HEADER, &self.tenant_id)
            .header(JOB_HEADER, &job_id)
            .bearer_auth(token)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Fetch the results of the currently tracked job
    ///
    /// # Returns
    /// The raw results envelope; consumers unpack the nested prediction set
    pub async fn get_results(&mut self) -> Result<ResultsEnvelope> {
        let job_id = self
            .current_job_id
            .clone()
            .ok_or(ClientError::JobAbsent)?;
        let token = self.tokens.get_token().await?;

        let url = format!("{}/results", self.base_url);
        let response = self
            .http
            .get(&url)
            .header(TENANT_HEADER, &self.tenant_id)
            .header(JOB_HEADER, &job_id)
            .bearer_auth(token)
            .send()
            .await?;

        self.handle_response(response).await
    }
}
