//! Dataset API endpoints: upload via presigned URL, inventory, deletion

use serde_json::Value;
use tracing::{debug, info};

use timedetect_core::domain::registration::Registration;
use timedetect_core::dto::request::UploadPayload;
use timedetect_core::dto::response::PresignedUpload;

use crate::error::Result;
use crate::{ApiClient, DATASET_HEADER, TENANT_HEADER};

impl ApiClient {
    /// Upload registrations into a dataset
    ///
    /// Uploading is a two-step indirection: first request a one-time upload
    /// URL (which also assigns the job id under which ingestion is
    /// tracked), then PUT the filtered payload to that URL. The PUT itself
    /// is unauthenticated; the presigned URL is the credential.
    ///
    /// If the PUT fails the tracked job id is cleared again — the operation
    /// never reached the service, so there is no job to follow.
    ///
    /// # Arguments
    /// * `dataset_id` - The dataset receiving the registrations
    /// * `rows` - Registrations to upload; local-only fields are stripped
    ///
    /// # Returns
    /// The job id under which the ingestion is tracked
    pub async fn upload_data(
        &mut self,
        dataset_id: &str,
        rows: &[Registration],
    ) -> Result<String> {
        let presigned = self.get_presigned_url().await?;
        let payload = UploadPayload::for_dataset(dataset_id, rows)?;

        let outcome = self.http.put(&presigned.url).json(&payload).send().await;
        let response = match outcome {
            Ok(response) => response,
            Err(e) => {
                self.current_job_id = None;
                return Err(e.into());
            }
        };

        if !response.status().is_success() {
            self.current_job_id = None;
            return Err(Self::error_for(response).await);
        }

        info!("raw data uploaded successfully");
        Ok(presigned.job_id)
    }

    /// Request a one-time upload URL and a new ingestion job id
    async fn get_presigned_url(&mut self) -> Result<PresignedUpload> {
        self.current_job_id = None;
        let token = self.tokens.get_token().await?;

        let url = format!("{}/presigned_url", self.base_url);
        let response = self
            .http
            .get(&url)
            .header(TENANT_HEADER, &self.tenant_id)
            .bearer_auth(token)
            .send()
            .await?;

        let presigned: PresignedUpload = self.handle_response(response).await?;
        debug!(job_id = %presigned.job_id, "received presigned upload target");
        self.current_job_id = Some(presigned.job_id.clone());
        Ok(presigned)
    }

    /// Fetch dataset inventory metadata
    ///
    /// # Arguments
    /// * `dataset_id` - Restrict the inventory to one dataset; `None` lists
    ///   every dataset of the tenant
    pub async fn get_data_info(&mut self, dataset_id: Option<&str>) -> Result<Value> {
        let token = self.tokens.get_token().await?;

        let url = format!("{}/data", self.base_url);
        let mut request = self
            .http
            .get(&url)
            .header(TENANT_HEADER, &self.tenant_id)
            .bearer_auth(token);
        if let Some(dataset_id) = dataset_id {
            request = request.header(DATASET_HEADER, dataset_id);
        }
        let response = request.send().await?;

        self.handle_response(response).await
    }

    /// Delete a dataset
    ///
    /// Deletion is synchronous; no job is created and the tracked job id is
    /// left untouched.
    pub async fn delete_dataset(&mut self, dataset_id: &str) -> Result<Value> {
        let token = self.tokens.get_token().await?;

        let url = format!("{}/data/{}", self.base_url, dataset_id);
        let response = self
            .http
            .delete(&url)
            .header(TENANT_HEADER, &self.tenant_id)
            .header(DATASET_HEADER, dataset_id)
            .bearer_auth(token)
            .send()
            .await?;

        self.handle_response(response).await
    }
}
