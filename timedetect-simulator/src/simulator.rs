//! Client simulator
//!
//! Drives the detection API the way a real integration would: dispatch an
//! asynchronous job, then poll its status until it either succeeds or
//! vanishes. A vanished job (nothing tracked, nothing to ask about) is
//! terminal failure; every other non-success status keeps the poll alive.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use serde_json::Value;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use timedetect_client::{ApiClient, ClientError};
use timedetect_core::domain::job::JobStatusReport;
use timedetect_core::domain::prediction::Prediction;
use timedetect_core::domain::registration::Registration;

use crate::config::SimulatorConfig;
use crate::outcome::{
    JobOutcome, PredictOutcome, StreamDayReport, StreamReport, StreamedPrediction, WorkflowPhase,
};

/// Simulates one client (one tenant, one dataset) calling the detection API
pub struct ClientSimulator {
    api: ApiClient,
    dataset_id: String,
    config: SimulatorConfig,
    phase: WorkflowPhase,
    last_status: Option<JobStatusReport>,
}

impl ClientSimulator {
    /// Creates a new simulator
    ///
    /// # Arguments
    /// * `api` - The API client; the simulator takes ownership of its job
    ///   tracking slot
    /// * `dataset_id` - The dataset every workflow operates on
    /// * `config` - Polling cadence and attempt cap
    pub fn new(api: ApiClient, dataset_id: impl Into<String>, config: SimulatorConfig) -> Self {
        Self {
            api,
            dataset_id: dataset_id.into(),
            config,
            phase: WorkflowPhase::Idle,
            last_status: None,
        }
    }

    /// Observable state of the current (or most recent) workflow
    pub fn phase(&self) -> WorkflowPhase {
        self.phase
    }

    /// The last status report seen during the most recent workflow
    pub fn last_status(&self) -> Option<&JobStatusReport> {
        self.last_status.as_ref()
    }

    /// The underlying API client
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    // =============================================================================
    // Workflows
    // =============================================================================

    /// Upload registrations and wait for ingestion to finish
    pub async fn upload_data(&mut self, rows: &[Registration]) -> JobOutcome {
        info!("uploading {} registrations", rows.len());
        self.upload_and_poll(rows, self.config.poll_interval).await
    }

    /// Start a training run and wait for it to finish
    ///
    /// # Arguments
    /// * `rebuild` - `true` rebuilds models from scratch, `false` updates
    ///   them with data uploaded since the last run
    pub async fn start_training(&mut self, rebuild: bool) -> JobOutcome {
        info!(rebuild, "training");
        self.train_and_poll(rebuild, self.config.poll_interval).await
    }

    /// Request batch predictions for `rows` and collect the scored results
    ///
    /// The aggregation hint sent along is the distinct set of employee ids
    /// present in `rows`.
    pub async fn predict(&mut self, rows: &[Registration]) -> PredictOutcome {
        info!("predicting {} registrations", rows.len());
        let employee_ids = distinct_employee_ids(rows);
        self.predict_with_hint(rows, &employee_ids, self.config.stream_poll_interval)
            .await
    }

    /// Score registrations synchronously, without a job or polling
    ///
    /// Transport and decoding failures come back as the tagged client error
    /// so the caller can degrade gracefully.
    pub async fn predict_realtime(
        &mut self,
        rows: &[Registration],
    ) -> Result<Vec<Prediction>, ClientError> {
        info!("requesting real-time predictions for {} registrations", rows.len());
        self.reset();
        let dataset_id = self.dataset_id.clone();
        match self.api.get_real_time_predictions(&dataset_id, rows).await {
            Ok(scored) => {
                self.phase = WorkflowPhase::Succeeded;
                info!("got {} real-time results", scored.len());
                Ok(scored)
            }
            Err(e) => {
                self.phase = WorkflowPhase::Failed;
                error!("real-time prediction failed: {e}");
                Err(e)
            }
        }
    }

    /// Replay registrations one date at a time: upload the day's rows, wait,
    /// then retrain incrementally and wait
    ///
    /// Dates are processed in ascending order. A failed step is recorded in
    /// the day's report and the remaining dates still run.
    pub async fn stream_day_by_day(&mut self, rows: &[Registration]) -> Vec<StreamDayReport> {
        info!("streaming {} registrations day by day", rows.len());
        let days = partition_by_date(rows);
        let mut reports = Vec::with_capacity(days.len());

        for (date, day_rows) in days {
            info!(%date, "streaming day");
            let upload = self
                .upload_and_poll(&day_rows, self.config.stream_poll_interval)
                .await;
            if !upload.is_success() {
                warn!(%date, "upload did not complete");
            }

            info!(%date, "updating models");
            let training = self
                .train_and_poll(false, self.config.stream_poll_interval)
                .await;
            if !training.is_success() {
                warn!(%date, "incremental training did not complete");
            }

            reports.push(StreamDayReport {
                date,
                upload,
                training,
            });
        }

        reports
    }

    /// Replay registrations one date at a time the way a client closes out a
    /// working day: predict on the new data, upload it, then update models
    ///
    /// Collected prediction batches are tagged with a 1-based sequence
    /// number. After the last date the report lists every input
    /// registration id that never received a prediction.
    pub async fn stream_and_predict_day_by_day(
        &mut self,
        rows: &[Registration],
        employee_ids: Option<Vec<String>>,
    ) -> StreamReport {
        info!("streaming and predicting day by day");
        let employee_ids = employee_ids.unwrap_or_else(|| distinct_employee_ids(rows));
        let mut call_count = 0u32;
        let mut collected: Vec<StreamedPrediction> = Vec::new();

        for (date, day_rows) in partition_by_date(rows) {
            info!(%date, "predicting");
            match self
                .predict_with_hint(&day_rows, &employee_ids, self.config.poll_interval)
                .await
            {
                PredictOutcome::Completed(batch) => {
                    call_count += 1;
                    collected.extend(batch.into_iter().map(|prediction| StreamedPrediction {
                        call_count,
                        prediction,
                    }));
                }
                PredictOutcome::Failed { last_status } => {
                    warn!(%date, ?last_status, "prediction step failed");
                }
            }

            info!(%date, "uploading");
            let upload = self.upload_and_poll(&day_rows, self.config.poll_interval).await;
            if !upload.is_success() {
                warn!(%date, "upload did not complete");
            }

            info!(%date, "updating models");
            let training = self.train_and_poll(false, self.config.poll_interval).await;
            if !training.is_success() {
                warn!(%date, "incremental training did not complete");
            }
        }

        let lost = lost_registrations(rows, &collected);
        if !lost.is_empty() {
            warn!(
                "{} registrations did not receive any predictions",
                lost.len()
            );
        }

        StreamReport {
            rows: collected,
            lost,
        }
    }

    /// Delete the dataset, logging the tenant's inventory before and after
    pub async fn delete_dataset(&mut self) -> Result<(), ClientError> {
        info!("deleting dataset {}", self.dataset_id);
        let dataset_id = self.dataset_id.clone();

        match self.api.get_data_info(None).await {
            Ok(inventory) => info!("datasets before: {inventory}"),
            Err(e) => warn!("could not list datasets before deletion: {e}"),
        }

        self.api.delete_dataset(&dataset_id).await?;

        match self.api.get_data_info(None).await {
            Ok(inventory) => info!("datasets after: {inventory}"),
            Err(e) => warn!("could not list datasets after deletion: {e}"),
        }

        Ok(())
    }

    /// Fetch dataset inventory metadata
    pub async fn data_info(&mut self, dataset_id: Option<&str>) -> Result<Value, ClientError> {
        self.api.get_data_info(dataset_id).await
    }

    // =============================================================================
    // Dispatch + Poll
    // =============================================================================

    async fn upload_and_poll(&mut self, rows: &[Registration], interval: Duration) -> JobOutcome {
        self.reset();
        let dataset_id = self.dataset_id.clone();
        match self.api.upload_data(&dataset_id, rows).await {
            Ok(job_id) => {
                debug!(%job_id, "upload dispatched");
                self.phase = WorkflowPhase::Dispatched;
            }
            Err(e) => error!("upload dispatch failed: {e}"),
        }
        self.poll_job(interval).await
    }

    async fn train_and_poll(&mut self, rebuild: bool, interval: Duration) -> JobOutcome {
        self.reset();
        let dataset_id = self.dataset_id.clone();
        match self.api.start_trainer(&dataset_id, rebuild).await {
            Ok(job_id) => {
                debug!(%job_id, "trainer dispatched");
                self.phase = WorkflowPhase::Dispatched;
            }
            Err(e) => error!("trainer dispatch failed: {e}"),
        }
        self.poll_job(interval).await
    }

    async fn predict_with_hint(
        &mut self,
        rows: &[Registration],
        employee_ids: &[String],
        interval: Duration,
    ) -> PredictOutcome {
        self.reset();
        let dataset_id = self.dataset_id.clone();
        match self
            .api
            .create_predictions(&dataset_id, rows, employee_ids)
            .await
        {
            Ok(job_id) => {
                debug!(%job_id, "prediction dispatched");
                self.phase = WorkflowPhase::Dispatched;
            }
            Err(e) => error!("prediction dispatch failed: {e}"),
        }

        match self.poll_job(interval).await {
            JobOutcome::Success => match self.api.get_results().await {
                Ok(envelope) => match envelope.into_predictions() {
                    Some(scored) => {
                        info!("got {} results", scored.len());
                        PredictOutcome::Completed(scored)
                    }
                    None => {
                        error!("results envelope held no prediction set");
                        PredictOutcome::Failed {
                            last_status: self.last_status.clone(),
                        }
                    }
                },
                Err(e) => {
                    error!("fetching results failed: {e}");
                    PredictOutcome::Failed {
                        last_status: self.last_status.clone(),
                    }
                }
            },
            JobOutcome::Failed { last_status } => {
                warn!("something wrong with predictions");
                PredictOutcome::Failed { last_status }
            }
        }
    }

    /// Poll the tracked job until it succeeds or vanishes.
    ///
    /// Waits a full interval before the first check. Only a `success` report
    /// or a missing job ends the loop; transient transport errors and every
    /// other status keep it alive, up to the configured attempt cap if one
    /// is set.
    async fn poll_job(&mut self, interval: Duration) -> JobOutcome {
        self.phase = WorkflowPhase::Polling;
        let mut attempts = 0u32;

        loop {
            sleep(interval).await;
            attempts += 1;

            match self.api.get_job_status().await {
                Ok(report) => {
                    if self.last_status.as_ref() != Some(&report) {
                        info!(report = %render_report(&report), "job status changed");
                    }
                    let success = report.is_success();
                    self.last_status = Some(report);
                    if success {
                        info!("job finished successfully");
                        self.phase = WorkflowPhase::Succeeded;
                        return JobOutcome::Success;
                    }
                }
                Err(ClientError::JobAbsent) => {
                    warn!("no job is tracked; treating as failed");
                    self.phase = WorkflowPhase::Failed;
                    return JobOutcome::Failed {
                        last_status: self.last_status.clone(),
                    };
                }
                Err(e) => warn!("status check failed: {e}"),
            }

            if let Some(cap) = self.config.max_poll_attempts {
                if attempts >= cap {
                    warn!("giving up after {attempts} status checks");
                    self.phase = WorkflowPhase::Failed;
                    return JobOutcome::Failed {
                        last_status: self.last_status.clone(),
                    };
                }
            }
        }
    }

    fn reset(&mut self) {
        self.phase = WorkflowPhase::Idle;
        self.last_status = None;
    }
}

fn render_report(report: &JobStatusReport) -> String {
    serde_json::to_string(report).unwrap_or_else(|_| format!("{report:?}"))
}

/// Group registrations by date, ascending.
///
/// Dates are ISO `YYYY-MM-DD` strings, so the map's lexicographic key order
/// is chronological order.
fn partition_by_date(rows: &[Registration]) -> BTreeMap<String, Vec<Registration>> {
    let mut days: BTreeMap<String, Vec<Registration>> = BTreeMap::new();
    for row in rows {
        days.entry(row.date.clone()).or_default().push(row.clone());
    }
    days
}

/// Distinct employee ids present in `rows`
fn distinct_employee_ids(rows: &[Registration]) -> Vec<String> {
    let ids: BTreeSet<&str> = rows.iter().map(|row| row.employee_id.as_str()).collect();
    ids.into_iter().map(str::to_string).collect()
}

/// Input registration ids that appear in no collected batch
fn lost_registrations(
    inputs: &[Registration],
    collected: &[StreamedPrediction],
) -> BTreeSet<String> {
    let seen: BTreeSet<&str> = collected
        .iter()
        .map(|row| row.prediction.registration_id.as_str())
        .collect();
    inputs
        .iter()
        .filter(|row| !seen.contains(row.registration_id.as_str()))
        .map(|row| row.registration_id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn registration(id: &str, date: &str, employee: &str) -> Registration {
        serde_json::from_value(json!({
            "registrationId": id,
            "date": date,
            "employeeId": employee,
            "projectId": "project-a",
            "departmentId": "department-x",
            "workCategory": "development",
            "startTime": 8.0,
            "endTime": 16.0,
            "workDuration": 7.5,
            "breakDuration": 0.5,
            "publicHoliday": false,
            "numericals": [],
        }))
        .unwrap()
    }

    fn streamed(id: &str, call_count: u32) -> StreamedPrediction {
        StreamedPrediction {
            call_count,
            prediction: serde_json::from_value(json!({
                "registrationId": id,
                "anomalyScore": 0.5,
            }))
            .unwrap(),
        }
    }

    #[test]
    fn test_partition_by_date_is_ascending() {
        let rows = vec![
            registration("reg-2", "2023-04-05", "employee-0"),
            registration("reg-0", "2023-04-03", "employee-0"),
            registration("reg-1", "2023-04-04", "employee-1"),
            registration("reg-3", "2023-04-03", "employee-1"),
        ];

        let days = partition_by_date(&rows);
        let dates: Vec<&String> = days.keys().collect();
        assert_eq!(dates, ["2023-04-03", "2023-04-04", "2023-04-05"]);
        assert_eq!(days["2023-04-03"].len(), 2);
    }

    #[test]
    fn test_distinct_employee_ids_deduplicates() {
        let rows = vec![
            registration("reg-0", "2023-04-03", "employee-1"),
            registration("reg-1", "2023-04-03", "employee-0"),
            registration("reg-2", "2023-04-04", "employee-1"),
        ];

        let ids = distinct_employee_ids(&rows);
        assert_eq!(ids, ["employee-0", "employee-1"]);
    }

    #[test]
    fn test_lost_registrations_is_the_set_difference() {
        let inputs = vec![
            registration("reg-0", "2023-04-03", "employee-0"),
            registration("reg-1", "2023-04-03", "employee-1"),
            registration("reg-2", "2023-04-04", "employee-0"),
        ];
        let collected = vec![streamed("reg-0", 1), streamed("reg-2", 2)];

        let lost = lost_registrations(&inputs, &collected);
        assert_eq!(lost.into_iter().collect::<Vec<_>>(), ["reg-1"]);
    }

    #[test]
    fn test_no_predictions_means_everything_is_lost() {
        let inputs = vec![
            registration("reg-0", "2023-04-03", "employee-0"),
            registration("reg-1", "2023-04-03", "employee-1"),
        ];

        let lost = lost_registrations(&inputs, &[]);
        assert_eq!(lost.len(), 2);
    }
}
