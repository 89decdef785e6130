//! Job domain types
//!
//! A job is the server-side handle for one asynchronous operation (upload
//! ingestion, a training run, a batch prediction run). The service assigns
//! opaque job ids in its 202 Accepted responses and reports progress through
//! the status endpoint.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Server-reported job status
///
/// The status vocabulary belongs to the service; anything this client does
/// not know about decodes as [`JobStatus::Unknown`]. Only `success` ends a
/// poll loop — every other status keeps it alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Success,
    Failure,
    #[serde(other)]
    Unknown,
}

/// Decoded body of a status query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatusReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Additional report keys the service may attach
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl JobStatusReport {
    /// Whether this report marks the job as finished successfully
    pub fn is_success(&self) -> bool {
        self.status == JobStatus::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_known_statuses_decode() {
        let report: JobStatusReport =
            serde_json::from_value(json!({"jobId": "job-1", "status": "success"})).unwrap();
        assert_eq!(report.status, JobStatus::Success);
        assert!(report.is_success());

        let report: JobStatusReport =
            serde_json::from_value(json!({"status": "pending"})).unwrap();
        assert_eq!(report.status, JobStatus::Pending);
        assert!(!report.is_success());
    }

    #[test]
    fn test_unrecognized_status_decodes_as_unknown() {
        let report: JobStatusReport =
            serde_json::from_value(json!({"status": "validating", "progress": 0.4})).unwrap();
        assert_eq!(report.status, JobStatus::Unknown);
        assert!(!report.is_success());
        assert_eq!(report.extra.get("progress"), Some(&json!(0.4)));
    }
}
