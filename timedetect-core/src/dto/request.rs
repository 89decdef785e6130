//! Request bodies sent to the detection API
//!
//! Constructors on these types are the only way registrations enter a
//! payload, which guarantees the wire filter is applied on every path.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::registration::Registration;
use crate::dto::wire;

/// Body PUT to a presigned upload URL
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadPayload {
    pub datasets: Vec<DatasetUpload>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetUpload {
    pub dataset_id: String,
    pub registrations: Vec<Value>,
}

impl UploadPayload {
    /// Build an upload payload for one dataset
    pub fn for_dataset(
        dataset_id: impl Into<String>,
        rows: &[Registration],
    ) -> serde_json::Result<Self> {
        Ok(Self {
            datasets: vec![DatasetUpload {
                dataset_id: dataset_id.into(),
                registrations: wire::wire_registrations(rows)?,
            }],
        })
    }
}

/// Body of a `start_trainer` call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingRequest {
    pub parameters: Vec<TrainingParameters>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingParameters {
    pub dataset_id: String,
    pub rebuild_models: bool,
}

impl TrainingRequest {
    pub fn for_dataset(dataset_id: impl Into<String>, rebuild_models: bool) -> Self {
        Self {
            parameters: vec![TrainingParameters {
                dataset_id: dataset_id.into(),
                rebuild_models,
            }],
        }
    }
}

/// Body of a `create_prediction` or `real_time_prediction` call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub parameters: Vec<PredictionParameters>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionParameters {
    pub dataset_id: String,
    pub registrations: Vec<Value>,
    /// Employee ids the service should aggregate over. Batch predictions
    /// send the distinct employees present in the input; the real-time
    /// endpoint takes no hint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregate_for_employee_ids: Option<Vec<String>>,
}

impl PredictionRequest {
    /// Build a batch-prediction request with an employee aggregation hint
    pub fn batch(
        dataset_id: impl Into<String>,
        rows: &[Registration],
        employee_ids: &[String],
    ) -> serde_json::Result<Self> {
        Ok(Self {
            parameters: vec![PredictionParameters {
                dataset_id: dataset_id.into(),
                registrations: wire::wire_registrations(rows)?,
                aggregate_for_employee_ids: Some(employee_ids.to_vec()),
            }],
        })
    }

    /// Build a real-time prediction request
    pub fn real_time(
        dataset_id: impl Into<String>,
        rows: &[Registration],
    ) -> serde_json::Result<Self> {
        Ok(Self {
            parameters: vec![PredictionParameters {
                dataset_id: dataset_id.into(),
                registrations: wire::wire_registrations(rows)?,
                aggregate_for_employee_ids: None,
            }],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn registration() -> Registration {
        serde_json::from_value(json!({
            "registrationId": "reg-0",
            "date": "2023-04-03",
            "employeeId": "employee-0",
            "projectId": "project-a",
            "departmentId": "department-x",
            "workCategory": "development",
            "startTime": 8.0,
            "endTime": 16.0,
            "workDuration": 7.5,
            "breakDuration": 0.5,
            "publicHoliday": false,
            "numericals": [],
            "localOnly": "stripped",
        }))
        .unwrap()
    }

    #[test]
    fn test_upload_payload_shape() {
        let payload = UploadPayload::for_dataset("ds-1", &[registration()]).unwrap();
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["datasets"][0]["datasetId"], "ds-1");
        assert_eq!(
            value["datasets"][0]["registrations"][0]["registrationId"],
            "reg-0"
        );
        assert!(value["datasets"][0]["registrations"][0].get("localOnly").is_none());
    }

    #[test]
    fn test_training_request_shape() {
        let request = TrainingRequest::for_dataset("ds-1", false);
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["parameters"][0]["datasetId"], "ds-1");
        assert_eq!(value["parameters"][0]["rebuildModels"], false);
    }

    #[test]
    fn test_batch_prediction_carries_employee_hint() {
        let request =
            PredictionRequest::batch("ds-1", &[registration()], &["employee-0".to_string()])
                .unwrap();
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value["parameters"][0]["aggregateForEmployeeIds"],
            json!(["employee-0"])
        );
    }

    #[test]
    fn test_real_time_request_has_no_employee_hint() {
        let request = PredictionRequest::real_time("ds-1", &[registration()]).unwrap();
        let value = serde_json::to_value(&request).unwrap();
        assert!(value["parameters"][0].get("aggregateForEmployeeIds").is_none());
    }
}
