//! Response bodies decoded from the detection API

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::prediction::Prediction;

/// 202 Accepted body of an asynchronous dispatch (training, batch prediction)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobAccepted {
    pub job_id: String,
}

/// Body of a `presigned_url` call: a one-time upload target plus the job id
/// under which the ingestion will be tracked
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresignedUpload {
    pub url: String,
    pub job_id: String,
}

/// Envelope around prediction results, both for completed batch jobs and for
/// the real-time endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultsEnvelope {
    pub results: Vec<PredictionSet>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionSet {
    pub predictions: Vec<Prediction>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl ResultsEnvelope {
    /// Unpack the nested result structure into a flat prediction list.
    ///
    /// The service nests predictions one level deep (`results[0]`); an empty
    /// envelope yields `None`.
    pub fn into_predictions(self) -> Option<Vec<Prediction>> {
        self.results.into_iter().next().map(|set| set.predictions)
    }
}
