//! Prediction domain types

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One anomaly-scored record, produced by the service per input registration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub registration_id: String,
    pub anomaly_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_model_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregated: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub significant_fields: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_registration_ids: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Index predictions by registration id for detail lookup.
///
/// If the service returns several rows for one registration the last one
/// wins.
pub fn by_registration_id(rows: &[Prediction]) -> BTreeMap<&str, &Prediction> {
    rows.iter()
        .map(|row| (row.registration_id.as_str(), row))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn prediction(id: &str, score: f64) -> Prediction {
        serde_json::from_value(json!({"registrationId": id, "anomalyScore": score})).unwrap()
    }

    #[test]
    fn test_optional_fields_decode() {
        let row: Prediction = serde_json::from_value(json!({
            "registrationId": "reg-3",
            "anomalyScore": 0.93,
            "significantFields": ["startTime"],
            "relatedRegistrationIds": ["reg-2"],
        }))
        .unwrap();

        assert_eq!(row.significant_fields.as_deref(), Some(&["startTime".to_string()][..]));
        assert_eq!(row.related_registration_ids.as_deref(), Some(&["reg-2".to_string()][..]));
        assert!(row.sub_model_id.is_none());
    }

    #[test]
    fn test_by_registration_id() {
        let rows = vec![prediction("reg-0", 0.1), prediction("reg-1", 0.9)];
        let index = by_registration_id(&rows);
        assert_eq!(index.len(), 2);
        assert_eq!(index["reg-1"].anomaly_score, 0.9);
    }
}
