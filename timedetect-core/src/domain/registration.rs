//! Registration domain types

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One work-time registration: a single employee's tracked time on one date.
///
/// Registrations are immutable once sent to the detection API; identity is
/// the registration id. The `date` field is an ISO-8601 `YYYY-MM-DD` string,
/// so sorting dates lexicographically sorts them chronologically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub registration_id: String,
    pub date: String,
    pub employee_id: String,
    pub project_id: String,
    pub department_id: String,
    pub work_category: String,
    /// Start of the working day, in fractional hours (e.g. 7.5 = 07:30)
    pub start_time: f64,
    pub end_time: f64,
    pub work_duration: f64,
    pub break_duration: f64,
    pub public_holiday: bool,
    #[serde(default)]
    pub numericals: Vec<Numerical>,
    /// Local-only columns (display state, annotations, …) carried alongside
    /// the wire fields. Stripped before transmission; see
    /// [`crate::dto::wire`].
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// A named numeric feature attached to a registration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Numerical {
    pub name: String,
    pub value: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_registration_round_trips_camel_case() {
        let raw = json!({
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
            "numericals": [{"name": "overtime", "value": 2.0}],
        });

        let reg: Registration = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(reg.registration_id, "reg-0");
        assert_eq!(reg.numericals.len(), 1);
        assert!(reg.extra.is_empty());

        let back = serde_json::to_value(&reg).unwrap();
        assert_eq!(back, raw);
    }

    #[test]
    fn test_unknown_fields_are_kept_as_extras() {
        let raw = json!({
            "registrationId": "reg-1",
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
            "approved": true,
            "uiRowColor": "red",
        });

        let reg: Registration = serde_json::from_value(raw).unwrap();
        assert_eq!(reg.extra.len(), 2);
        assert_eq!(reg.extra.get("approved"), Some(&serde_json::json!(true)));
    }
}
