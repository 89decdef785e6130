//! Outgoing registration shaping
//!
//! The service accepts a fixed set of registration fields. Everything else a
//! registration carries locally (display columns, annotations) must be
//! stripped before it goes on the wire. Every payload that embeds
//! registrations is built through [`wire_registrations`], so the filter is
//! applied uniformly at all call sites.

use serde_json::Value;

use crate::domain::registration::Registration;

/// The fields the detection API accepts on an uploaded registration
pub const REGISTRATION_FIELDS: [&str; 12] = [
    "registrationId",
    "date",
    "employeeId",
    "projectId",
    "departmentId",
    "workCategory",
    "startTime",
    "endTime",
    "workDuration",
    "breakDuration",
    "publicHoliday",
    "numericals",
];

/// Serialize one registration, keeping only allow-listed fields
pub fn wire_registration(reg: &Registration) -> serde_json::Result<Value> {
    let mut value = serde_json::to_value(reg)?;
    if let Value::Object(map) = &mut value {
        map.retain(|key, _| REGISTRATION_FIELDS.contains(&key.as_str()));
    }
    Ok(value)
}

/// Serialize a batch of registrations for transmission
pub fn wire_registrations(rows: &[Registration]) -> serde_json::Result<Vec<Value>> {
    rows.iter().map(wire_registration).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn registration_with_extras() -> Registration {
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
            "numericals": [{"name": "overtime", "value": 2.0}],
            "approved": true,
            "uiRowColor": "red",
        }))
        .unwrap()
    }

    #[test]
    fn test_wire_fields_are_a_subset_of_the_allow_list() {
        let wired = wire_registration(&registration_with_extras()).unwrap();
        let map = wired.as_object().unwrap();
        for key in map.keys() {
            assert!(
                REGISTRATION_FIELDS.contains(&key.as_str()),
                "field {key} must not be transmitted"
            );
        }
        assert!(!map.contains_key("approved"));
        assert!(!map.contains_key("uiRowColor"));
    }

    #[test]
    fn test_wire_preserves_every_allow_listed_field() {
        let reg = registration_with_extras();
        let unfiltered = serde_json::to_value(&reg).unwrap();
        let wired = wire_registration(&reg).unwrap();

        for field in REGISTRATION_FIELDS {
            assert_eq!(
                wired.get(field),
                unfiltered.get(field),
                "field {field} must survive the filter unchanged"
            );
        }
    }

    #[test]
    fn test_wire_registrations_maps_every_row() {
        let rows = vec![registration_with_extras(), registration_with_extras()];
        let wired = wire_registrations(&rows).unwrap();
        assert_eq!(wired.len(), 2);
    }
}
