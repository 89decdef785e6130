//! Data-file handling
//!
//! Synthetic datasets live as JSON arrays of registrations under the
//! configured data directory.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use timedetect_core::domain::registration::Registration;

/// Load registrations from a JSON file
pub fn load_registrations(path: &Path) -> Result<Vec<Registration>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read data file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse registrations in {}", path.display()))
}

/// Save registrations to a JSON file, creating parent directories as needed
pub fn save_registrations(path: &Path, rows: &[Registration]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create data directory {}", parent.display()))?;
    }
    let raw = serde_json::to_string_pretty(rows)?;
    fs::write(path, raw).with_context(|| format!("Failed to write data file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn registration(id: &str) -> Registration {
        serde_json::from_value(json!({
            "registrationId": id,
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
        }))
        .unwrap()
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("train_data.json");
        let rows = vec![registration("reg-0"), registration("reg-1")];

        save_registrations(&path, &rows).unwrap();
        let loaded = load_registrations(&path).unwrap();
        assert_eq!(loaded, rows);
    }

    #[test]
    fn test_load_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.json");
        assert!(load_registrations(&missing).is_err());
    }
}
