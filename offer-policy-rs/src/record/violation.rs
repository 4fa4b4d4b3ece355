// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 CAB Ingénierie / Christophe ABOULICAM
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A constraint a record failed during validation
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("Invalid value for field '{field}': {message}")]
pub struct RecordViolation {
    pub field: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record: Option<String>,
}

impl RecordViolation {
    /// Create a new record violation
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
            record: None,
        }
    }

    /// Attach the business key of the offending record
    pub fn for_record(mut self, key: &str) -> Self {
        self.record = Some(key.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_violation_new() {
        let violation = RecordViolation::new("offer_id", "Offer ID is required");
        assert_eq!(violation.field, "offer_id");
        assert_eq!(violation.message, "Offer ID is required");
        assert!(violation.record.is_none());
    }

    #[test]
    fn test_record_violation_for_record() {
        let violation = RecordViolation::new("vertical", "Vertical is required").for_record("ACA-001");
        assert_eq!(violation.record, Some("ACA-001".to_string()));
    }

    #[test]
    fn test_record_violation_display() {
        let violation = RecordViolation::new("publisher_payout_min", "must not exceed maximum");
        let display = format!("{}", violation);
        assert!(display.contains("publisher_payout_min"));
        assert!(display.contains("must not exceed maximum"));
    }

    #[test]
    fn test_record_violation_skips_missing_record() {
        let json = serde_json::to_string(&RecordViolation::new("a", "b")).unwrap();
        assert!(!json.contains("record"));
    }
}
