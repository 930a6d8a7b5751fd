//! Bulk import request/response models.

use serde::{Deserialize, Serialize};

use super::NewTransaction;

/// Request body for the bulk-import endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkImportRequest {
    /// Transactions to create, in source-row order.
    pub transactions: Vec<NewTransaction>,
}

/// A rejection reported by the backend for one submitted transaction.
///
/// `row` refers to the position in the submitted batch, which is not
/// reconciled back to the source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowError {
    /// Position in the submitted batch, as reported by the backend.
    pub row: u64,
    /// Backend error message.
    pub error: String,
}

/// Aggregate result of a bulk import.
///
/// Normally returned by the backend. When the submission itself fails,
/// the importer builds one with [`ImportOutcome::all_failed`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportOutcome {
    /// Number of transactions the backend stored.
    pub success_count: u64,
    /// Number of transactions that were not stored.
    pub failed_count: u64,
    /// Per-transaction rejections reported by the backend.
    #[serde(default)]
    pub errors: Vec<RowError>,
    /// Submission failure message, set only when the request never
    /// produced a backend answer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

impl ImportOutcome {
    /// Outcome for a submission that failed before the backend answered:
    /// every row of the file counts as failed, with no per-row detail.
    #[inline]
    #[must_use]
    pub fn all_failed(total_rows: usize, failure: String) -> Self {
        Self {
            success_count: 0,
            failed_count: u64::try_from(total_rows).unwrap_or(u64::MAX),
            errors: Vec::new(),
            failure: Some(failure),
        }
    }

    /// Returns `true` if every submitted transaction was stored.
    #[inline]
    #[must_use]
    pub const fn is_complete_success(&self) -> bool {
        self.failed_count == 0 && self.failure.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_backend_result() {
        let json = r#"{
            "success_count": 2,
            "failed_count": 1,
            "errors": [{"row": 3, "error": "duplicate transaction"}]
        }"#;
        let outcome: ImportOutcome = serde_json::from_str(json).unwrap();
        assert_eq!(outcome.success_count, 2);
        assert_eq!(outcome.failed_count, 1);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].error, "duplicate transaction");
        assert!(outcome.failure.is_none());
        assert!(!outcome.is_complete_success());
    }

    #[test]
    fn deserialize_without_errors_field() {
        let outcome: ImportOutcome =
            serde_json::from_str(r#"{"success_count": 3, "failed_count": 0}"#).unwrap();
        assert!(outcome.errors.is_empty());
        assert!(outcome.is_complete_success());
    }

    #[test]
    fn all_failed_counts_every_row() {
        let outcome = ImportOutcome::all_failed(5, "connection refused".to_owned());
        assert_eq!(outcome.success_count, 0);
        assert_eq!(outcome.failed_count, 5);
        assert!(outcome.errors.is_empty());
        assert_eq!(outcome.failure.as_deref(), Some("connection refused"));
    }

    #[test]
    fn request_wraps_transactions_key() {
        let req = BulkImportRequest {
            transactions: Vec::new(),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert!(json["transactions"].as_array().unwrap().is_empty());
    }
}
