//! Maps validated rows into the backend's bulk-import request.

use super::validate::{parse_amount, parse_category_id, parse_date};
use super::{ImportRow, ValidationReport};
use crate::models::{BulkImportRequest, NewTransaction};

/// Converts the rows no validation error references into transactions,
/// preserving file order.
///
/// With `N` rows of which `K` failed validation, this yields `N - K`
/// transactions.
#[inline]
#[must_use]
pub fn importable_transactions(rows: &[ImportRow], report: &ValidationReport) -> Vec<NewTransaction> {
    let failed = report.failed_rows();
    rows.iter()
        .enumerate()
        .filter(|&(index, _)| !failed.contains(&index.saturating_add(1)))
        .filter_map(|(_, row)| to_new_transaction(row))
        .collect()
}

/// Builds the single bulk-import request for a validated file.
#[inline]
#[must_use]
pub fn build_request(rows: &[ImportRow], report: &ValidationReport) -> BulkImportRequest {
    BulkImportRequest {
        transactions: importable_transactions(rows, report),
    }
}

/// Coerces one row into the creation shape.
///
/// Returns `None` if any field does not parse; validated rows always
/// convert.
fn to_new_transaction(row: &ImportRow) -> Option<NewTransaction> {
    Some(NewTransaction {
        amount: parse_amount(&row.amount)?,
        transaction_type: row.transaction_type.parse().ok()?,
        description: row.description.clone(),
        category: row.category.clone(),
        transaction_date: parse_date(&row.transaction_date)?,
        notes: row.notes.clone().unwrap_or_default(),
        region: row.region.parse().ok()?,
        account_category_id: parse_category_id(&row.account_category_id)?,
    })
}
