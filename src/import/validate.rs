//! Row validation against the import schema and reference categories.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate};
use serde::Serialize;

use super::ImportRow;
use crate::models::{CategoryId, CategoryIndex, Region, TransactionType, joined_names};

/// Column a validation error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// `amount` column.
    Amount,
    /// `transaction_type` column.
    TransactionType,
    /// `description` column.
    Description,
    /// `category` column.
    Category,
    /// `transaction_date` column.
    TransactionDate,
    /// `region` column.
    Region,
    /// `account_category_id` column.
    AccountCategoryId,
}

impl Field {
    /// Returns the column name as it appears in the CSV header.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Amount => "amount",
            Self::TransactionType => "transaction_type",
            Self::Description => "description",
            Self::Category => "category",
            Self::TransactionDate => "transaction_date",
            Self::Region => "region",
            Self::AccountCategoryId => "account_category_id",
        }
    }
}

impl core::fmt::Display for Field {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One failed check on one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    /// 1-based position of the row in the uploaded file (header excluded).
    pub row: usize,
    /// Column that failed.
    pub field: Field,
    /// Human-readable reason.
    pub message: String,
    /// Offending raw value.
    pub value: String,
}

/// Optional checks layered on top of the base schema.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationOptions {
    /// Also reject rows whose account category exists but books a
    /// different transaction type than the row declares.
    pub check_category_type: bool,
}

/// Result of validating a whole file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Number of rows that were validated.
    total_rows: usize,
    /// Every failed check, ordered by row and then by check.
    errors: Vec<ValidationError>,
}

impl ValidationReport {
    /// Number of rows that were validated.
    #[inline]
    #[must_use]
    pub const fn total_rows(&self) -> usize {
        self.total_rows
    }

    /// Every failed check, ordered by row and then by check.
    #[inline]
    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Returns `true` if no row failed any check.
    #[inline]
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Row numbers referenced by at least one error.
    #[inline]
    #[must_use]
    pub fn failed_rows(&self) -> BTreeSet<usize> {
        self.errors.iter().map(|err| err.row).collect()
    }

    /// Returns `true` if no error references the given 1-based row.
    #[inline]
    #[must_use]
    pub fn is_row_importable(&self, row: usize) -> bool {
        !self.errors.iter().any(|err| err.row == row)
    }

    /// Number of rows with no errors.
    #[inline]
    #[must_use]
    pub fn importable_count(&self) -> usize {
        self.total_rows.saturating_sub(self.failed_rows().len())
    }
}

/// Validates every row against the schema and the reference categories.
///
/// All checks run for every row, so one row may produce several errors.
/// Rows are keyed by their 1-based position in `rows`.
#[inline]
#[must_use]
#[tracing::instrument(skip_all, fields(rows = rows.len(), categories = categories.len()))]
pub fn validate_rows(
    rows: &[ImportRow],
    categories: &CategoryIndex,
    options: ValidationOptions,
) -> ValidationReport {
    let mut errors = Vec::new();
    for (index, row) in rows.iter().enumerate() {
        validate_row(index.saturating_add(1), row, categories, options, &mut errors);
    }
    tracing::debug!(errors = errors.len(), "validation finished");
    ValidationReport {
        total_rows: rows.len(),
        errors,
    }
}

/// Runs every check on one row, appending failures to `errors`.
fn validate_row(
    row_number: usize,
    row: &ImportRow,
    categories: &CategoryIndex,
    options: ValidationOptions,
    errors: &mut Vec<ValidationError>,
) {
    let mut fail = |field: Field, message: String, value: &str| {
        errors.push(ValidationError {
            row: row_number,
            field,
            message,
            value: value.to_owned(),
        });
    };

    if parse_amount(&row.amount).is_none() {
        fail(
            Field::Amount,
            "Amount must be a positive number".to_owned(),
            &row.amount,
        );
    }

    let transaction_type = row.transaction_type.parse::<TransactionType>().ok();
    if transaction_type.is_none() {
        fail(
            Field::TransactionType,
            format!(
                "Transaction type must be one of: {}",
                joined_names(TransactionType::ALL, TransactionType::as_str)
            ),
            &row.transaction_type,
        );
    }

    if row.description.trim().is_empty() {
        fail(
            Field::Description,
            "Description is required".to_owned(),
            &row.description,
        );
    }

    if row.category.trim().is_empty() {
        fail(
            Field::Category,
            "Category is required".to_owned(),
            &row.category,
        );
    }

    if parse_date(&row.transaction_date).is_none() {
        fail(
            Field::TransactionDate,
            "Invalid date format. Use YYYY-MM-DD".to_owned(),
            &row.transaction_date,
        );
    }

    if row.region.parse::<Region>().is_err() {
        fail(
            Field::Region,
            "Region must be one of the valid Indonesian regions".to_owned(),
            &row.region,
        );
    }

    match parse_category_id(&row.account_category_id) {
        None => fail(
            Field::AccountCategoryId,
            "Account category ID must be a valid number".to_owned(),
            &row.account_category_id,
        ),
        Some(id) => match categories.get(id) {
            None => fail(
                Field::AccountCategoryId,
                "Account category ID does not exist in system".to_owned(),
                &row.account_category_id,
            ),
            Some(category) => {
                let mismatch = transaction_type.filter(|declared| {
                    options.check_category_type && *declared != category.kind
                });
                if let Some(declared) = mismatch {
                    fail(
                        Field::AccountCategoryId,
                        format!(
                            "Account category type {} does not match transaction type {declared}",
                            category.kind
                        ),
                        &row.account_category_id,
                    );
                }
            }
        },
    }
}

/// Parses an amount: a finite number strictly greater than zero.
pub(super) fn parse_amount(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite() && *amount > 0.0_f64)
}

/// Parses a calendar date written as `YYYY-MM-DD`, or the date part of an
/// RFC 3339 timestamp.
pub(super) fn parse_date(raw: &str) -> Option<NaiveDate> {
    let text = raw.trim();
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|stamp| stamp.date_naive())
        })
}

/// Parses an integer category identifier, tolerating a `.0` suffix.
pub(super) fn parse_category_id(raw: &str) -> Option<CategoryId> {
    raw.parse::<CategoryId>().ok()
}
