//! Parse boundary: turns an uploaded delimited file into typed rows.
//!
//! Structural problems (wrong extension, missing columns, ragged records)
//! are rejected here as [`ImportError`]s so that business validation only
//! ever sees well-formed [`ImportRow`] records.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ImportError, Result};

/// Columns every import file must declare in its header row, in schema
/// order.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "amount",
    "transaction_type",
    "description",
    "category",
    "transaction_date",
    "region",
    "account_category_id",
];

/// One data record of an import file, exactly as it was written.
///
/// Values stay raw text until [`crate::import::validate_rows`] checks them;
/// an `id` column, if present, is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRow {
    /// Amount as written (expected: positive decimal).
    pub amount: String,
    /// Transaction type as written (expected: one of the five types).
    pub transaction_type: String,
    /// Description as written (expected: non-blank).
    pub description: String,
    /// Category label as written (expected: non-blank).
    pub category: String,
    /// Date as written (expected: `YYYY-MM-DD`).
    pub transaction_date: String,
    /// Region as written (expected: a permitted region name).
    pub region: String,
    /// Account category ID as written (expected: existing integer ID).
    pub account_category_id: String,
    /// Optional notes; an empty cell reads as `None`.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Reads and parses an import file from disk.
///
/// # Errors
///
/// Returns [`ImportError::NotCsv`] if the file name does not end in
/// `.csv`, [`ImportError::Io`] if the file cannot be opened, and any error
/// of [`parse_csv`].
#[inline]
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn read_csv_file(path: &Path) -> Result<Vec<ImportRow>> {
    if !has_csv_extension(path) {
        return Err(ImportError::NotCsv {
            path: path.to_path_buf(),
        });
    }
    let file = File::open(path)?;
    parse_csv(file)
}

/// Parses import rows from CSV text.
///
/// # Errors
///
/// See [`parse_csv`].
#[inline]
pub fn parse_csv_str(text: &str) -> Result<Vec<ImportRow>> {
    parse_csv(text.as_bytes())
}

/// Parses import rows from a reader producing CSV with a header row.
///
/// Empty lines are skipped. Columns are matched by exact header name;
/// extra columns are ignored.
///
/// # Errors
///
/// Returns [`ImportError::MissingColumns`] if the header lacks a required
/// column, and [`ImportError::Csv`] if any record is malformed (including
/// a field count that differs from the header).
#[inline]
pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<ImportRow>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?;
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|column| !headers.iter().any(|header| header == **column))
        .map(|column| (*column).to_owned())
        .collect();
    if !missing.is_empty() {
        tracing::debug!(missing = missing.len(), "header is missing required columns");
        return Err(ImportError::MissingColumns { columns: missing });
    }

    let rows = csv_reader
        .deserialize::<ImportRow>()
        .collect::<core::result::Result<Vec<_>, _>>()?;
    tracing::debug!(rows = rows.len(), "parsed import file");
    Ok(rows)
}

/// Returns `true` if the path ends in `.csv` (any case).
fn has_csv_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use super::*;

    const HEADER: &str =
        "amount,transaction_type,description,category,transaction_date,notes,region,account_category_id";

    #[test]
    fn parse_rows_in_order() {
        let text = format!(
            "{HEADER}\n\
             1000000,INCOME,Sales Revenue,Product Sales,2024-01-15,Monthly sales,Jakarta Pusat,54\n\
             500000,EXPENSE,Office Rent,Rent Expense,2024-01-01,,Jakarta Pusat,66\n"
        );
        let rows = parse_csv_str(&text).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].amount, "1000000");
        assert_eq!(rows[0].notes.as_deref(), Some("Monthly sales"));
        assert_eq!(rows[1].description, "Office Rent");
        assert!(rows[1].notes.is_none());
    }

    #[test]
    fn parse_ignores_extra_columns_and_missing_notes() {
        let text = "id,amount,transaction_type,description,category,transaction_date,region,account_category_id\n\
                    7,10,ASSET,Cash,Cash,2024-01-10,Bali,27\n";
        let rows = parse_csv_str(text).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].account_category_id, "27");
        assert!(rows[0].notes.is_none());
    }

    #[test]
    fn parse_keeps_blank_cells_for_validation() {
        let text = format!("{HEADER}\n,INCOME,,  ,2024-01-15,,Bali,54\n");
        let rows = parse_csv_str(&text).unwrap();
        assert_eq!(rows[0].amount, "");
        assert_eq!(rows[0].description, "");
        assert_eq!(rows[0].category, "  ");
    }

    #[test]
    fn parse_skips_empty_lines() {
        let text = format!("{HEADER}\n\n10,INCOME,x,y,2024-01-15,,Bali,54\n\n");
        assert_eq!(parse_csv_str(&text).unwrap().len(), 1);
    }

    #[test]
    fn parse_header_only_yields_no_rows() {
        assert!(parse_csv_str(HEADER).unwrap().is_empty());
    }

    #[test]
    fn parse_reports_missing_columns_in_schema_order() {
        let text = "description,amount,category\n1,2,3\n";
        let err = parse_csv_str(text).unwrap_err();
        match err {
            ImportError::MissingColumns { columns } => assert_eq!(
                columns,
                vec![
                    "transaction_type",
                    "transaction_date",
                    "region",
                    "account_category_id"
                ]
            ),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn parse_rejects_ragged_record() {
        let text = format!("{HEADER}\n10,INCOME,x,y\n");
        let err = parse_csv_str(&text).unwrap_err();
        assert!(matches!(err, ImportError::Csv(_)));
    }

    #[test]
    fn parse_handles_quoted_fields() {
        let text = format!(
            "{HEADER}\n10,ASSET,\"Property, Plant and Equipment\",PPE,2024-01-15,,Bali,33\n"
        );
        let rows = parse_csv_str(&text).unwrap();
        assert_eq!(rows[0].description, "Property, Plant and Equipment");
    }

    #[test]
    fn read_file_rejects_non_csv_extension() {
        let err = read_csv_file(Path::new("ledger.xlsx")).unwrap_err();
        assert!(matches!(err, ImportError::NotCsv { .. }));
    }

    #[test]
    fn read_file_accepts_upper_case_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("LEDGER.CSV");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "{HEADER}").unwrap();
        writeln!(file, "10,INCOME,x,y,2024-01-15,,Bali,54").unwrap();
        drop(file);

        let rows = read_csv_file(&path).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn read_file_missing_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_csv_file(&dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, ImportError::Io(_)));
    }
}
