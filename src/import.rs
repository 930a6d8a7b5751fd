//! CSV bulk-import pipeline.
//!
//! The pipeline runs in three steps, each usable on its own:
//!
//! 1. [`read_csv_file`] / [`parse_csv`] turn a file into [`ImportRow`]s,
//!    rejecting structurally broken files.
//! 2. [`validate_rows`] checks every row against the schema and the
//!    reference categories and returns a [`ValidationReport`].
//! 3. [`build_request`] keeps the rows without errors and maps them into
//!    the backend's bulk-import request.
//!
//! [`ImportSession`] ties the steps together for one upload.
//!
//! # Examples
//!
//! ```
//! use erp_import::import::{ValidationOptions, build_request, parse_csv_str, validate_rows};
//! use erp_import::models::{AccountCategory, CategoryId, CategoryIndex, TransactionType};
//!
//! let csv = "amount,transaction_type,description,category,transaction_date,region,account_category_id\n\
//!            -5,INCOME,x,y,2024-01-15,Bali,54\n\
//!            10,INCOME,x,y,2024-01-15,Bali,54\n";
//! let rows = parse_csv_str(csv)?;
//! let categories = CategoryIndex::new(vec![AccountCategory {
//!     id: CategoryId::new(54),
//!     name: "Sales Revenue".to_owned(),
//!     code: "4100".to_owned(),
//!     kind: TransactionType::Income,
//!     parent_id: None,
//! }]);
//!
//! let report = validate_rows(&rows, &categories, ValidationOptions::default());
//! assert_eq!(report.errors().len(), 1);
//! assert_eq!(report.errors()[0].row, 1);
//! assert_eq!(build_request(&rows, &report).transactions.len(), 1);
//! # Ok::<(), erp_import::error::ImportError>(())
//! ```

mod parse;
mod session;
mod submit;
mod validate;

pub use parse::{ImportRow, REQUIRED_COLUMNS, parse_csv, parse_csv_str, read_csv_file};
pub use session::{ImportSession, Stage};
pub use submit::{build_request, importable_transactions};
pub use validate::{Field, ValidationError, ValidationOptions, ValidationReport, validate_rows};
