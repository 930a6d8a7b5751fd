//! Data models for the ledger API and the import pipeline.
//!
//! This module contains strongly-typed representations of the reference
//! data the importer consumes, the transaction shape it submits, newtype ID
//! wrappers, and enumeration types for constrained values.

mod account_category;
mod bulk_import;
mod enums;
mod ids;
mod transaction;

pub use account_category::{AccountCategory, CategoryIndex};
pub use bulk_import::{BulkImportRequest, ImportOutcome, RowError};
pub use chrono::NaiveDate;
pub(crate) use enums::joined_names;
pub use enums::{Region, TransactionType, UnknownVariant};
pub use ids::CategoryId;
pub use transaction::NewTransaction;
