//! Transaction creation model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{CategoryId, Region, TransactionType};

/// A transaction in the shape the backend's creation endpoints accept.
///
/// Produced from a validated import row: the amount and category ID are
/// numeric and `notes` is never absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    /// Positive transaction amount.
    pub amount: f64,
    /// Ledger classification.
    pub transaction_type: TransactionType,
    /// Free-text description.
    pub description: String,
    /// Free-text category label.
    pub category: String,
    /// Booking date (serialized as `yyyy-MM-dd`).
    pub transaction_date: NaiveDate,
    /// Notes, empty when the source row had none.
    #[serde(default)]
    pub notes: String,
    /// Region the transaction is booked against.
    pub region: Region,
    /// Referenced account category.
    pub account_category_id: CategoryId,
}
