//! Account category (chart-of-accounts node) model.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{CategoryId, TransactionType};

/// A chart-of-accounts node used to classify transactions.
///
/// Categories nest through `parent_id`; root nodes have no parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountCategory {
    /// Unique identifier.
    pub id: CategoryId,
    /// Display name.
    pub name: String,
    /// Ledger code (e.g. `"4100"`).
    pub code: String,
    /// Transaction type this category books.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// Parent category, if any.
    #[serde(default)]
    pub parent_id: Option<CategoryId>,
}

/// Read-only lookup of reference categories for one import session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryIndex {
    /// Categories keyed by identifier.
    by_id: HashMap<CategoryId, AccountCategory>,
}

impl CategoryIndex {
    /// Builds an index from a fetched category list.
    ///
    /// If the list repeats an identifier, the last occurrence wins.
    #[inline]
    #[must_use]
    pub fn new(categories: Vec<AccountCategory>) -> Self {
        Self {
            by_id: categories.into_iter().map(|cat| (cat.id, cat)).collect(),
        }
    }

    /// Returns `true` if a category with this identifier exists.
    #[inline]
    #[must_use]
    pub fn contains(&self, id: CategoryId) -> bool {
        self.by_id.contains_key(&id)
    }

    /// Looks up a category by identifier.
    #[inline]
    #[must_use]
    pub fn get(&self, id: CategoryId) -> Option<&AccountCategory> {
        self.by_id.get(&id)
    }

    /// Number of indexed categories.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Returns `true` if no categories are indexed.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Returns the indexed categories sorted by identifier.
    #[inline]
    #[must_use]
    pub fn sorted(&self) -> Vec<&AccountCategory> {
        let mut all: Vec<&AccountCategory> = self.by_id.values().collect();
        all.sort_by_key(|cat| cat.id);
        all
    }
}

impl FromIterator<AccountCategory> for CategoryIndex {
    #[inline]
    fn from_iter<I: IntoIterator<Item = AccountCategory>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: i64, name: &str, kind: TransactionType, parent: Option<i64>) -> AccountCategory {
        AccountCategory {
            id: CategoryId::new(id),
            name: name.to_owned(),
            code: (id * 100).to_string(),
            kind,
            parent_id: parent.map(CategoryId::new),
        }
    }

    #[test]
    fn deserialize_category() {
        let json = r#"{
            "id": 54,
            "name": "Sales Revenue",
            "code": "4100",
            "type": "INCOME",
            "parent_id": 53
        }"#;
        let cat: AccountCategory = serde_json::from_str(json).unwrap();
        assert_eq!(cat.id, CategoryId::new(54));
        assert_eq!(cat.kind, TransactionType::Income);
        assert_eq!(cat.parent_id, Some(CategoryId::new(53)));
    }

    #[test]
    fn deserialize_root_category() {
        let json = r#"{"id": 25, "name": "Assets", "code": "1000", "type": "ASSET", "parent_id": null}"#;
        let cat: AccountCategory = serde_json::from_str(json).unwrap();
        assert!(cat.parent_id.is_none());

        let without_field = r#"{"id": 25, "name": "Assets", "code": "1000", "type": "ASSET"}"#;
        let cat: AccountCategory = serde_json::from_str(without_field).unwrap();
        assert!(cat.parent_id.is_none());
    }

    #[test]
    fn serialize_uses_type_key() {
        let cat = category(66, "Rent Expense", TransactionType::Expense, Some(64));
        let json = serde_json::to_value(&cat).unwrap();
        assert_eq!(json["type"], "EXPENSE");
        assert_eq!(json["parent_id"], 64);
    }

    #[test]
    fn index_lookup() {
        let index = CategoryIndex::new(vec![
            category(27, "Cash", TransactionType::Asset, Some(26)),
            category(54, "Sales Revenue", TransactionType::Income, Some(53)),
        ]);
        assert_eq!(index.len(), 2);
        assert!(index.contains(CategoryId::new(54)));
        assert!(!index.contains(CategoryId::new(9999)));
        assert_eq!(
            index.get(CategoryId::new(27)).map(|c| c.name.as_str()),
            Some("Cash")
        );
    }

    #[test]
    fn index_sorted_and_empty() {
        assert!(CategoryIndex::default().is_empty());
        let index: CategoryIndex = vec![
            category(66, "Rent", TransactionType::Expense, None),
            category(25, "Assets", TransactionType::Asset, None),
        ]
        .into_iter()
        .collect();
        let ids: Vec<i64> = index.sorted().iter().map(|c| c.id.into_inner()).collect();
        assert_eq!(ids, vec![25, 66]);
    }
}
