//! Newtype wrapper for account category identifiers.
//!
//! Keeps category IDs from being mixed up with row numbers or amounts at
//! compile time.

use core::num::ParseIntError;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Unique identifier for an account category (chart-of-accounts node).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(i64);

impl CategoryId {
    /// Creates a new identifier from the given value.
    #[inline]
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Consumes the wrapper and returns the inner value.
    #[inline]
    #[must_use]
    pub const fn into_inner(self) -> i64 {
        self.0
    }
}

impl core::fmt::Display for CategoryId {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<i64> for CategoryId {
    #[inline]
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// Parses an ID cell as written in a CSV file.
///
/// Surrounding whitespace is ignored and a spreadsheet-style `.0` suffix
/// (`"54.0"`) is accepted; any other fraction is rejected.
impl FromStr for CategoryId {
    type Err = ParseIntError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let digits = text.strip_suffix(".0").unwrap_or(text);
        digits.parse::<i64>().map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_id_serializes_transparently() {
        let id = CategoryId::new(54);
        assert_eq!(serde_json::to_string(&id).unwrap(), "54");
        let back: CategoryId = serde_json::from_str("54").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn category_id_display_and_conversions() {
        let id = CategoryId::from(66_i64);
        assert_eq!(id.to_string(), "66");
        assert_eq!(id.into_inner(), 66);
    }

    #[test]
    fn category_id_parses_csv_cells() {
        assert_eq!("54".parse(), Ok(CategoryId::new(54)));
        assert_eq!(" 54 ".parse(), Ok(CategoryId::new(54)));
        assert_eq!("54.0".parse(), Ok(CategoryId::new(54)));
    }

    #[test]
    fn category_id_rejects_fractions_and_text() {
        assert!("54.5".parse::<CategoryId>().is_err());
        assert!("54abc".parse::<CategoryId>().is_err());
        assert!("".parse::<CategoryId>().is_err());
        assert!(".0".parse::<CategoryId>().is_err());
    }
}
