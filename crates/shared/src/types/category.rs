//! Free-text budget category key.
//!
//! Categories are an open set that grows from user input, so they are modelled
//! as a normalized string rather than an enum. Every map keyed by category
//! uses this type so that `" Travel "` and `"Travel"` land in the same pot.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A normalized category name.
///
/// Normalization trims surrounding whitespace and maps a blank or missing
/// name to [`Category::UNCATEGORIZED`]. Ordering is by name, which is the
/// order used by summary views.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Category(String);

impl Category {
    /// Name used when a record carries no category.
    pub const UNCATEGORIZED: &'static str = "Uncategorized";

    /// Normalizes a raw category name.
    #[must_use]
    pub fn new(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Self::uncategorized()
        } else {
            Self(trimmed.to_string())
        }
    }

    /// Normalizes an optional raw category name.
    #[must_use]
    pub fn from_optional(raw: Option<&str>) -> Self {
        raw.map_or_else(Self::uncategorized, Self::new)
    }

    /// The fallback category.
    #[must_use]
    pub fn uncategorized() -> Self {
        Self(Self::UNCATEGORIZED.to_string())
    }

    /// Returns the normalized name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Category {
    fn default() -> Self {
        Self::uncategorized()
    }
}

impl From<String> for Category {
    fn from(raw: String) -> Self {
        Self::new(&raw)
    }
}

impl From<&str> for Category {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.0
    }
}

impl Borrow<str> for Category {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Category {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Travel", "Travel")]
    #[case("  Travel ", "Travel")]
    #[case("", "Uncategorized")]
    #[case("   ", "Uncategorized")]
    #[case("Kitchen Supply", "Kitchen Supply")]
    fn test_category_normalization(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(Category::new(raw).as_str(), expected);
    }

    #[test]
    fn test_missing_category_defaults() {
        assert_eq!(Category::from_optional(None), Category::uncategorized());
        assert_eq!(Category::from_optional(Some(" Utiliti ")).as_str(), "Utiliti");
    }

    #[test]
    fn test_category_is_case_sensitive() {
        assert_ne!(Category::new("travel"), Category::new("Travel"));
    }

    #[test]
    fn test_deserialize_normalizes() {
        let category: Category = serde_json::from_str("\"  Logistik  \"").unwrap();
        assert_eq!(category.as_str(), "Logistik");

        let blank: Category = serde_json::from_str("\"\"").unwrap();
        assert_eq!(blank, Category::uncategorized());
    }

    #[test]
    fn test_ordering_is_by_name() {
        let mut categories = vec![Category::new("Utiliti"), Category::new("Logistik")];
        categories.sort();
        assert_eq!(categories[0].as_str(), "Logistik");
    }
}
