//! Product listing sort order.

use serde::{Deserialize, Serialize};

/// Canonical sort key.
///
/// Each endpoint family spells these differently on the wire; the
/// translation lives with the query dialects, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Server default (newest first on the shop endpoint, popularity on the
    /// category endpoint).
    #[default]
    #[serde(alias = "")]
    Default,
    /// Cheapest first.
    #[serde(alias = "highest")]
    PriceAsc,
    /// Most expensive first.
    #[serde(alias = "lowest")]
    PriceDesc,
    /// Highest average rating first.
    Rating,
    /// Most reviewed first.
    #[serde(alias = "popularity")]
    Popular,
}

impl SortKey {
    /// All sort keys, in picker order.
    pub const ALL: [Self; 5] = [
        Self::Default,
        Self::PriceAsc,
        Self::PriceDesc,
        Self::Rating,
        Self::Popular,
    ];

    /// Whether this is the server default.
    #[must_use]
    pub const fn is_default(self) -> bool {
        matches!(self, Self::Default)
    }

    /// Human-readable label for pickers and chips.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Default => "Default",
            Self::PriceAsc => "Price: low to high",
            Self::PriceDesc => "Price: high to low",
            Self::Rating => "Top rated",
            Self::Popular => "Most popular",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_key_accepts_legacy_shop_spellings() {
        let key: SortKey = serde_json::from_str("\"highest\"").expect("alias");
        assert_eq!(key, SortKey::PriceAsc);
        let key: SortKey = serde_json::from_str("\"lowest\"").expect("alias");
        assert_eq!(key, SortKey::PriceDesc);
        let key: SortKey = serde_json::from_str("\"\"").expect("alias");
        assert_eq!(key, SortKey::Default);
    }

    #[test]
    fn test_sort_key_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&SortKey::PriceDesc).expect("serialize"),
            "\"price_desc\""
        );
    }
}
