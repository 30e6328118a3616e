//! Facet values and price bounds supplied by the metadata endpoint.

use serde::{Deserialize, Serialize};

use super::id::CategoryId;
use super::price::PriceBounds;

/// A category with the number of products matching the other filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryOption {
    pub id: CategoryId,
    pub title: String,
    #[serde(default)]
    pub count: u64,
}

/// A brand with its product count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandOption {
    pub name: String,
    #[serde(default)]
    pub count: u64,
}

/// A size code with its product count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeOption {
    pub name: String,
    #[serde(default)]
    pub count: u64,
}

/// A color with its swatch code and product count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorOption {
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    /// CSS color for the swatch; `None` falls back to the color name.
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub count: u64,
}

impl ColorOption {
    /// Label shown next to the swatch.
    #[must_use]
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.name)
    }

    /// CSS value used to paint the swatch.
    #[must_use]
    pub fn swatch(&self) -> &str {
        self.code
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.name)
    }
}

/// Available facet values and the global price bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FilterMetadata {
    pub categories: Vec<CategoryOption>,
    pub brands: Vec<BrandOption>,
    pub sizes: Vec<SizeOption>,
    pub colors: Vec<ColorOption>,
    #[serde(alias = "priceRange")]
    pub price_range: PriceBounds,
}

impl FilterMetadata {
    /// Look up a category title by id.
    #[must_use]
    pub fn category_title(&self, id: CategoryId) -> Option<&str> {
        self.categories
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.title.as_str())
    }

    /// Look up a color's display label by its code.
    #[must_use]
    pub fn color_label<'a>(&'a self, name: &'a str) -> &'a str {
        self.colors
            .iter()
            .find(|c| c.name == name)
            .map_or(name, ColorOption::label)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    const SERVER_RESPONSE: &str = r##"{
        "categories": [{"id": 1, "title": "Shoes", "count": 12}],
        "brands": [{"name": "Acme", "count": 4}],
        "sizes": [{"name": "XL", "count": 2}],
        "colors": [
            {"name": "red", "display_name": "Crimson", "code": "#c00", "count": 3},
            {"name": "blue", "display_name": "blue", "code": null, "count": 1}
        ],
        "price_range": {"min": 9.5, "max": 5000.0}
    }"##;

    #[test]
    fn test_parses_server_metadata() {
        let metadata: FilterMetadata = serde_json::from_str(SERVER_RESPONSE).expect("parse");
        assert_eq!(metadata.categories.len(), 1);
        assert_eq!(metadata.category_title(CategoryId::new(1)), Some("Shoes"));
        assert_eq!(metadata.price_range.max, Decimal::from(5000));
        assert_eq!(metadata.color_label("red"), "Crimson");
        assert_eq!(metadata.color_label("green"), "green");
    }

    #[test]
    fn test_accepts_camel_case_price_range() {
        let metadata: FilterMetadata =
            serde_json::from_str(r#"{"priceRange": {"min": 0, "max": 10}}"#).expect("parse");
        assert_eq!(metadata.price_range.max, Decimal::from(10));
        assert!(metadata.brands.is_empty());
    }

    #[test]
    fn test_color_swatch_falls_back_to_name() {
        let metadata: FilterMetadata = serde_json::from_str(SERVER_RESPONSE).expect("parse");
        let blue = metadata.colors.iter().find(|c| c.name == "blue").expect("blue");
        assert_eq!(blue.swatch(), "blue");
        assert_eq!(metadata.colors.first().map(ColorOption::swatch), Some("#c00"));
    }
}
