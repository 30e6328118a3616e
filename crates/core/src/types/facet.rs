//! Facets, active badges and removable chips.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::CategoryId;
use super::metadata::FilterMetadata;
use super::price::PriceRange;
use super::sort::SortKey;
use super::state::{FilterFlag, FilterState};

/// A filter-bar button, each opening one picker panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facet {
    Categories,
    Price,
    Rating,
    Size,
    Color,
    Brand,
    Sort,
}

impl Facet {
    /// Filter-bar order.
    pub const ALL: [Self; 7] = [
        Self::Categories,
        Self::Price,
        Self::Rating,
        Self::Size,
        Self::Color,
        Self::Brand,
        Self::Sort,
    ];

    /// Button and panel title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Categories => "Categories",
            Self::Price => "Price",
            Self::Rating => "Rating",
            Self::Size => "Size",
            Self::Color => "Color",
            Self::Brand => "Brand",
            Self::Sort => "Sort",
        }
    }

    /// Whether the button should carry the "active" badge.
    #[must_use]
    pub fn is_active(self, state: &FilterState, metadata: &FilterMetadata) -> bool {
        match self {
            Self::Categories => !state.categories.is_empty(),
            Self::Price => state.price_range.is_active(&metadata.price_range),
            Self::Rating => !state.rating.is_empty(),
            Self::Size => !state.sizes.is_empty(),
            Self::Color => !state.colors.is_empty(),
            Self::Brand => !state.brands.is_empty(),
            Self::Sort => !state.sort_by.is_default(),
        }
    }
}

/// Which selection a chip stands for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChipValue {
    Category(CategoryId),
    Brand(String),
    Rating(u8),
    Size(String),
    Color(String),
    Season(String),
    Material(String),
    Price,
    Flag(FilterFlag),
    Sort,
    Search,
}

/// One removable token for an active filter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterChip {
    pub value: ChipValue,
    pub label: String,
}

impl FilterChip {
    fn new(value: ChipValue, label: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
        }
    }

    /// Remove exactly the selection this chip represents.
    ///
    /// Returns whether the state changed.
    pub fn remove_from(&self, state: &mut FilterState) -> bool {
        match &self.value {
            ChipValue::Category(id) => state.categories.remove(id),
            ChipValue::Brand(v) => state.brands.remove(v),
            ChipValue::Rating(r) => state.rating.remove(r),
            ChipValue::Size(v) => state.sizes.remove(v),
            ChipValue::Color(v) => state.colors.remove(v),
            ChipValue::Season(v) => state.seasons.remove(v),
            ChipValue::Material(v) => state.materials.remove(v),
            ChipValue::Price => {
                let changed = !state.price_range.is_unbounded();
                state.price_range = PriceRange::default();
                changed
            }
            ChipValue::Flag(flag) => {
                let changed = state.flag(*flag);
                state.set_flag(*flag, false);
                changed
            }
            ChipValue::Sort => {
                let changed = !state.sort_by.is_default();
                state.sort_by = SortKey::Default;
                changed
            }
            ChipValue::Search => {
                let changed = !state.search_query.is_empty();
                state.search_query.clear();
                changed
            }
        }
    }
}

impl fmt::Display for FilterChip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// List a chip for every active filter value, in filter-bar order.
///
/// Category titles and color labels are resolved through `metadata`; unknown
/// categories fall back to their id.
#[must_use]
pub fn active_chips(state: &FilterState, metadata: &FilterMetadata) -> Vec<FilterChip> {
    let mut chips = Vec::new();

    for id in &state.categories {
        let label = metadata
            .category_title(*id)
            .map_or_else(|| format!("Category {id}"), str::to_string);
        chips.push(FilterChip::new(ChipValue::Category(*id), label));
    }

    if let Some(label) = price_label(state, metadata) {
        chips.push(FilterChip::new(ChipValue::Price, label));
    }

    for rating in &state.rating {
        chips.push(FilterChip::new(
            ChipValue::Rating(*rating),
            format!("{rating}★ & up"),
        ));
    }
    for size in &state.sizes {
        chips.push(FilterChip::new(ChipValue::Size(size.clone()), format!("Size: {size}")));
    }
    for color in &state.colors {
        chips.push(FilterChip::new(
            ChipValue::Color(color.clone()),
            metadata.color_label(color).to_string(),
        ));
    }
    for brand in &state.brands {
        chips.push(FilterChip::new(ChipValue::Brand(brand.clone()), brand.clone()));
    }
    for season in &state.seasons {
        chips.push(FilterChip::new(
            ChipValue::Season(season.clone()),
            format!("Season: {season}"),
        ));
    }
    for material in &state.materials {
        chips.push(FilterChip::new(
            ChipValue::Material(material.clone()),
            format!("Material: {material}"),
        ));
    }
    for flag in FilterFlag::ALL {
        if state.flag(flag) {
            chips.push(FilterChip::new(ChipValue::Flag(flag), flag.label()));
        }
    }
    if !state.sort_by.is_default() {
        chips.push(FilterChip::new(ChipValue::Sort, state.sort_by.label()));
    }
    if !state.search_query.is_empty() {
        chips.push(FilterChip::new(
            ChipValue::Search,
            format!("Search: {}", state.search_query),
        ));
    }

    chips
}

fn price_label(state: &FilterState, metadata: &FilterMetadata) -> Option<String> {
    let range = state.price_range.normalized(&metadata.price_range);
    match (range.min, range.max) {
        (Some(min), Some(max)) => Some(format!("{}–{}", fmt_price(min), fmt_price(max))),
        (Some(min), None) => Some(format!("From {}", fmt_price(min))),
        (None, Some(max)) if metadata.price_range.is_known() => {
            Some(format!("Up to {}", fmt_price(max)))
        }
        _ => None,
    }
}

fn fmt_price(value: Decimal) -> String {
    value.normalize().to_string()
}
