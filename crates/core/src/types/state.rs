//! The filter selection shared by every filter form on the page.
//!
//! One value replaces the separate desktop sidebar and mobile sheet
//! selections. Set-valued facets use ordered sets, so values stay unique and
//! encode in a stable order.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::CategoryId;
use super::price::{PriceBounds, PriceRange};
use super::sort::SortKey;

/// Lowest selectable rating threshold.
pub const MIN_RATING: u8 = 1;
/// Highest selectable rating threshold.
pub const MAX_RATING: u8 = 5;

/// Boolean toggles offered next to the facet lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterFlag {
    InStock,
    IsNew,
    HasDiscount,
    OnSale,
}

impl FilterFlag {
    /// All flags.
    pub const ALL: [Self; 4] = [Self::InStock, Self::IsNew, Self::HasDiscount, Self::OnSale];

    /// Human-readable label for chips.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::InStock => "In stock",
            Self::IsNew => "New arrivals",
            Self::HasDiscount => "Discounted",
            Self::OnSale => "Sale only",
        }
    }
}

/// The current filter selection.
///
/// Serialized with camelCase keys; this is the persisted blob format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterState {
    pub categories: BTreeSet<CategoryId>,
    pub brands: BTreeSet<String>,
    pub rating: BTreeSet<u8>,
    pub sizes: BTreeSet<String>,
    pub colors: BTreeSet<String>,
    pub seasons: BTreeSet<String>,
    pub materials: BTreeSet<String>,
    pub price_range: PriceRange,
    pub in_stock: bool,
    pub is_new: bool,
    pub has_discount: bool,
    pub on_sale: bool,
    pub sort_by: SortKey,
    pub search_query: String,
}

impl FilterState {
    /// Whether no filter, sort or search is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Clear every selection and restore the default price bounds.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Toggle a category; returns whether it is now selected.
    pub fn toggle_category(&mut self, id: CategoryId) -> bool {
        toggle(&mut self.categories, id)
    }

    /// Toggle a brand; returns whether it is now selected.
    pub fn toggle_brand(&mut self, brand: &str) -> bool {
        toggle_text(&mut self.brands, brand)
    }

    /// Toggle a size; returns whether it is now selected.
    pub fn toggle_size(&mut self, size: &str) -> bool {
        toggle_text(&mut self.sizes, size)
    }

    /// Toggle a color; returns whether it is now selected.
    pub fn toggle_color(&mut self, color: &str) -> bool {
        toggle_text(&mut self.colors, color)
    }

    /// Toggle a season; returns whether it is now selected.
    pub fn toggle_season(&mut self, season: &str) -> bool {
        toggle_text(&mut self.seasons, season)
    }

    /// Toggle a material; returns whether it is now selected.
    pub fn toggle_material(&mut self, material: &str) -> bool {
        toggle_text(&mut self.materials, material)
    }

    /// Select a single rating threshold, replacing any other.
    ///
    /// The picker is a radio group; out-of-range thresholds are ignored.
    /// `None` clears the rating filter.
    pub fn select_rating(&mut self, rating: Option<u8>) {
        self.rating.clear();
        if let Some(rating) = rating.filter(|r| (MIN_RATING..=MAX_RATING).contains(r)) {
            self.rating.insert(rating);
        }
    }

    /// Set the price range as typed by the user.
    pub fn set_price_range(&mut self, min: Option<Decimal>, max: Option<Decimal>) {
        self.price_range = PriceRange::new(min, max);
    }

    /// Drop price bounds that do not narrow the catalog.
    pub fn normalize_price(&mut self, bounds: &PriceBounds) {
        self.price_range = self.price_range.normalized(bounds);
    }

    /// Read a boolean toggle.
    #[must_use]
    pub const fn flag(&self, flag: FilterFlag) -> bool {
        match flag {
            FilterFlag::InStock => self.in_stock,
            FilterFlag::IsNew => self.is_new,
            FilterFlag::HasDiscount => self.has_discount,
            FilterFlag::OnSale => self.on_sale,
        }
    }

    /// Set a boolean toggle.
    pub const fn set_flag(&mut self, flag: FilterFlag, value: bool) {
        match flag {
            FilterFlag::InStock => self.in_stock = value,
            FilterFlag::IsNew => self.is_new = value,
            FilterFlag::HasDiscount => self.has_discount = value,
            FilterFlag::OnSale => self.on_sale = value,
        }
    }

    /// Set the search text, trimming surrounding whitespace.
    pub fn set_search(&mut self, query: &str) {
        query.trim().clone_into(&mut self.search_query);
    }
}

fn toggle<T: Ord>(set: &mut BTreeSet<T>, value: T) -> bool {
    if set.remove(&value) {
        false
    } else {
        set.insert(value);
        true
    }
}

fn toggle_text(set: &mut BTreeSet<String>, value: &str) -> bool {
    let value = value.trim();
    if value.is_empty() {
        return false;
    }
    toggle(set, value.to_string())
}
