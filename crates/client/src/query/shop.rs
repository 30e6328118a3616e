//! `/filter_products/` parameter naming.
//!
//! Array facets use PHP-style `key[]` names. The server also accepts the bare
//! key, so decoding reads both.

use shopfacet_core::{FilterState, PriceRange, SortKey};

use super::{
    PageRequest, QueryDialect, QueryPairs, categories_for, first_for, flag_for, format_price,
    price_for, push_all, push_flag, ratings_for, strings_for,
};

const CATEGORIES: &[&str] = &["categories[]", "categories"];
const BRANDS: &[&str] = &["brands[]", "brands"];
const RATING: &[&str] = &["rating[]", "rating"];
const SIZES: &[&str] = &["sizes[]", "sizes"];
const COLORS: &[&str] = &["colors[]", "colors"];
const MIN_PRICE: &[&str] = &["min_price"];
const MAX_PRICE: &[&str] = &["max_price"];
const SORT: &[&str] = &["prices"];
const SEARCH: &[&str] = &["searchFilter"];
const IN_STOCK: &[&str] = &["in_stock"];
const IS_NEW: &[&str] = &["is_new"];
const HAS_DISCOUNT: &[&str] = &["has_discount"];

const OWNED_KEYS: &[&str] = &[
    "categories[]",
    "categories",
    "brands[]",
    "brands",
    "rating[]",
    "rating",
    "sizes[]",
    "sizes",
    "colors[]",
    "colors",
    "min_price",
    "max_price",
    "prices",
    "searchFilter",
    "in_stock",
    "is_new",
    "has_discount",
];

/// Dialect of the catalog-wide shop endpoint.
///
/// Seasons, materials and the sale toggle have no shop parameter and are not
/// sent.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShopDialect;

/// Wire name of a sort key. The server's naming is inverted for price:
/// `highest` sorts cheapest first.
const fn sort_param(sort: SortKey) -> Option<&'static str> {
    match sort {
        SortKey::Default => None,
        SortKey::PriceAsc => Some("highest"),
        SortKey::PriceDesc => Some("lowest"),
        SortKey::Rating => Some("rating"),
        SortKey::Popular => Some("popular"),
    }
}

fn parse_sort(value: &str) -> SortKey {
    match value {
        "highest" => SortKey::PriceAsc,
        "lowest" => SortKey::PriceDesc,
        "rating" => SortKey::Rating,
        "popular" => SortKey::Popular,
        _ => SortKey::Default,
    }
}

impl QueryDialect for ShopDialect {
    fn encode(&self, state: &FilterState) -> QueryPairs {
        let mut pairs = QueryPairs::new();

        for id in &state.categories {
            pairs.push(("categories[]".to_string(), id.to_string()));
        }
        push_all(&mut pairs, "brands[]", &state.brands);
        for rating in &state.rating {
            pairs.push(("rating[]".to_string(), rating.to_string()));
        }
        push_all(&mut pairs, "sizes[]", &state.sizes);
        push_all(&mut pairs, "colors[]", &state.colors);

        if let Some(min) = state.price_range.min {
            pairs.push(("min_price".to_string(), format_price(min)));
        }
        if let Some(max) = state.price_range.max {
            pairs.push(("max_price".to_string(), format_price(max)));
        }
        if let Some(sort) = sort_param(state.sort_by) {
            pairs.push(("prices".to_string(), sort.to_string()));
        }
        if !state.search_query.is_empty() {
            pairs.push(("searchFilter".to_string(), state.search_query.clone()));
        }

        push_flag(&mut pairs, "in_stock", state.in_stock);
        push_flag(&mut pairs, "is_new", state.is_new);
        push_flag(&mut pairs, "has_discount", state.has_discount);

        pairs
    }

    fn decode(&self, pairs: &[(String, String)]) -> FilterState {
        FilterState {
            categories: categories_for(pairs, CATEGORIES),
            brands: strings_for(pairs, BRANDS),
            rating: ratings_for(pairs, RATING),
            sizes: strings_for(pairs, SIZES),
            colors: strings_for(pairs, COLORS),
            price_range: PriceRange::new(price_for(pairs, MIN_PRICE), price_for(pairs, MAX_PRICE)),
            in_stock: flag_for(pairs, IN_STOCK),
            is_new: flag_for(pairs, IS_NEW),
            has_discount: flag_for(pairs, HAS_DISCOUNT),
            sort_by: first_for(pairs, SORT).map_or(SortKey::Default, parse_sort),
            search_query: first_for(pairs, SEARCH).unwrap_or_default().to_string(),
            ..FilterState::default()
        }
    }

    fn encode_page(&self, request: &PageRequest) -> QueryPairs {
        let mut pairs = vec![("page".to_string(), request.page.to_string())];
        if let Some(per_page) = request.per_page {
            pairs.push(("per_page".to_string(), per_page.to_string()));
        }
        if let Some(display) = request.display {
            pairs.push(("display".to_string(), display.to_string()));
        }
        pairs
    }

    fn owned_keys(&self) -> &'static [&'static str] {
        OWNED_KEYS
    }
}
