//! Query-string dialects for the two endpoint families.
//!
//! The shop and category endpoints name their parameters differently
//! (`categories[]` vs `category`, `min_price` vs `price_min`, ...). That split
//! is an external contract, so each family gets exactly one serializer here
//! and the filter state itself stays dialect-free.
//!
//! # Example
//!
//! ```rust,ignore
//! use shopfacet_client::query::{QueryDialect, ShopDialect};
//!
//! let pairs = ShopDialect.encode(&state);
//! let restored = ShopDialect.decode(&pairs);
//! assert_eq!(restored, state);
//! ```

mod category;
mod shop;

pub use category::CategoryDialect;
pub use shop::ShopDialect;

use std::str::FromStr;

use rust_decimal::Decimal;
use shopfacet_core::{CategoryId, FilterState, MAX_RATING, MIN_RATING};
use url::Url;

use crate::config::EndpointFamily;

/// Ordered `key=value` pairs; array facets repeat their key.
pub type QueryPairs = Vec<(String, String)>;

/// Query parameter carrying the page number.
pub const PAGE_KEY: &str = "page";

/// Pagination part of a product request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: u32,
    /// Page size, when the endpoint accepts one.
    pub per_page: Option<u32>,
    /// Cap on products shown from this page (the items-per-page picker).
    pub display: Option<u32>,
}

impl PageRequest {
    /// Request `page` with the endpoint's default page size.
    #[must_use]
    pub const fn new(page: u32) -> Self {
        Self {
            page,
            per_page: None,
            display: None,
        }
    }

    /// Set the page size.
    #[must_use]
    pub const fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    /// Set the items-per-page choice; `None` shows the whole page.
    #[must_use]
    pub const fn with_display(mut self, display: Option<u32>) -> Self {
        self.display = display;
        self
    }
}

/// One endpoint family's parameter naming.
pub trait QueryDialect: Send + Sync {
    /// Encode the filter selection; empty facets are omitted.
    fn encode(&self, state: &FilterState) -> QueryPairs;

    /// Decode a filter selection, ignoring unknown keys and bad values.
    fn decode(&self, pairs: &[(String, String)]) -> FilterState;

    /// Encode the pagination part of a request.
    fn encode_page(&self, request: &PageRequest) -> QueryPairs;

    /// Every filter key this dialect reads or writes.
    fn owned_keys(&self) -> &'static [&'static str];
}

/// The dialect spoken by an endpoint family.
#[must_use]
pub fn dialect_for(endpoint: EndpointFamily) -> &'static dyn QueryDialect {
    match endpoint {
        EndpointFamily::Shop => &ShopDialect,
        EndpointFamily::Category(_) => &CategoryDialect,
    }
}

/// Mirror the filter selection into a page URL for shareable links.
///
/// Removes every key the dialect owns (and the page number, since a filter
/// change starts over at page 1), keeps unrelated parameters in order, then
/// appends the current encoding.
pub fn mirror_into_url(url: &mut Url, dialect: &dyn QueryDialect, state: &FilterState) {
    let owned = dialect.owned_keys();
    let mut pairs: QueryPairs = url
        .query_pairs()
        .filter(|(key, _)| key != PAGE_KEY && !owned.contains(&key.as_ref()))
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();
    pairs.extend(dialect.encode(state));

    if pairs.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(pairs);
    }
}

/// Restore a filter selection from a page URL.
#[must_use]
pub fn state_from_url(url: &Url, dialect: &dyn QueryDialect) -> FilterState {
    dialect.decode(&pairs_of(url))
}

/// Whether a page URL carries any filter parameter of the dialect.
#[must_use]
pub fn url_has_filters(url: &Url, dialect: &dyn QueryDialect) -> bool {
    let owned = dialect.owned_keys();
    url.query_pairs()
        .any(|(key, value)| owned.contains(&key.as_ref()) && !value.trim().is_empty())
}

/// Owned copy of a URL's query pairs.
#[must_use]
pub fn pairs_of(url: &Url) -> QueryPairs {
    url.query_pairs()
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect()
}

/// Render pairs as a `application/x-www-form-urlencoded` string.
#[must_use]
pub fn to_query_string(pairs: &[(String, String)]) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}

// =============================================================================
// Shared encoding helpers
// =============================================================================

fn push_all<'a, I>(pairs: &mut QueryPairs, key: &str, values: I)
where
    I: IntoIterator<Item = &'a String>,
{
    for value in values {
        pairs.push((key.to_string(), value.clone()));
    }
}

fn push_flag(pairs: &mut QueryPairs, key: &str, value: bool) {
    if value {
        pairs.push((key.to_string(), "true".to_string()));
    }
}

fn format_price(value: Decimal) -> String {
    value.normalize().to_string()
}

/// Non-empty, trimmed values for any of `keys`, in query order.
fn values_for<'a>(
    pairs: &'a [(String, String)],
    keys: &'a [&'a str],
) -> impl Iterator<Item = &'a str> + 'a {
    pairs
        .iter()
        .filter(move |(key, _)| keys.contains(&key.as_str()))
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
}

/// First non-empty value for any of `keys`.
fn first_for<'a>(pairs: &'a [(String, String)], keys: &'a [&'a str]) -> Option<&'a str> {
    values_for(pairs, keys).next()
}

fn strings_for(pairs: &[(String, String)], keys: &[&str]) -> std::collections::BTreeSet<String> {
    values_for(pairs, keys).map(str::to_string).collect()
}

fn categories_for(
    pairs: &[(String, String)],
    keys: &[&str],
) -> std::collections::BTreeSet<CategoryId> {
    values_for(pairs, keys)
        .filter_map(|v| v.parse::<CategoryId>().ok())
        .filter(|id| id.as_i64() > 0)
        .collect()
}

fn ratings_for(pairs: &[(String, String)], keys: &[&str]) -> std::collections::BTreeSet<u8> {
    values_for(pairs, keys)
        .filter_map(|v| v.parse::<u8>().ok())
        .filter(|r| (MIN_RATING..=MAX_RATING).contains(r))
        .collect()
}

fn price_for(pairs: &[(String, String)], keys: &[&str]) -> Option<Decimal> {
    first_for(pairs, keys)
        .and_then(|v| Decimal::from_str(v).ok())
        .filter(|v| *v >= Decimal::ZERO)
}

/// Truthy values the server accepts for toggles.
fn flag_for(pairs: &[(String, String)], keys: &[&str]) -> bool {
    first_for(pairs, keys).is_some_and(|v| matches!(v, "true" | "1" | "True" | "TRUE"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shopfacet_core::SortKey;

    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> QueryPairs {
        raw.iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_mirror_replaces_owned_keys_and_keeps_others() {
        let mut url =
            Url::parse("https://shop.test/shop/?utm_source=mail&brands[]=Old&page=4").unwrap();
        let mut state = FilterState::default();
        state.toggle_brand("Acme");
        state.sort_by = SortKey::PriceAsc;

        mirror_into_url(&mut url, &ShopDialect, &state);

        let restored = pairs_of(&url);
        assert_eq!(
            restored,
            pairs(&[
                ("utm_source", "mail"),
                ("brands[]", "Acme"),
                ("prices", "highest"),
            ])
        );
    }

    #[test]
    fn test_mirror_empty_state_clears_query() {
        let mut url = Url::parse("https://shop.test/shop/?colors[]=red&page=2").unwrap();
        mirror_into_url(&mut url, &ShopDialect, &FilterState::default());
        assert_eq!(url.query(), None);
    }

    #[test]
    fn test_state_from_url_round_trips_through_mirror() {
        let mut url = Url::parse("https://shop.test/category/3/").unwrap();
        let mut state = FilterState::default();
        state.toggle_size("XL");
        state.toggle_material("linen");
        state.set_price_range(Some(Decimal::new(1050, 2)), None);

        mirror_into_url(&mut url, &CategoryDialect, &state);

        assert_eq!(state_from_url(&url, &CategoryDialect), state);
        assert!(url_has_filters(&url, &CategoryDialect));
    }

    #[test]
    fn test_url_without_filters() {
        let url = Url::parse("https://shop.test/shop/?utm_source=x&page=2").unwrap();
        assert!(!url_has_filters(&url, &ShopDialect));
        assert!(state_from_url(&url, &ShopDialect).is_empty());
    }

    #[test]
    fn test_dialect_for_endpoint() {
        let shop = dialect_for(EndpointFamily::Shop);
        assert!(shop.owned_keys().contains(&"categories[]"));
        let category = dialect_for(EndpointFamily::Category(CategoryId::new(1)));
        assert!(category.owned_keys().contains(&"price_min"));
    }

    #[test]
    fn test_to_query_string_escapes_brackets_and_spaces() {
        let query = to_query_string(&pairs(&[("brands[]", "Big Co"), ("page", "1")]));
        assert_eq!(query, "brands%5B%5D=Big+Co&page=1");
    }

    #[test]
    fn test_bad_values_are_ignored() {
        let decoded = ShopDialect.decode(&pairs(&[
            ("categories[]", "abc"),
            ("categories[]", "-4"),
            ("categories[]", "7"),
            ("rating[]", "9"),
            ("min_price", "cheap"),
            ("max_price", "-1"),
        ]));
        assert_eq!(
            decoded.categories.into_iter().collect::<Vec<_>>(),
            vec![CategoryId::new(7)]
        );
        assert!(decoded.rating.is_empty());
        assert!(decoded.price_range.is_unbounded());
    }
}
