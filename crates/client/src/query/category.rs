//! `/category/{id}/filter/` parameter naming.

use shopfacet_core::{FilterState, PriceRange, SortKey};

use super::{
    PageRequest, QueryDialect, QueryPairs, categories_for, first_for, flag_for, format_price,
    price_for, push_all, push_flag, strings_for,
};

const OWNED_KEYS: &[&str] = &[
    "category",
    "brand",
    "size",
    "color",
    "season",
    "material",
    "price_min",
    "price_max",
    "q",
    "sale",
    "sort",
];

/// Dialect of the category-scoped endpoint.
///
/// This endpoint has no rating filter and no stock, novelty or discount
/// toggles; those selections are not sent.
#[derive(Debug, Clone, Copy, Default)]
pub struct CategoryDialect;

const fn sort_param(sort: SortKey) -> Option<&'static str> {
    match sort {
        SortKey::Default => None,
        SortKey::PriceAsc => Some("price_asc"),
        SortKey::PriceDesc => Some("price_desc"),
        SortKey::Rating => Some("rating"),
        SortKey::Popular => Some("popularity"),
    }
}

fn parse_sort(value: &str) -> SortKey {
    match value {
        "price_asc" => SortKey::PriceAsc,
        "price_desc" => SortKey::PriceDesc,
        "rating" => SortKey::Rating,
        "popularity" => SortKey::Popular,
        _ => SortKey::Default,
    }
}

impl QueryDialect for CategoryDialect {
    fn encode(&self, state: &FilterState) -> QueryPairs {
        let mut pairs = QueryPairs::new();

        for id in &state.categories {
            pairs.push(("category".to_string(), id.to_string()));
        }
        push_all(&mut pairs, "brand", &state.brands);
        push_all(&mut pairs, "size", &state.sizes);
        push_all(&mut pairs, "color", &state.colors);
        push_all(&mut pairs, "season", &state.seasons);
        push_all(&mut pairs, "material", &state.materials);

        if let Some(min) = state.price_range.min {
            pairs.push(("price_min".to_string(), format_price(min)));
        }
        if let Some(max) = state.price_range.max {
            pairs.push(("price_max".to_string(), format_price(max)));
        }
        if !state.search_query.is_empty() {
            pairs.push(("q".to_string(), state.search_query.clone()));
        }
        push_flag(&mut pairs, "sale", state.on_sale);
        if let Some(sort) = sort_param(state.sort_by) {
            pairs.push(("sort".to_string(), sort.to_string()));
        }

        pairs
    }

    fn decode(&self, pairs: &[(String, String)]) -> FilterState {
        FilterState {
            categories: categories_for(pairs, &["category"]),
            brands: strings_for(pairs, &["brand"]),
            sizes: strings_for(pairs, &["size"]),
            colors: strings_for(pairs, &["color"]),
            seasons: strings_for(pairs, &["season"]),
            materials: strings_for(pairs, &["material"]),
            price_range: PriceRange::new(
                price_for(pairs, &["price_min"]),
                price_for(pairs, &["price_max"]),
            ),
            on_sale: flag_for(pairs, &["sale"]),
            sort_by: first_for(pairs, &["sort"]).map_or(SortKey::Default, parse_sort),
            search_query: first_for(pairs, &["q"]).unwrap_or_default().to_string(),
            ..FilterState::default()
        }
    }

    /// Page size is fixed server-side for this endpoint.
    fn encode_page(&self, request: &PageRequest) -> QueryPairs {
        vec![("page".to_string(), request.page.to_string())]
    }

    fn owned_keys(&self) -> &'static [&'static str] {
        OWNED_KEYS
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use shopfacet_core::CategoryId;

    use super::*;

    #[test]
    fn test_round_trip() {
        let mut state = FilterState::default();
        state.toggle_category(CategoryId::new(8));
        state.toggle_brand("Acme");
        state.toggle_size("S");
        state.toggle_color("red");
        state.toggle_season("summer");
        state.toggle_material("cotton");
        state.set_price_range(None, Some(Decimal::from(120)));
        state.on_sale = true;
        state.sort_by = SortKey::Popular;
        state.set_search("dress");

        assert_eq!(CategoryDialect.decode(&CategoryDialect.encode(&state)), state);
    }

    #[test]
    fn test_encode_names() {
        let mut state = FilterState::default();
        state.toggle_brand("Acme");
        state.set_price_range(Some(Decimal::from(10)), Some(Decimal::from(50)));
        state.on_sale = true;
        state.sort_by = SortKey::PriceAsc;
        state.set_search("coat");

        assert_eq!(
            CategoryDialect.encode(&state),
            vec![
                ("brand".to_string(), "Acme".to_string()),
                ("price_min".to_string(), "10".to_string()),
                ("price_max".to_string(), "50".to_string()),
                ("q".to_string(), "coat".to_string()),
                ("sale".to_string(), "true".to_string()),
                ("sort".to_string(), "price_asc".to_string()),
            ]
        );
    }

    #[test]
    fn test_shop_only_fields_are_not_sent() {
        let mut state = FilterState::default();
        state.select_rating(Some(3));
        state.in_stock = true;
        state.is_new = true;
        state.has_discount = true;
        assert!(CategoryDialect.encode(&state).is_empty());
    }

    #[test]
    fn test_default_sort_is_omitted_and_unknown_sort_decodes_to_default() {
        assert!(CategoryDialect.encode(&FilterState::default()).is_empty());

        let pairs = vec![("sort".to_string(), "newest".to_string())];
        assert_eq!(CategoryDialect.decode(&pairs).sort_by, SortKey::Default);
    }

    #[test]
    fn test_encode_page_ignores_page_size() {
        let pairs = CategoryDialect.encode_page(&PageRequest::new(2).with_per_page(50));
        assert_eq!(pairs, vec![("page".to_string(), "2".to_string())]);
    }
}
