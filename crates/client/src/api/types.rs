//! Wire types for the catalog endpoints.

use serde::{Deserialize, Serialize};

/// `/filter_products/` response body.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ShopPageResponse {
    pub html: String,
    pub product_count: u64,
    pub page: u32,
    pub has_next: bool,
    pub has_previous: bool,
    pub num_pages: Option<u32>,
}

impl Default for ShopPageResponse {
    fn default() -> Self {
        Self {
            html: String::new(),
            product_count: 0,
            page: 1,
            has_next: false,
            has_previous: false,
            num_pages: None,
        }
    }
}

/// `/category/{id}/filter/` response body.
///
/// Errors come back in the same envelope with `success: false`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CategoryPageResponse {
    pub success: bool,
    pub error: Option<String>,
    pub products_html: String,
    pub filters_html: Option<String>,
    pub pagination_html: Option<String>,
    pub product_count: u64,
    pub update_url: Option<String>,
    pub page: u32,
    pub has_next: bool,
    pub has_previous: bool,
}

impl Default for CategoryPageResponse {
    fn default() -> Self {
        Self {
            success: false,
            error: None,
            products_html: String::new(),
            filters_html: None,
            pagination_html: None,
            product_count: 0,
            update_url: None,
            page: 1,
            has_next: false,
            has_previous: false,
        }
    }
}

/// One page of filtered products, whichever endpoint served it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductPage {
    /// Rendered product cards.
    pub html: String,
    /// Re-rendered active-filter tags (category endpoint).
    ///
    /// `None` when the endpoint never renders them; `Some("")` when it
    /// rendered nothing because no filter is active.
    pub filters_html: Option<String>,
    /// Server-rendered pagination (category endpoint).
    pub pagination_html: Option<String>,
    /// Total matching products across all pages.
    pub product_count: u64,
    pub page: u32,
    pub has_next: bool,
    pub has_previous: bool,
    /// Page count, when the endpoint reports it.
    pub num_pages: Option<u32>,
    /// Canonical page URL for the selection (category endpoint).
    pub update_url: Option<String>,
}

impl From<ShopPageResponse> for ProductPage {
    fn from(response: ShopPageResponse) -> Self {
        Self {
            html: response.html,
            filters_html: None,
            pagination_html: None,
            product_count: response.product_count,
            page: response.page.max(1),
            has_next: response.has_next,
            has_previous: response.has_previous,
            num_pages: response.num_pages,
            update_url: None,
        }
    }
}

impl From<CategoryPageResponse> for ProductPage {
    fn from(response: CategoryPageResponse) -> Self {
        Self {
            html: response.products_html,
            filters_html: Some(response.filters_html.unwrap_or_default()),
            pagination_html: response.pagination_html.filter(|h| !h.trim().is_empty()),
            product_count: response.product_count,
            page: response.page.max(1),
            has_next: response.has_next,
            has_previous: response.has_previous,
            num_pages: None,
            update_url: response.update_url.filter(|u| !u.is_empty()),
        }
    }
}
