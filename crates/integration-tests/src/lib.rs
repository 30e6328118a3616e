//! Integration tests for Shopfacet.
//!
//! The tests drive the real client against [`MockCatalog`], an in-process
//! `axum` server that speaks both endpoint dialects and the metadata
//! endpoint, and records every request it receives.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopfacet-integration-tests
//! ```

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, RawQuery, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use shopfacet_client::config::DebounceConfig;
use shopfacet_client::{ClientConfig, EndpointFamily};
use tokio::task::JoinHandle;
use url::Url;

/// Category id the mock knows; any other id answers 404.
pub const KNOWN_CATEGORY: i64 = 12;

/// How the mock answers.
#[derive(Debug, Clone)]
pub struct MockSettings {
    /// Pages available for any selection.
    pub num_pages: u32,
    /// Total products reported for any selection.
    pub product_count: u64,
    /// Answer product requests with a 500.
    pub fail_products: bool,
    /// Answer metadata requests with a 500.
    pub fail_metadata: bool,
    /// Body of the metadata endpoint.
    pub metadata: Value,
}

impl Default for MockSettings {
    fn default() -> Self {
        Self {
            num_pages: 3,
            product_count: 50,
            fail_products: false,
            fail_metadata: false,
            metadata: sample_metadata(),
        }
    }
}

/// A request the mock received.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub query: Vec<(String, String)>,
}

impl RecordedRequest {
    /// First value of a query parameter.
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

struct MockState {
    settings: Mutex<MockSettings>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockState {
    fn record(&self, path: String, query: Option<&str>) -> Vec<(String, String)> {
        let pairs: Vec<(String, String)> = url::form_urlencoded::parse(
            query.unwrap_or_default().as_bytes(),
        )
        .into_owned()
        .collect();
        self.requests.lock().unwrap().push(RecordedRequest {
            path,
            query: pairs.clone(),
        });
        pairs
    }

    fn settings(&self) -> MockSettings {
        self.settings.lock().unwrap().clone()
    }
}

/// A running mock catalog server on an ephemeral port.
pub struct MockCatalog {
    base_url: Url,
    state: Arc<MockState>,
    task: JoinHandle<()>,
}

impl MockCatalog {
    /// Start a server with default settings.
    pub async fn start() -> Self {
        Self::start_with(MockSettings::default()).await
    }

    /// Start a server with the given settings.
    pub async fn start_with(settings: MockSettings) -> Self {
        let state = Arc::new(MockState {
            settings: Mutex::new(settings),
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/filter_products/", get(shop_products))
            .route("/category/{id}/filter/", get(category_products))
            .route("/api/filter_metadata/", get(filter_metadata))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let task = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: Url::parse(&format!("http://{addr}/")).unwrap(),
            state,
            task,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Client configuration pointing at this server, with short debounce
    /// windows so tests run quickly on real time.
    #[must_use]
    pub fn config(&self, endpoint: EndpointFamily) -> ClientConfig {
        let mut config = ClientConfig::new(self.base_url.clone());
        config.endpoint = endpoint;
        config.timeout = Duration::from_secs(5);
        config.debounce = DebounceConfig {
            search: Duration::from_millis(100),
            scroll: Duration::from_millis(50),
            resize: Duration::from_millis(50),
        };
        config
    }

    /// A storefront page URL on this server.
    #[must_use]
    pub fn page_url(&self, path_and_query: &str) -> Url {
        self.base_url.join(path_and_query).unwrap()
    }

    /// Change how the server answers from now on.
    pub fn update<F>(&self, change: F)
    where
        F: FnOnce(&mut MockSettings),
    {
        change(&mut self.state.settings.lock().unwrap());
    }

    /// Every request received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    /// Requests whose path starts with `prefix`.
    #[must_use]
    pub fn requests_to(&self, prefix: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path.starts_with(prefix))
            .collect()
    }

    /// Number of product requests, whichever endpoint served them.
    #[must_use]
    pub fn product_hits(&self) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.path.starts_with("/filter_products/") || r.path.starts_with("/category/"))
            .count()
    }

    /// Number of metadata requests.
    #[must_use]
    pub fn metadata_hits(&self) -> usize {
        self.requests_to("/api/filter_metadata/").len()
    }
}

impl Drop for MockCatalog {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Metadata with a 0-5000 price range and a few options per facet.
#[must_use]
pub fn sample_metadata() -> Value {
    json!({
        "categories": [
            {"id": 3, "title": "Shoes", "count": 20},
            {"id": 7, "title": "Bags", "count": 9}
        ],
        "brands": [
            {"name": "Acme", "count": 14},
            {"name": "Globex", "count": 6}
        ],
        "sizes": [
            {"name": "M", "count": 11},
            {"name": "XL", "count": 0}
        ],
        "colors": [
            {"name": "red", "display_name": "Red", "code": "#ff0000", "count": 5}
        ],
        "price_range": {"min": 0, "max": 5000.0}
    })
}

fn page_param(query: &[(String, String)]) -> u32 {
    query
        .iter()
        .find(|(k, _)| k == "page")
        .and_then(|(_, v)| v.parse().ok())
        .unwrap_or(1)
}

async fn shop_products(State(state): State<Arc<MockState>>, RawQuery(query): RawQuery) -> Response {
    let query = state.record("/filter_products/".to_string(), query.as_deref());
    let settings = state.settings();
    if settings.fail_products {
        return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
    }

    let page = page_param(&query);
    Json(json!({
        "html": format!("<div class=\"wb-product-card\">page {page}</div>"),
        "product_count": settings.product_count,
        "page": page,
        "has_next": page < settings.num_pages,
        "has_previous": page > 1,
        "num_pages": settings.num_pages,
        "per_page": 20
    }))
    .into_response()
}

async fn category_products(
    State(state): State<Arc<MockState>>,
    Path(id): Path<i64>,
    RawQuery(query): RawQuery,
) -> Response {
    let raw = query.unwrap_or_default();
    let pairs = state.record(format!("/category/{id}/filter/"), Some(&raw));
    let settings = state.settings();

    if id != KNOWN_CATEGORY {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"success": false, "error": "Category not found"})),
        )
            .into_response();
    }
    if settings.fail_products {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"success": false, "error": "Failed to filter products"})),
        )
            .into_response();
    }

    let page = page_param(&pairs);
    let canonical: Vec<(String, String)> = pairs.into_iter().filter(|(k, _)| k != "page").collect();
    let canonical = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(canonical)
        .finish();

    // Active-filter tags render empty when nothing is selected
    let filters_html = if canonical.is_empty() {
        ""
    } else {
        "<form class=\"filters\"></form>"
    };

    Json(json!({
        "success": true,
        "products_html": format!("<li class=\"product\">page {page}</li>"),
        "filters_html": filters_html,
        "pagination_html": "<nav class=\"pagination\"></nav>",
        "product_count": settings.product_count,
        "update_url": format!("/category/{id}/?{canonical}"),
        "page": page,
        "has_next": page < settings.num_pages,
        "has_previous": page > 1
    }))
    .into_response()
}

async fn filter_metadata(
    State(state): State<Arc<MockState>>,
    RawQuery(query): RawQuery,
) -> Response {
    state.record("/api/filter_metadata/".to_string(), query.as_deref());
    let settings = state.settings();
    if settings.fail_metadata {
        return (StatusCode::INTERNAL_SERVER_ERROR, "metadata unavailable").into_response();
    }
    Json(settings.metadata).into_response()
}
