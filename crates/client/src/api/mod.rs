//! HTTP client for the catalog endpoints.
//!
//! Uses `reqwest` 0.13 for HTTP. Product pages are never cached; facet
//! metadata is cached with `moka` (5-minute TTL), keyed by the filter query
//! that produced it.

mod types;

pub use types::{CategoryPageResponse, ProductPage, ShopPageResponse};

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use shopfacet_core::{FilterMetadata, FilterState};
use tracing::{debug, instrument};
use url::Url;

use crate::config::{ClientConfig, EndpointFamily};
use crate::error::{ClientError, Result};
use crate::query::{PageRequest, QueryDialect, QueryPairs, ShopDialect, dialect_for};

/// Path of the facet metadata endpoint.
const METADATA_PATH: &str = "/api/filter_metadata/";

/// Longest body excerpt kept in errors and logs.
const BODY_EXCERPT_CHARS: usize = 500;

// =============================================================================
// CatalogClient
// =============================================================================

/// Client for the product filter and metadata endpoints.
///
/// Cheap to clone; clones share the HTTP connection pool and metadata cache.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: Url,
    endpoint: EndpointFamily,
    per_page: u32,
    metadata_cache: Cache<String, FilterMetadata>,
}

impl CatalogClient {
    /// Create a client for the configured server and endpoint family.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        // The views answer JSON only to XHR-style requests
        headers.insert(
            "X-Requested-With",
            HeaderValue::from_static("XMLHttpRequest"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        let metadata_cache = Cache::builder()
            .max_capacity(256)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client,
                base_url: config.base_url.clone(),
                endpoint: config.endpoint,
                per_page: config.per_page,
                metadata_cache,
            }),
        })
    }

    /// Endpoint family product requests go to.
    #[must_use]
    pub fn endpoint(&self) -> EndpointFamily {
        self.inner.endpoint
    }

    /// Query dialect of the product endpoint.
    #[must_use]
    pub fn dialect(&self) -> &'static dyn QueryDialect {
        dialect_for(self.inner.endpoint)
    }

    /// Page request with the configured page size.
    #[must_use]
    pub fn page_request(&self, page: u32) -> PageRequest {
        PageRequest::new(page.max(1)).with_per_page(self.inner.per_page)
    }

    /// Full product request URL for a selection and page.
    ///
    /// # Errors
    ///
    /// Returns error if the endpoint path cannot be joined to the base URL.
    pub fn products_url(&self, state: &FilterState, request: &PageRequest) -> Result<Url> {
        let path = match self.inner.endpoint {
            EndpointFamily::Shop => "/filter_products/".to_string(),
            EndpointFamily::Category(id) => format!("/category/{id}/filter/"),
        };

        let dialect = self.dialect();
        let mut pairs = dialect.encode(state);
        pairs.extend(dialect.encode_page(request));

        self.endpoint_url(&path, &pairs)
    }

    /// Metadata request URL for a selection.
    ///
    /// The metadata endpoint always speaks the shop dialect.
    ///
    /// # Errors
    ///
    /// Returns error if the endpoint path cannot be joined to the base URL.
    pub fn metadata_url(&self, state: &FilterState) -> Result<Url> {
        self.endpoint_url(METADATA_PATH, &ShopDialect.encode(state))
    }

    fn endpoint_url(&self, path: &str, pairs: &QueryPairs) -> Result<Url> {
        let mut url = self.inner.base_url.join(path)?;
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        Ok(url)
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// Fetch one page of products for a selection.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status, a
    /// `success: false` envelope, or an undecodable body.
    #[instrument(skip(self, state), fields(endpoint = ?self.inner.endpoint))]
    pub async fn fetch_page(
        &self,
        state: &FilterState,
        request: PageRequest,
    ) -> Result<ProductPage> {
        let url = self.products_url(state, &request)?;
        debug!(url = %url, "Requesting products");

        let response = self.inner.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        let page = decode_page(self.inner.endpoint, status.as_u16(), &body)?;
        debug!(
            page = page.page,
            has_next = page.has_next,
            product_count = page.product_count,
            "Received products"
        );
        Ok(page)
    }

    // =========================================================================
    // Metadata Methods
    // =========================================================================

    /// Fetch facet options, counts and price bounds for a selection.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not metadata.
    #[instrument(skip(self, state))]
    pub async fn fetch_metadata(&self, state: &FilterState) -> Result<FilterMetadata> {
        let url = self.metadata_url(state)?;
        let cache_key = url.query().unwrap_or_default().to_string();

        if let Some(metadata) = self.inner.metadata_cache.get(&cache_key).await {
            debug!("Cache hit for filter metadata");
            return Ok(metadata);
        }

        let response = self.inner.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(status_error(status.as_u16(), &body));
        }

        let metadata: FilterMetadata = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %excerpt(&body),
                "Failed to parse filter metadata"
            );
            ClientError::Parse(e)
        })?;

        self.inner
            .metadata_cache
            .insert(cache_key, metadata.clone())
            .await;

        Ok(metadata)
    }

    /// Drop every cached metadata response.
    pub fn invalidate_metadata(&self) {
        self.inner.metadata_cache.invalidate_all();
    }
}

// =============================================================================
// Response decoding
// =============================================================================

/// Decode a product response body for an endpoint family.
fn decode_page(endpoint: EndpointFamily, status: u16, body: &str) -> Result<ProductPage> {
    match endpoint {
        EndpointFamily::Shop => {
            if !(200..300).contains(&status) {
                return Err(status_error(status, body));
            }
            let response: ShopPageResponse = parse_body(body)?;
            Ok(response.into())
        }
        EndpointFamily::Category(_) => {
            // Errors arrive in the JSON envelope, often with a 404
            let response: CategoryPageResponse = match serde_json::from_str(body) {
                Ok(r) => r,
                Err(_) if !(200..300).contains(&status) => return Err(status_error(status, body)),
                Err(e) => return Err(parse_error(e, body)),
            };
            if !response.success {
                return Err(ClientError::Rejected(response.error.unwrap_or_default()));
            }
            if !(200..300).contains(&status) {
                return Err(status_error(status, body));
            }
            Ok(response.into())
        }
    }
}

fn parse_body<T: serde::de::DeserializeOwned>(body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| parse_error(e, body))
}

fn parse_error(error: serde_json::Error, body: &str) -> ClientError {
    tracing::error!(
        error = %error,
        body = %excerpt(body),
        "Failed to parse product response"
    );
    ClientError::Parse(error)
}

fn status_error(status: u16, body: &str) -> ClientError {
    tracing::error!(
        status,
        body = %excerpt(body),
        "Catalog returned non-success status"
    );
    ClientError::Status {
        status,
        body: excerpt(body),
    }
}

fn excerpt(body: &str) -> String {
    body.chars().take(BODY_EXCERPT_CHARS).collect()
}
