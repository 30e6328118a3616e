//! Page controller: the one owner of filter state, requests and view models.
//!
//! Wires the store, query dialect, persisted storage, catalog client,
//! infinite-scroll feed and view models together. UI events come in through
//! the methods here; debounced events run on background tasks that hold only
//! a weak reference, so dropping the last controller handle stops them.
//!
//! # Example
//!
//! ```rust,ignore
//! let controller = FilterController::new(config, Arc::new(MemoryStorage::new()))?;
//! controller.init(page_url).await?;
//! controller.update(|s| { s.toggle_brand("Acme"); });
//! controller.apply().await?;
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use shopfacet_core::{Facet, FilterChip, FilterState, active_chips};
use tracing::{debug, info, warn};
use url::Url;

use crate::api::{CatalogClient, ProductPage};
use crate::config::ClientConfig;
use crate::debounce::Debouncer;
use crate::error::{Result, add_breadcrumb, report_error};
use crate::feed::{ProductFeed, near_bottom};
use crate::query::{mirror_into_url, state_from_url, url_has_filters};
use crate::storage::{StateStorage, restore_state, save_state};
use crate::store::FilterStore;
use crate::view::{BottomSheet, FacetPanel, GridUpdate, LayoutMode, Pagination, ProductGrid};

/// Scroll geometry reported by the page, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollPosition {
    pub scroll_top: f64,
    pub viewport_height: f64,
    pub document_height: f64,
}

/// Owns everything the filter page needs.
///
/// Cheap to clone; clones drive the same page.
#[derive(Clone)]
pub struct FilterController {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    store: FilterStore,
    client: CatalogClient,
    storage: Arc<dyn StateStorage>,
    feed: ProductFeed,
    view: Mutex<ViewState>,
    search: Debouncer<String>,
    scroll: Debouncer<ScrollPosition>,
    resize: Debouncer<u32>,
}

#[derive(Default)]
struct ViewState {
    grid: ProductGrid,
    sheet: BottomSheet,
    layout: LayoutMode,
    page_url: Option<Url>,
    last_page: Option<ProductPage>,
    display: Option<u32>,
}

impl FilterController {
    /// Build a controller for the configured endpoint.
    ///
    /// Must be called inside a Tokio runtime; the debouncers spawn tasks.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &ClientConfig, storage: Arc<dyn StateStorage>) -> Result<Self> {
        let client = CatalogClient::new(config)?;
        let debounce = config.debounce;

        let inner = Arc::new_cyclic(|weak: &Weak<ControllerInner>| {
            let search = {
                let weak = weak.clone();
                Debouncer::new(debounce.search, move |text: String| {
                    let controller = Self::upgrade(&weak);
                    async move {
                        if let Some(controller) = controller {
                            controller.run_search(&text).await;
                        }
                    }
                })
            };
            let scroll = {
                let weak = weak.clone();
                Debouncer::new(debounce.scroll, move |position: ScrollPosition| {
                    let controller = Self::upgrade(&weak);
                    async move {
                        if let Some(controller) = controller {
                            controller.run_scroll(position).await;
                        }
                    }
                })
            };
            let resize = {
                let weak = weak.clone();
                Debouncer::new(debounce.resize, move |width: u32| {
                    let controller = Self::upgrade(&weak);
                    async move {
                        if let Some(controller) = controller {
                            controller.run_resize(width);
                        }
                    }
                })
            };

            ControllerInner {
                store: FilterStore::default(),
                client,
                storage,
                feed: ProductFeed::new(),
                view: Mutex::new(ViewState {
                    display: config.display,
                    ..ViewState::default()
                }),
                search,
                scroll,
                resize,
            }
        });

        Ok(Self { inner })
    }

    fn upgrade(weak: &Weak<ControllerInner>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }

    fn view(&self) -> MutexGuard<'_, ViewState> {
        self.inner.view.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Restore the selection and load the first results.
    ///
    /// A page URL carrying filters wins over the persisted selection, so
    /// shared links open as shared. Metadata failures are logged and the page
    /// continues without counts.
    ///
    /// # Errors
    ///
    /// Returns the product request error when the initial load fails. The
    /// grid already shows the error message by then.
    pub async fn init(&self, page_url: Url) -> Result<()> {
        let dialect = self.inner.client.dialect();
        let state = if url_has_filters(&page_url, dialect) {
            info!("Restoring filters from page URL");
            state_from_url(&page_url, dialect)
        } else {
            restore_state(self.inner.storage.as_ref())
        };
        self.inner.store.set(state);
        self.view().page_url = Some(page_url);

        self.refresh_metadata().await;

        if !self.inner.store.get().is_empty() {
            self.apply().await?;
        }
        Ok(())
    }

    /// Reload facet options and price bounds for the current selection.
    ///
    /// Failures are logged; the previous metadata stays in place.
    pub async fn refresh_metadata(&self) {
        let state = self.inner.store.get();
        match self.inner.client.fetch_metadata(&state).await {
            Ok(metadata) => {
                self.inner.store.set_metadata(metadata);
                self.refresh_sheet();
            }
            Err(e) => warn!(error = %e, "Failed to load filter metadata"),
        }
    }

    // =========================================================================
    // Requests
    // =========================================================================

    /// Persist the selection, mirror it into the page URL and load page 1.
    ///
    /// Returns `None` when a load is already in flight.
    ///
    /// # Errors
    ///
    /// Returns the request error; the grid keeps the previous products and
    /// shows the error message.
    pub async fn apply(&self) -> Result<Option<ProductPage>> {
        // Bounds equal to the catalog's own are neither sent nor shared
        let bounds = self.inner.store.metadata().price_range;
        self.inner.store.update(|s| s.normalize_price(&bounds));

        let state = self.inner.store.get();
        save_state(self.inner.storage.as_ref(), &state);
        {
            let mut view = self.view();
            if let Some(url) = view.page_url.as_mut() {
                mirror_into_url(url, self.inner.client.dialect(), &state);
            }
        }
        add_breadcrumb("filters", "Applied filters", None);

        self.load(1, GridUpdate::Replace).await
    }

    /// Load the page after the current one and append it.
    ///
    /// No-op when there are no more pages or a load is in flight.
    ///
    /// # Errors
    ///
    /// Returns the request error; the grid keeps what it shows.
    pub async fn load_next_page(&self) -> Result<Option<ProductPage>> {
        let Some(page) = self.inner.feed.next_page() else {
            debug!(
                has_more = self.inner.feed.has_more(),
                "Not loading next page"
            );
            return Ok(None);
        };
        self.load(page, GridUpdate::Append).await
    }

    /// Jump to a page from the pagination links, replacing the grid.
    ///
    /// # Errors
    ///
    /// Returns the request error; the grid keeps what it shows.
    pub async fn go_to_page(&self, page: u32) -> Result<Option<ProductPage>> {
        self.load(page.max(1), GridUpdate::Replace).await
    }

    async fn load(&self, page: u32, update: GridUpdate) -> Result<Option<ProductPage>> {
        let Some(_loading) = self.inner.feed.begin() else {
            debug!(page, "Load already in flight");
            return Ok(None);
        };
        if update == GridUpdate::Replace {
            self.inner.feed.reset();
        }
        let display = {
            let mut view = self.view();
            view.grid.start_loading();
            view.display
        };

        let state = self.inner.store.get();
        let request = self.inner.client.page_request(page).with_display(display);
        match self.inner.client.fetch_page(&state, request).await {
            Ok(loaded) => {
                self.inner.feed.finish(&loaded);
                let mut view = self.view();
                view.grid.show_page(&loaded, update);
                if let Some(target) = &loaded.update_url
                    && let Some(current) = &view.page_url
                    && let Ok(canonical) = current.join(target)
                {
                    view.page_url = Some(canonical);
                }
                view.last_page = Some(loaded.clone());
                let count = view.grid.product_count();
                let metadata = self.inner.store.metadata();
                view.sheet.refresh(&state, &metadata, count);
                drop(view);

                info!(
                    page = loaded.page,
                    has_next = loaded.has_next,
                    product_count = loaded.product_count,
                    "Loaded products"
                );
                Ok(Some(loaded))
            }
            Err(e) => {
                report_error("Failed to load products", &e);
                self.view().grid.show_error(e.user_message());
                Err(e)
            }
        }
    }

    // =========================================================================
    // Selection changes
    // =========================================================================

    /// Change the selection without loading products.
    ///
    /// The open sheet panel is rebuilt to match. Returns whether anything
    /// changed.
    pub fn update<F>(&self, mutate: F) -> bool
    where
        F: FnOnce(&mut FilterState),
    {
        let changed = self.inner.store.update(mutate);
        if changed {
            self.refresh_sheet();
        }
        changed
    }

    /// Clear every filter and the items-per-page choice, and reload.
    ///
    /// # Errors
    ///
    /// Returns the request error; the grid keeps what it shows.
    pub async fn reset(&self) -> Result<Option<ProductPage>> {
        self.inner.store.reset();
        self.view().display = None;
        self.refresh_sheet();
        add_breadcrumb("filters", "Reset filters", None);
        self.apply().await
    }

    /// Remove one chip's value and reload.
    ///
    /// Returns `None` without a request when the chip was already gone.
    ///
    /// # Errors
    ///
    /// Returns the request error; the grid keeps what it shows.
    pub async fn remove_chip(&self, chip: &FilterChip) -> Result<Option<ProductPage>> {
        if !self.update(|state| {
            chip.remove_from(state);
        }) {
            return Ok(None);
        }
        add_breadcrumb("filters", "Removed chip", Some(&[("chip", chip.label.as_str())]));
        self.apply().await
    }

    /// Choose how many products each page shows and reload.
    ///
    /// `None` shows whole pages. Only the shop endpoint honors the cap.
    ///
    /// # Errors
    ///
    /// Returns the request error; the grid keeps what it shows.
    pub async fn set_display(&self, display: Option<u32>) -> Result<Option<ProductPage>> {
        self.view().display = display.filter(|d| *d > 0);
        self.apply().await
    }

    /// Items-per-page choice sent with product requests.
    #[must_use]
    pub fn display(&self) -> Option<u32> {
        self.view().display
    }

    /// Chips for every active filter value.
    #[must_use]
    pub fn chips(&self) -> Vec<FilterChip> {
        active_chips(&self.inner.store.get(), &self.inner.store.metadata())
    }

    /// Filter-bar buttons that carry the "active" badge.
    #[must_use]
    pub fn active_facets(&self) -> Vec<Facet> {
        let state = self.inner.store.get();
        let metadata = self.inner.store.metadata();
        Facet::ALL
            .into_iter()
            .filter(|facet| facet.is_active(&state, &metadata))
            .collect()
    }

    // =========================================================================
    // Debounced events
    // =========================================================================

    /// Record search input; the search runs after the input settles.
    pub fn set_search_debounced(&self, text: impl Into<String>) {
        self.inner.search.call(text.into());
    }

    async fn run_search(&self, text: &str) {
        if self.update(|state| state.set_search(text)) {
            // Errors are already on the grid and reported
            let _ = self.apply().await;
        }
    }

    /// Record a scroll position; near the bottom, the next page loads once
    /// scrolling settles.
    pub fn on_scroll(&self, position: ScrollPosition) {
        self.inner.scroll.call(position);
    }

    async fn run_scroll(&self, position: ScrollPosition) {
        if near_bottom(
            position.scroll_top,
            position.viewport_height,
            position.document_height,
        ) {
            let _ = self.load_next_page().await;
        }
    }

    /// Record a viewport width; the layout switches once resizing settles.
    pub fn on_resize(&self, width: u32) {
        self.inner.resize.call(width);
    }

    fn run_resize(&self, width: u32) {
        let layout = LayoutMode::for_width(width);
        let mut view = self.view();
        if view.layout != layout {
            debug!(?layout, width, "Layout changed");
            view.layout = layout;
            if !layout.is_mobile() {
                view.sheet.close();
            }
        }
    }

    // =========================================================================
    // Bottom sheet
    // =========================================================================

    /// Open the sheet on a facet's panel.
    pub fn open_sheet(&self, facet: Facet) -> FacetPanel {
        let state = self.inner.store.get();
        let metadata = self.inner.store.metadata();
        let mut view = self.view();
        let count = view.grid.product_count();
        view.sheet.open(facet, &state, &metadata, count).clone()
    }

    pub fn close_sheet(&self) {
        self.view().sheet.close();
    }

    /// Apply the selection made in the sheet and close it.
    ///
    /// # Errors
    ///
    /// Returns the request error; the grid keeps what it shows.
    pub async fn apply_sheet(&self) -> Result<Option<ProductPage>> {
        self.close_sheet();
        self.apply().await
    }

    fn refresh_sheet(&self) {
        let state = self.inner.store.get();
        let metadata = self.inner.store.metadata();
        let mut view = self.view();
        let count = view.grid.product_count();
        view.sheet.refresh(&state, &metadata, count);
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[must_use]
    pub fn store(&self) -> &FilterStore {
        &self.inner.store
    }

    #[must_use]
    pub fn feed(&self) -> &ProductFeed {
        &self.inner.feed
    }

    #[must_use]
    pub fn grid(&self) -> ProductGrid {
        self.view().grid.clone()
    }

    #[must_use]
    pub fn sheet_panel(&self) -> Option<FacetPanel> {
        self.view().sheet.panel().cloned()
    }

    #[must_use]
    pub fn layout(&self) -> LayoutMode {
        self.view().layout
    }

    /// Page URL with the selection mirrored in, once `init` has run.
    #[must_use]
    pub fn page_url(&self) -> Option<Url> {
        self.view().page_url.clone()
    }

    /// Fallback page links, when the server did not render its own.
    #[must_use]
    pub fn pagination(&self) -> Option<Pagination> {
        let view = self.view();
        if view.grid.pagination_html().is_some() {
            return None;
        }
        view.last_page.as_ref().and_then(Pagination::for_page)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shopfacet_core::CategoryId;

    use super::*;
    use crate::storage::MemoryStorage;

    fn controller() -> FilterController {
        // Nothing listens here; tests below never reach the network
        let config = ClientConfig::new(Url::parse("http://127.0.0.1:9").unwrap());
        FilterController::new(&config, Arc::new(MemoryStorage::new())).unwrap()
    }

    #[tokio::test]
    async fn test_update_refreshes_open_sheet() {
        let controller = controller();
        controller.open_sheet(Facet::Categories);

        assert!(controller.update(|s| {
            s.toggle_category(CategoryId::new(3));
        }));

        let panel = controller.sheet_panel().unwrap();
        assert_eq!(panel.checked_count(), 1);
    }

    #[tokio::test]
    async fn test_chips_and_active_facets_follow_state() {
        let controller = controller();
        controller.update(|s| {
            s.toggle_brand("Acme");
            s.select_rating(Some(4));
        });

        let labels: Vec<String> = controller.chips().iter().map(ToString::to_string).collect();
        assert_eq!(labels, vec!["4★ & up".to_string(), "Acme".to_string()]);
        assert_eq!(controller.active_facets(), vec![Facet::Rating, Facet::Brand]);
    }

    #[tokio::test]
    async fn test_close_sheet() {
        let controller = controller();
        controller.open_sheet(Facet::Sort);
        controller.close_sheet();
        assert!(controller.sheet_panel().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_resize_switches_layout_after_settling() {
        let controller = controller();
        assert_eq!(controller.layout(), LayoutMode::Desktop);

        controller.on_resize(1200);
        controller.on_resize(600);
        controller.on_resize(375);
        assert_eq!(controller.layout(), LayoutMode::Desktop);

        tokio::time::sleep(std::time::Duration::from_millis(300)).await;
        assert_eq!(controller.layout(), LayoutMode::Mobile);
    }

    #[tokio::test(start_paused = true)]
    async fn test_scroll_without_more_pages_is_ignored() {
        let controller = controller();
        controller.feed().finish(&ProductPage {
            html: String::new(),
            filters_html: None,
            pagination_html: None,
            product_count: 3,
            page: 1,
            has_next: false,
            has_previous: false,
            num_pages: Some(1),
            update_url: None,
        });

        controller.on_scroll(ScrollPosition {
            scroll_top: 5000.0,
            viewport_height: 800.0,
            document_height: 5200.0,
        });
        tokio::time::sleep(std::time::Duration::from_millis(200)).await;

        assert!(controller.grid().error().is_none());
        assert_eq!(controller.feed().current_page(), 1);
    }

    #[tokio::test]
    async fn test_pagination_hidden_before_first_load() {
        assert!(controller().pagination().is_none());
    }
}
