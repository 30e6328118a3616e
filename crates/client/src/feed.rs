//! Infinite-scroll pagination state.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crate::api::ProductPage;

/// Distance from the bottom of the document, in pixels, that triggers the
/// next page.
pub const NEAR_BOTTOM_THRESHOLD: f64 = 300.0;

/// Whether the viewport is close enough to the end of the document to load
/// more products.
#[must_use]
pub fn near_bottom(scroll_top: f64, viewport_height: f64, document_height: f64) -> bool {
    scroll_top + viewport_height >= document_height - NEAR_BOTTOM_THRESHOLD
}

/// Which page is showing, whether more exist, and whether a load is in flight.
///
/// There is no request cancellation: the `is_loading` guard keeps a second
/// page request from starting while one is outstanding.
#[derive(Debug)]
pub struct ProductFeed {
    current_page: AtomicU32,
    has_more: AtomicBool,
    is_loading: AtomicBool,
}

impl Default for ProductFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductFeed {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            current_page: AtomicU32::new(1),
            has_more: AtomicBool::new(true),
            is_loading: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn current_page(&self) -> u32 {
        self.current_page.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn has_more(&self) -> bool {
        self.has_more.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.is_loading.load(Ordering::Acquire)
    }

    /// Claim the loading slot.
    ///
    /// Returns `None` when a load is already in flight. The slot is released
    /// when the guard drops, whether or not the load succeeded.
    #[must_use]
    pub fn begin(&self) -> Option<LoadGuard<'_>> {
        self.is_loading
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| LoadGuard { feed: self })
    }

    /// The page infinite scroll should request next, if any.
    #[must_use]
    pub fn next_page(&self) -> Option<u32> {
        if !self.has_more() || self.is_loading() {
            return None;
        }
        self.current_page().checked_add(1)
    }

    /// Record a loaded page.
    pub fn finish(&self, page: &ProductPage) {
        self.current_page.store(page.page.max(1), Ordering::Release);
        self.has_more.store(page.has_next, Ordering::Release);
    }

    /// Start over at page 1 with more pages assumed.
    pub fn reset(&self) {
        self.current_page.store(1, Ordering::Release);
        self.has_more.store(true, Ordering::Release);
    }
}

/// Holds the feed's loading slot.
#[derive(Debug)]
pub struct LoadGuard<'a> {
    feed: &'a ProductFeed,
}

impl Drop for LoadGuard<'_> {
    fn drop(&mut self) {
        self.feed.is_loading.store(false, Ordering::Release);
    }
}
