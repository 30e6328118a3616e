//! The product list as shown on the page.

use crate::api::ProductPage;

/// How a loaded page changes the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridUpdate {
    /// Drop what is shown and show this page instead.
    Replace,
    /// Add this page below what is shown.
    Append,
}

impl GridUpdate {
    /// Page 1 starts a new list; later pages continue it.
    #[must_use]
    pub const fn for_page(page: u32) -> Self {
        if page <= 1 { Self::Replace } else { Self::Append }
    }
}

/// Rendered product fragments plus the surrounding page chrome.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductGrid {
    fragments: Vec<String>,
    product_count: u64,
    filters_html: Option<String>,
    pagination_html: Option<String>,
    is_loading: bool,
    error: Option<String>,
}

impl ProductGrid {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the loading indicator and clear any previous error.
    pub fn start_loading(&mut self) {
        self.is_loading = true;
        self.error = None;
    }

    /// Show a loaded page.
    pub fn show_page(&mut self, page: &ProductPage, update: GridUpdate) {
        if update == GridUpdate::Replace {
            self.fragments.clear();
        }
        if !page.html.trim().is_empty() {
            self.fragments.push(page.html.clone());
        }

        self.product_count = page.product_count;
        // Empty markup clears the tags; endpoints without tags leave them alone
        if let Some(html) = &page.filters_html {
            self.filters_html = (!html.trim().is_empty()).then(|| html.clone());
        }
        self.pagination_html.clone_from(&page.pagination_html);
        self.is_loading = false;
        self.error = None;
    }

    /// Show an error, keeping the products already shown.
    pub fn show_error(&mut self, message: impl Into<String>) {
        self.is_loading = false;
        self.error = Some(message.into());
    }

    /// Product fragments in page order.
    #[must_use]
    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    /// All fragments as one HTML string.
    #[must_use]
    pub fn html(&self) -> String {
        self.fragments.concat()
    }

    /// Whether the empty-state message should show instead of products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    #[must_use]
    pub const fn product_count(&self) -> u64 {
        self.product_count
    }

    /// Server-rendered filter sidebar, when the endpoint sends one.
    #[must_use]
    pub fn filters_html(&self) -> Option<&str> {
        self.filters_html.as_deref()
    }

    /// Server-rendered pagination, when the endpoint sends one.
    #[must_use]
    pub fn pagination_html(&self) -> Option<&str> {
        self.pagination_html.as_deref()
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Error shown over the grid.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
