//! Load product pages through the page controller.
//!
//! Runs the same path a page would: metadata first, then page 1, then
//! infinite-scroll continuations until `--pages` is reached or the server
//! reports no next page.
//!
//! # Usage
//!
//! ```bash
//! facet-cli products --brand Acme --pages 3
//! facet-cli --endpoint category:12 products --sale --page 2
//! facet-cli products --in-stock --display 12
//! ```
//!
//! # Environment Variables
//!
//! - `SHOPFACET_BASE_URL` - Origin of the catalog server
//! - `SHOPFACET_STORAGE_PATH` - Storage file used with `--persist`
//! - `SHOPFACET_DISPLAY` - Items-per-page choice when `--display` is absent

use std::sync::Arc;

use shopfacet_client::api::ProductPage;
use shopfacet_client::storage::{FileStorage, MemoryStorage, StateStorage};
use shopfacet_client::{EndpointFamily, FilterController};

use super::{CommandError, FilterArgs, load_config};

/// How many pages to load and where to start.
#[derive(Debug, Clone, Copy)]
pub struct BrowseOptions {
    pub pages: u32,
    pub page: Option<u32>,
    pub display: Option<u32>,
    pub persist: bool,
}

#[allow(clippy::print_stdout)]
fn print_page(page: &ProductPage) {
    println!(
        "page {}: {} chars of HTML, has_next={}",
        page.page,
        page.html.len(),
        page.has_next
    );
}

/// Load pages for a selection and print a summary.
pub async fn browse(
    filters: &FilterArgs,
    endpoint: Option<EndpointFamily>,
    options: BrowseOptions,
) -> Result<(), CommandError> {
    let mut config = load_config(endpoint)?;
    if options.display.is_some() {
        config.display = options.display;
    }
    let storage: Arc<dyn StateStorage> = if options.persist {
        Arc::new(FileStorage::new(&config.storage_path))
    } else {
        Arc::new(MemoryStorage::new())
    };

    let controller = FilterController::new(&config, storage)?;
    controller.store().set(filters.to_state());
    controller.refresh_metadata().await;

    tracing::info!("Loading products from {}", config.base_url);
    let first = match options.page {
        Some(page) => controller.go_to_page(page).await?,
        None => controller.apply().await?,
    };
    if let Some(page) = &first {
        print_page(page);
    }

    for _ in 1..options.pages {
        match controller.load_next_page().await? {
            Some(page) => print_page(&page),
            None => break,
        }
    }

    let grid = controller.grid();
    #[allow(clippy::print_stdout)]
    {
        println!("{} products match", grid.product_count());
        if grid.is_empty() {
            println!("No products found");
        }
        for chip in controller.chips() {
            println!("  [{chip}]");
        }
        if let Some(pagination) = controller.pagination() {
            println!("{pagination}");
        }
    }
    Ok(())
}
