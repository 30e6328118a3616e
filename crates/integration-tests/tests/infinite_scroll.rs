//! Infinite scroll against the shop endpoint.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use shopfacet_client::controller::ScrollPosition;
use shopfacet_client::storage::MemoryStorage;
use shopfacet_client::{EndpointFamily, FilterController};
use shopfacet_integration_tests::{MockCatalog, MockSettings};

const NEAR_BOTTOM: ScrollPosition = ScrollPosition {
    scroll_top: 2000.0,
    viewport_height: 800.0,
    document_height: 2900.0,
};

fn controller(mock: &MockCatalog) -> FilterController {
    FilterController::new(
        &mock.config(EndpointFamily::Shop),
        Arc::new(MemoryStorage::new()),
    )
    .unwrap()
}

#[tokio::test]
async fn test_pages_append_until_server_reports_no_next() {
    let mock = MockCatalog::start().await;
    let controller = controller(&mock);

    let first = controller.apply().await.unwrap().unwrap();
    assert_eq!(first.page, 1);
    assert!(first.has_next);

    assert!(controller.load_next_page().await.unwrap().is_some());
    let last = controller.load_next_page().await.unwrap().unwrap();
    assert_eq!(last.page, 3);
    assert!(!last.has_next);

    // Server said there is nothing more: no request goes out
    assert!(controller.load_next_page().await.unwrap().is_none());
    assert_eq!(mock.product_hits(), 3);

    let grid = controller.grid();
    assert_eq!(grid.fragments().len(), 3);
    assert!(grid.html().ends_with("page 3</div>"));

    let requested: Vec<String> = mock
        .requests_to("/filter_products/")
        .iter()
        .filter_map(|r| r.param("page").map(str::to_string))
        .collect();
    assert_eq!(requested, ["1", "2", "3"]);
}

#[tokio::test]
async fn test_requested_page_numbers_and_page_size() {
    let mock = MockCatalog::start().await;
    let controller = controller(&mock);

    controller.apply().await.unwrap();
    controller.load_next_page().await.unwrap();

    let requests = mock.requests_to("/filter_products/");
    assert_eq!(requests[0].param("page"), Some("1"));
    assert_eq!(requests[1].param("page"), Some("2"));
    assert_eq!(requests[1].param("per_page"), Some("20"));
}

#[tokio::test]
async fn test_single_page_result_never_requests_more() {
    let mock = MockCatalog::start_with(MockSettings {
        num_pages: 1,
        product_count: 4,
        ..MockSettings::default()
    })
    .await;
    let controller = controller(&mock);

    let page = controller.apply().await.unwrap().unwrap();
    assert!(!page.has_next);

    for _ in 0..5 {
        controller.on_scroll(NEAR_BOTTOM);
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    tokio::time::sleep(Duration::from_millis(200)).await;

    assert_eq!(mock.product_hits(), 1);
    assert!(controller.pagination().is_none());
}

#[tokio::test]
async fn test_scroll_burst_near_bottom_loads_one_page() {
    let mock = MockCatalog::start().await;
    let controller = controller(&mock);
    controller.apply().await.unwrap();

    for offset in 0..8 {
        controller.on_scroll(ScrollPosition {
            scroll_top: NEAR_BOTTOM.scroll_top + f64::from(offset),
            ..NEAR_BOTTOM
        });
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    tokio::time::sleep(Duration::from_millis(300)).await;

    assert_eq!(mock.product_hits(), 2);
    assert_eq!(controller.feed().current_page(), 2);
}

#[tokio::test]
async fn test_scroll_far_from_bottom_loads_nothing() {
    let mock = MockCatalog::start().await;
    let controller = controller(&mock);
    controller.apply().await.unwrap();

    controller.on_scroll(ScrollPosition {
        scroll_top: 0.0,
        viewport_height: 800.0,
        document_height: 5000.0,
    });
    tokio::time::sleep(Duration::from_millis(200)).await;

    assert_eq!(mock.product_hits(), 1);
}

#[tokio::test]
async fn test_go_to_page_replaces_grid_and_builds_links() {
    let mock = MockCatalog::start_with(MockSettings {
        num_pages: 9,
        ..MockSettings::default()
    })
    .await;
    let controller = controller(&mock);
    controller.apply().await.unwrap();

    let page = controller.go_to_page(5).await.unwrap().unwrap();
    assert_eq!(page.page, 5);

    let grid = controller.grid();
    assert_eq!(grid.fragments().len(), 1);
    assert!(grid.html().contains("page 5"));

    let links = controller.pagination().unwrap();
    assert_eq!(links.to_string(), "‹ 1 … 3 4 [5] 6 7 … 9 ›");
}

#[tokio::test]
async fn test_display_choice_rides_along_until_reset() {
    let mock = MockCatalog::start().await;
    let controller = controller(&mock);

    controller.set_display(Some(12)).await.unwrap();
    assert_eq!(controller.display(), Some(12));
    controller.load_next_page().await.unwrap();

    let requests = mock.requests_to("/filter_products/");
    assert_eq!(requests.len(), 2);
    assert!(requests.iter().all(|r| r.param("display") == Some("12")));

    controller.reset().await.unwrap();
    assert_eq!(controller.display(), None);
    let after_reset = mock.requests_to("/filter_products/");
    assert_eq!(after_reset.last().unwrap().param("display"), None);
}

#[tokio::test]
async fn test_zero_display_means_whole_pages() {
    let mock = MockCatalog::start().await;
    let controller = controller(&mock);

    controller.set_display(Some(0)).await.unwrap();

    assert_eq!(controller.display(), None);
    let requests = mock.requests_to("/filter_products/");
    assert_eq!(requests[0].param("display"), None);
}

#[tokio::test]
async fn test_configured_display_is_the_starting_choice() {
    let mock = MockCatalog::start().await;
    let mut config = mock.config(EndpointFamily::Shop);
    config.display = Some(24);
    let controller = FilterController::new(&config, Arc::new(MemoryStorage::new())).unwrap();

    controller.apply().await.unwrap();

    let requests = mock.requests_to("/filter_products/");
    assert_eq!(requests[0].param("display"), Some("24"));
    assert_eq!(requests[0].param("per_page"), Some("20"));
}
