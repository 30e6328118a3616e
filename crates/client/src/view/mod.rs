//! View models for the product list and filter UI.
//!
//! These hold what the page should show; rendering them is up to the caller.

mod grid;
mod layout;
mod pagination;
mod sheet;

pub use grid::{GridUpdate, ProductGrid};
pub use layout::{LayoutMode, MOBILE_MAX_WIDTH};
pub use pagination::{PageLink, Pagination};
pub use sheet::{BottomSheet, Choice, FacetPanel, OptionRow, PanelBody};
