//! Core types for Shopfacet.
//!
//! This module provides the filter selection, the server-supplied facet
//! metadata, and the facet/chip helpers built on them.

pub mod facet;
pub mod id;
pub mod metadata;
pub mod price;
pub mod sort;
pub mod state;

pub use facet::{ChipValue, Facet, FilterChip, active_chips};
pub use id::*;
pub use metadata::{BrandOption, CategoryOption, ColorOption, FilterMetadata, SizeOption};
pub use price::{PriceBounds, PriceRange};
pub use sort::SortKey;
pub use state::{FilterFlag, FilterState, MAX_RATING, MIN_RATING};
