//! Shopfacet Core - Shared filter types library.
//!
//! This crate provides the filter model used by every Shopfacet component:
//! - `client` - Store, serializers, catalog client and page controller
//! - `cli` - Command-line front end for the catalog filter endpoints
//!
//! # Architecture
//!
//! The core crate contains only types and pure operations - no I/O, no HTTP
//! clients, no storage. This keeps it lightweight and allows it to be used
//! anywhere, including a browser build.
//!
//! # Modules
//!
//! - [`types`] - Filter state, price range, sort key, facet metadata, chips

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
