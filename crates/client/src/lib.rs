//! Shopfacet client library.
//!
//! Faceted product filtering against a catalog server: the filter store,
//! the query dialects of both endpoint families, persisted state, the HTTP
//! client, debounced triggers, infinite scroll and the view models the page
//! renders. [`controller::FilterController`] ties them together.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod error;
pub mod feed;
pub mod query;
pub mod storage;
pub mod store;
pub mod view;

pub use config::{ClientConfig, EndpointFamily};
pub use controller::FilterController;
pub use error::{ClientError, Result};
