//! CLI command implementations.

pub mod metadata;
pub mod products;
pub mod query;
pub mod state;
pub mod url;

use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use shopfacet_client::config::ConfigError;
use shopfacet_client::storage::StorageError;
use shopfacet_client::{ClientConfig, ClientError, EndpointFamily};
use shopfacet_core::{CategoryId, FilterState, SortKey};
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Catalog error: {0}")]
    Client(#[from] ClientError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] ::url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Sort order as typed on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortArg {
    Default,
    PriceAsc,
    PriceDesc,
    Rating,
    Popular,
}

impl From<SortArg> for SortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Default => Self::Default,
            SortArg::PriceAsc => Self::PriceAsc,
            SortArg::PriceDesc => Self::PriceDesc,
            SortArg::Rating => Self::Rating,
            SortArg::Popular => Self::Popular,
        }
    }
}

/// A filter selection given as flags.
#[derive(Debug, Clone, Args)]
pub struct FilterArgs {
    /// Category id (repeatable)
    #[arg(long = "category")]
    pub categories: Vec<CategoryId>,

    /// Brand name (repeatable)
    #[arg(long = "brand")]
    pub brands: Vec<String>,

    /// Size code (repeatable)
    #[arg(long = "size")]
    pub sizes: Vec<String>,

    /// Color code (repeatable)
    #[arg(long = "color")]
    pub colors: Vec<String>,

    /// Season (repeatable, category endpoint only)
    #[arg(long = "season")]
    pub seasons: Vec<String>,

    /// Material (repeatable, category endpoint only)
    #[arg(long = "material")]
    pub materials: Vec<String>,

    /// Minimum rating, 1-5 (shop endpoint only)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
    pub rating: Option<u8>,

    /// Lowest price
    #[arg(long)]
    pub min_price: Option<Decimal>,

    /// Highest price
    #[arg(long)]
    pub max_price: Option<Decimal>,

    /// Only products in stock
    #[arg(long)]
    pub in_stock: bool,

    /// Only new arrivals
    #[arg(long = "new")]
    pub is_new: bool,

    /// Only discounted products
    #[arg(long = "discount")]
    pub has_discount: bool,

    /// Only sale products (category endpoint only)
    #[arg(long = "sale")]
    pub on_sale: bool,

    /// Sort order
    #[arg(long, value_enum)]
    pub sort: Option<SortArg>,

    /// Search text
    #[arg(long)]
    pub search: Option<String>,
}

impl FilterArgs {
    /// Build the selection these flags describe.
    #[must_use]
    pub fn to_state(&self) -> FilterState {
        let mut state = FilterState::default();
        for id in &self.categories {
            state.categories.insert(*id);
        }
        for brand in &self.brands {
            state.toggle_brand(brand);
        }
        for size in &self.sizes {
            state.toggle_size(size);
        }
        for color in &self.colors {
            state.toggle_color(color);
        }
        for season in &self.seasons {
            state.toggle_season(season);
        }
        for material in &self.materials {
            state.toggle_material(material);
        }
        state.select_rating(self.rating);
        state.set_price_range(self.min_price, self.max_price);
        state.in_stock = self.in_stock;
        state.is_new = self.is_new;
        state.has_discount = self.has_discount;
        state.on_sale = self.on_sale;
        state.sort_by = self.sort.map_or(SortKey::Default, SortKey::from);
        if let Some(search) = &self.search {
            state.set_search(search);
        }
        state
    }
}

/// Endpoint for commands that work offline: the flag, then
/// `SHOPFACET_ENDPOINT`, then the shop endpoint.
fn offline_endpoint(flag: Option<EndpointFamily>) -> Result<EndpointFamily, CommandError> {
    if let Some(endpoint) = flag {
        return Ok(endpoint);
    }
    match std::env::var("SHOPFACET_ENDPOINT") {
        Ok(raw) if !raw.trim().is_empty() => raw.parse().map_err(|e| {
            CommandError::Config(ConfigError::InvalidEnvVar(
                "SHOPFACET_ENDPOINT".to_string(),
                e,
            ))
        }),
        _ => Ok(EndpointFamily::Shop),
    }
}

/// Full configuration with the endpoint flag applied.
fn load_config(flag: Option<EndpointFamily>) -> Result<ClientConfig, CommandError> {
    let mut config = ClientConfig::from_env()?;
    if let Some(endpoint) = flag {
        config.endpoint = endpoint;
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        filters: FilterArgs,
    }

    #[test]
    fn test_flags_build_state() {
        let cli = TestCli::parse_from([
            "test",
            "--category",
            "3",
            "--brand",
            "Acme",
            "--brand",
            "Globex",
            "--rating",
            "4",
            "--max-price",
            "99.5",
            "--sale",
            "--sort",
            "price-desc",
            "--search",
            "  boots ",
        ]);
        let state = cli.filters.to_state();

        assert!(state.categories.contains(&CategoryId::new(3)));
        assert_eq!(state.brands.len(), 2);
        assert!(state.rating.contains(&4));
        assert_eq!(state.price_range.max, Some(Decimal::new(995, 1)));
        assert!(state.on_sale);
        assert_eq!(state.sort_by, SortKey::PriceDesc);
        assert_eq!(state.search_query, "boots");
    }

    #[test]
    fn test_rating_out_of_range_is_rejected() {
        assert!(TestCli::try_parse_from(["test", "--rating", "6"]).is_err());
    }

    #[test]
    fn test_no_flags_is_empty_selection() {
        let cli = TestCli::parse_from(["test"]);
        assert!(cli.filters.to_state().is_empty());
    }

    #[test]
    fn test_endpoint_flag_wins() {
        let endpoint = offline_endpoint(Some(EndpointFamily::Category(CategoryId::new(2))));
        assert!(matches!(endpoint, Ok(EndpointFamily::Category(_))));
    }
}
