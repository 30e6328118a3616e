//! Fetch facet options, counts and price bounds.
//!
//! # Environment Variables
//!
//! - `SHOPFACET_BASE_URL` - Origin of the catalog server

use shopfacet_client::EndpointFamily;
use shopfacet_client::api::CatalogClient;

use super::{CommandError, FilterArgs, load_config};

/// Print the metadata for a selection as JSON.
pub async fn fetch(
    filters: &FilterArgs,
    endpoint: Option<EndpointFamily>,
) -> Result<(), CommandError> {
    let config = load_config(endpoint)?;
    let client = CatalogClient::new(&config)?;

    tracing::info!("Fetching filter metadata from {}", config.base_url);
    let metadata = client.fetch_metadata(&filters.to_state()).await?;

    #[allow(clippy::print_stdout)]
    {
        println!("{}", serde_json::to_string_pretty(&metadata)?);
    }
    Ok(())
}
