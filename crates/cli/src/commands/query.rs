//! Encode a selection as endpoint query parameters.
//!
//! # Usage
//!
//! ```bash
//! facet-cli query --brand Acme --rating 4 --sort price-asc
//! # brands%5B%5D=Acme&rating%5B%5D=4&prices=highest
//!
//! facet-cli --endpoint category:12 query --brand Acme --sale
//! # brand=Acme&sale=true
//! ```

use shopfacet_client::EndpointFamily;
use shopfacet_client::query::{dialect_for, to_query_string};

use super::{CommandError, FilterArgs, offline_endpoint};

/// Print the query string for a selection.
pub fn encode(filters: &FilterArgs, endpoint: Option<EndpointFamily>) -> Result<(), CommandError> {
    let endpoint = offline_endpoint(endpoint)?;
    let pairs = dialect_for(endpoint).encode(&filters.to_state());

    #[allow(clippy::print_stdout)]
    {
        println!("{}", to_query_string(&pairs));
    }
    Ok(())
}
