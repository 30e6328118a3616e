//! Decode a page URL into a selection.
//!
//! Prints the selection as the JSON blob that would be persisted, followed by
//! its chips.

use ::url::Url;
use shopfacet_client::EndpointFamily;
use shopfacet_client::query::{dialect_for, state_from_url};
use shopfacet_core::{FilterMetadata, active_chips};

use super::{CommandError, offline_endpoint};

/// Print the selection a page URL carries.
pub fn decode(raw: &str, endpoint: Option<EndpointFamily>) -> Result<(), CommandError> {
    let endpoint = offline_endpoint(endpoint)?;
    let url = Url::parse(raw)?;
    let state = state_from_url(&url, dialect_for(endpoint));

    tracing::debug!(endpoint = ?endpoint, "Decoded page URL");

    #[allow(clippy::print_stdout)]
    {
        println!("{}", serde_json::to_string_pretty(&state)?);
        for chip in active_chips(&state, &FilterMetadata::default()) {
            println!("  [{chip}]");
        }
    }
    Ok(())
}
