//! Inspect the persisted selection.
//!
//! # Environment Variables
//!
//! - `SHOPFACET_STORAGE_PATH` - Storage file (default: .shopfacet/storage.json)

use shopfacet_client::config::DEFAULT_STORAGE_PATH;
use shopfacet_client::storage::{FileStorage, STORAGE_KEY, StateStorage, restore_state};

use super::CommandError;

fn storage() -> FileStorage {
    let path = std::env::var("SHOPFACET_STORAGE_PATH")
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_STORAGE_PATH.to_string());
    FileStorage::new(path)
}

/// Print the saved selection.
pub fn show() -> Result<(), CommandError> {
    let storage = storage();
    let state = restore_state(&storage);

    #[allow(clippy::print_stdout)]
    {
        if state.is_empty() {
            println!("No saved filters in {}", storage.path().display());
        } else {
            println!("{}", serde_json::to_string_pretty(&state)?);
        }
    }
    Ok(())
}

/// Forget the saved selection.
pub fn clear() -> Result<(), CommandError> {
    let storage = storage();
    storage.remove_item(STORAGE_KEY)?;
    tracing::info!("Cleared saved filters in {}", storage.path().display());
    Ok(())
}
