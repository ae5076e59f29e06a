//! Global initialization utilities for the application

use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize the application environment
///
/// This should be called once at the start of the application to load
/// environment variables from a `.env` file when one is present.
///
/// Safe to call multiple times - will only run once
pub fn initialize_environment() {
    INIT.call_once(|| {
        // Loads from the current directory or searches up the tree
        dotenvy::dotenv().ok();
    });
}
