//! Command implementations.

pub mod auth;
pub mod orders;
pub mod profile;

use std::sync::Arc;

use foody_client::{ApiClient, FileTokenStore, PortalConfig};
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] foody_client::ConfigError),

    /// Portal request failed.
    #[error(transparent)]
    Portal(#[from] foody_client::PortalError),

    /// Writing an export file failed.
    #[error("Could not write {path}: {source}")]
    WriteFile {
        path: String,
        source: std::io::Error,
    },
}

/// Load configuration and build an authenticated client over the durable
/// token file.
pub(crate) fn portal() -> Result<(PortalConfig, ApiClient), CliError> {
    let config = PortalConfig::from_env()?;
    let store = Arc::new(FileTokenStore::new(config.token_file.clone()));
    let client = ApiClient::new(&config.base_url, store);
    Ok((config, client))
}
