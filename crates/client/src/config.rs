//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `FOODY_API_BASE_URL` - Base URL of the portal REST API
//!   (e.g., `https://api.foody.example/api`)
//!
//! ## Optional
//! - `FOODY_TOKEN_FILE` - Path of the durable token file
//!   (default: `.foody-tokens.json`)
//! - `FOODY_PAGE_SIZE` - Archive page size (default: 20)

use std::path::PathBuf;

use foody_core::DEFAULT_PAGE_SIZE;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Portal client configuration.
#[derive(Debug, Clone)]
pub struct PortalConfig {
    /// Base URL of the portal REST API, without a trailing slash.
    pub base_url: String,
    /// Path of the durable token file.
    pub token_file: PathBuf,
    /// Page size used by the archive view.
    pub page_size: u32,
}

impl PortalConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from a `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let base_url = get_required_env("FOODY_API_BASE_URL")?
            .trim_end_matches('/')
            .to_owned();
        let token_file = PathBuf::from(get_env_or_default("FOODY_TOKEN_FILE", ".foody-tokens.json"));
        let page_size_raw = get_env_or_default("FOODY_PAGE_SIZE", "");
        let page_size = if page_size_raw.is_empty() {
            DEFAULT_PAGE_SIZE
        } else {
            page_size_raw.parse::<u32>().map_err(|e| {
                ConfigError::InvalidEnvVar("FOODY_PAGE_SIZE".to_owned(), e.to_string())
            })?
        };
        if page_size == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "FOODY_PAGE_SIZE".to_owned(),
                "must be greater than zero".to_owned(),
            ));
        }

        Ok(Self {
            base_url,
            token_file,
            page_size,
        })
    }
}

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_owned()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::MissingEnvVar("FOODY_API_BASE_URL".to_owned());
        assert_eq!(
            err.to_string(),
            "Missing environment variable: FOODY_API_BASE_URL"
        );
    }

    #[test]
    fn test_get_env_or_default_falls_back() {
        assert_eq!(
            get_env_or_default("FOODY_TEST_UNSET_VARIABLE", "fallback"),
            "fallback"
        );
    }
}
