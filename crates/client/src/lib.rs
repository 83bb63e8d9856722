//! Foody Client - portal SDK.
//!
//! This crate implements the data-fetch layer of the Foody customer portal:
//! durable token storage, an authenticated HTTP client with a single
//! refresh-and-retry on 401, typed domain APIs, and the archive view's
//! filter/pagination/selection state.
//!
//! # Architecture
//!
//! - [`token`] - `TokenStore` trait with file-backed and in-memory stores
//! - [`http`] - `ApiClient`: attempt -> refresh -> retry-once -> finalize
//! - [`api`] - Auth, Profile, and Orders request builders
//! - [`archive`] - `ArchiveView`: query projection, selection set, and
//!   sequence-tagged loads
//!
//! The transport is injectable ([`http::HttpBackend`]), so every flow can be
//! exercised against a scripted backend without a live server.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use foody_client::{ApiClient, AuthApi, PortalConfig, token::FileTokenStore};
//!
//! let config = PortalConfig::from_env()?;
//! let store = Arc::new(FileTokenStore::new(config.token_file.clone()));
//! let client = ApiClient::new(&config.base_url, store);
//!
//! let auth = AuthApi::new(client.clone());
//! let session = auth.login("ivan@example.com", "secret").await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod archive;
pub mod config;
pub mod error;
pub mod http;
pub mod token;

pub use api::{AuthApi, CsvDownload, OrdersApi, ProfileApi};
pub use archive::{ArchiveView, CsvExport};
pub use config::{ConfigError, PortalConfig};
pub use error::PortalError;
pub use http::{ApiClient, ApiRequest, HttpBackend, RawResponse};
pub use token::{FileTokenStore, MemoryTokenStore, TokenStore, TokenStoreError};
