//! Unified error type for the portal data-fetch layer.
//!
//! Errors propagate to the initiating action unchanged; the only place the
//! client swallows a failure is logout's best-effort server notification.

use thiserror::Error;

use crate::token::TokenStoreError;

/// Errors that can occur while talking to the portal API.
#[derive(Debug, Error)]
pub enum PortalError {
    /// Network-level failure: the request never produced a response.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response, carrying the server's error text verbatim when the
    /// body was non-empty.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// 401 that survived the refresh-and-retry step: the session is gone and
    /// the caller decides what to do about it (typically re-login).
    #[error("Authentication expired: {0}")]
    AuthExpired(String),

    /// Response body was not the JSON we expected.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Token persistence failed.
    #[error("Token store error: {0}")]
    TokenStore(#[from] TokenStoreError),
}

impl PortalError {
    /// HTTP status carried by the error, if it came from a response.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::AuthExpired(_) => Some(401),
            _ => None,
        }
    }
}
