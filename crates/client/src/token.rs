//! Durable token storage.
//!
//! The portal issues an access token and (optionally) a refresh token; this
//! module owns both. Tokens are opaque strings - nothing here inspects or
//! validates them, and no expiry is tracked client-side: expiry is discovered
//! through a 401 response.
//!
//! The store is an injectable trait so the HTTP layer never touches ambient
//! global state and tests can substitute an in-memory fake.

use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when reading or writing stored tokens.
#[derive(Debug, Error)]
pub enum TokenStoreError {
    /// Token file could not be read or written.
    #[error("Token file I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Token file holds something that is not a token record.
    #[error("Token file parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Storage for the access/refresh token pair.
///
/// Exclusively owns the pair: callers read a token, use it for one request,
/// and drop it. Writes must survive a process restart for durable
/// implementations.
pub trait TokenStore: Send + Sync {
    /// Stored access token, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium cannot be read.
    fn access(&self) -> Result<Option<SecretString>, TokenStoreError>;

    /// Stored refresh token, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium cannot be read.
    fn refresh(&self) -> Result<Option<SecretString>, TokenStoreError>;

    /// Overwrite the access token.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium cannot be written.
    fn set_access(&self, token: &str) -> Result<(), TokenStoreError>;

    /// Overwrite the refresh token.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium cannot be written.
    fn set_refresh(&self, token: &str) -> Result<(), TokenStoreError>;

    /// Drop both tokens.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium cannot be written.
    fn clear(&self) -> Result<(), TokenStoreError>;
}

/// On-disk token record. Field names are part of the persisted format.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredTokens {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
}

/// File-backed token store.
///
/// Reads and writes a small JSON file on every operation, so tokens survive
/// process restarts and two commands in a row see each other's writes. A
/// missing file means "no tokens".
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Create a store backed by the file at `path`.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn read(&self) -> Result<StoredTokens, TokenStoreError> {
        match std::fs::read(&self.path) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StoredTokens::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, tokens: &StoredTokens) -> Result<(), TokenStoreError> {
        let body = serde_json::to_vec_pretty(tokens)?;
        std::fs::write(&self.path, body)?;
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn access(&self) -> Result<Option<SecretString>, TokenStoreError> {
        Ok(self.read()?.access_token.map(SecretString::from))
    }

    fn refresh(&self) -> Result<Option<SecretString>, TokenStoreError> {
        Ok(self.read()?.refresh_token.map(SecretString::from))
    }

    fn set_access(&self, token: &str) -> Result<(), TokenStoreError> {
        let mut tokens = self.read()?;
        tokens.access_token = Some(token.to_owned());
        self.write(&tokens)
    }

    fn set_refresh(&self, token: &str) -> Result<(), TokenStoreError> {
        let mut tokens = self.read()?;
        tokens.refresh_token = Some(token.to_owned());
        self.write(&tokens)
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory token store.
///
/// Used by tests and by embedders that manage persistence themselves.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    inner: Mutex<StoredTokens>,
}

impl MemoryTokenStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StoredTokens> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TokenStore for MemoryTokenStore {
    fn access(&self) -> Result<Option<SecretString>, TokenStoreError> {
        Ok(self.lock().access_token.clone().map(SecretString::from))
    }

    fn refresh(&self) -> Result<Option<SecretString>, TokenStoreError> {
        Ok(self.lock().refresh_token.clone().map(SecretString::from))
    }

    fn set_access(&self, token: &str) -> Result<(), TokenStoreError> {
        self.lock().access_token = Some(token.to_owned());
        Ok(())
    }

    fn set_refresh(&self, token: &str) -> Result<(), TokenStoreError> {
        self.lock().refresh_token = Some(token.to_owned());
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        *self.lock() = StoredTokens::default();
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("foody-token-test-{}-{name}", std::process::id()))
    }

    #[test]
    fn test_file_store_round_trip_and_durability() {
        let path = temp_path("round-trip");
        let store = FileTokenStore::new(path.clone());
        store.clear().unwrap();

        assert!(store.access().unwrap().is_none());
        store.set_access("a1").unwrap();
        store.set_refresh("r1").unwrap();

        // A second store over the same path sees the same tokens.
        let reopened = FileTokenStore::new(path);
        assert_eq!(reopened.access().unwrap().unwrap().expose_secret(), "a1");
        assert_eq!(reopened.refresh().unwrap().unwrap().expose_secret(), "r1");

        reopened.clear().unwrap();
        assert!(reopened.access().unwrap().is_none());
        assert!(reopened.refresh().unwrap().is_none());
    }

    #[test]
    fn test_file_store_overwrites_access_keeps_refresh() {
        let path = temp_path("overwrite");
        let store = FileTokenStore::new(path);
        store.clear().unwrap();

        store.set_access("a1").unwrap();
        store.set_refresh("r1").unwrap();
        store.set_access("a2").unwrap();

        assert_eq!(store.access().unwrap().unwrap().expose_secret(), "a2");
        assert_eq!(store.refresh().unwrap().unwrap().expose_secret(), "r1");
        store.clear().unwrap();
    }

    #[test]
    fn test_file_store_clear_is_idempotent() {
        let store = FileTokenStore::new(temp_path("idempotent-clear"));
        store.clear().unwrap();
        store.clear().unwrap();
    }

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryTokenStore::new();
        assert!(store.access().unwrap().is_none());

        store.set_access("a1").unwrap();
        store.set_refresh("r1").unwrap();
        assert_eq!(store.access().unwrap().unwrap().expose_secret(), "a1");
        assert_eq!(store.refresh().unwrap().unwrap().expose_secret(), "r1");

        store.clear().unwrap();
        assert!(store.access().unwrap().is_none());
        assert!(store.refresh().unwrap().is_none());
    }
}
