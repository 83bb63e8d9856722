//! Authentication operations.

use foody_core::{AuthResponse, RegisterRequest, User};
use reqwest::Method;

use crate::error::PortalError;
use crate::http::ApiClient;

/// Auth endpoints: login, register, identity, logout.
///
/// Login and register persist the returned tokens into the client's token
/// store, so subsequent requests are authenticated without further setup.
#[derive(Clone)]
pub struct AuthApi {
    client: ApiClient,
}

impl AuthApi {
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Authenticate with email and password, storing the issued tokens.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or credentials are rejected.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, PortalError> {
        let body = serde_json::json!({ "email": email, "password": password });
        let response: AuthResponse = self
            .client
            .send_json(Method::POST, "/auth/login", Some(body))
            .await?;
        self.store_tokens(&response)?;
        Ok(response)
    }

    /// Create an account, storing the issued tokens.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the payload is rejected.
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, PortalError> {
        let body = serde_json::to_value(request)?;
        let response: AuthResponse = self
            .client
            .send_json(Method::POST, "/auth/register", Some(body))
            .await?;
        self.store_tokens(&response)?;
        Ok(response)
    }

    /// Fetch the current identity.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails; `AuthExpired` when no valid
    /// session exists.
    pub async fn me(&self) -> Result<User, PortalError> {
        self.client.send_json(Method::GET, "/auth/me", None).await
    }

    /// Log out: notify the server on a best-effort basis, then clear the
    /// stored tokens.
    ///
    /// A failed server notification never blocks the local clear.
    ///
    /// # Errors
    ///
    /// Returns an error only if clearing the token store fails.
    pub async fn logout(&self) -> Result<(), PortalError> {
        if let Err(e) = self.client.send_empty(Method::POST, "/auth/logout", None).await {
            tracing::debug!(error = %e, "server logout failed, clearing tokens anyway");
        }
        self.client.tokens().clear()?;
        Ok(())
    }

    fn store_tokens(&self, response: &AuthResponse) -> Result<(), PortalError> {
        let tokens = self.client.tokens();
        tokens.set_access(&response.access_token)?;
        if let Some(refresh) = &response.refresh_token {
            tokens.set_refresh(refresh)?;
        }
        Ok(())
    }
}
