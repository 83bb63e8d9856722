//! Profile operations.

use foody_core::{ProfileUpdate, User};
use reqwest::Method;

use crate::error::PortalError;
use crate::http::ApiClient;

/// Profile endpoints: fetch and partial update.
#[derive(Clone)]
pub struct ProfileApi {
    client: ApiClient,
}

impl ProfileApi {
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Fetch the current profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn get(&self) -> Result<User, PortalError> {
        self.client.send_json(Method::GET, "/user/profile", None).await
    }

    /// Apply a partial update and return the updated profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the payload is rejected.
    pub async fn update(&self, update: &ProfileUpdate) -> Result<User, PortalError> {
        let body = serde_json::to_value(update)?;
        self.client
            .send_json(Method::PUT, "/user/profile", Some(body))
            .await
    }
}
