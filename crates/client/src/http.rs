//! Authenticated HTTP client.
//!
//! `ApiClient` wraps every portal request with bearer-token handling and a
//! single refresh-and-retry on 401. The pipeline is deliberately shaped as a
//! two-step sequence - attempt, then one `match` over the refresh outcome -
//! so "at most one retry" is enforced by structure, not by a counter:
//!
//! 1. Send the request with the stored access token (if any).
//! 2. On 401, call `/auth/refresh` with the stored refresh token. Success
//!    rotates the stored tokens and re-sends the original request exactly
//!    once; failure falls through with the original 401.
//! 3. Finalize: non-2xx becomes an error carrying the server's text, 204
//!    yields no value, anything else is parsed as JSON.
//!
//! The transport lives behind [`HttpBackend`], so the whole pipeline can run
//! against a scripted in-process backend in tests.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::PortalError;
use crate::token::TokenStore;

/// A prepared portal request, ready for a transport to execute.
#[derive(Debug)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    /// Access token for the `Authorization: Bearer` header, when one is
    /// stored. Absent token means no Authorization header at all.
    pub bearer: Option<SecretString>,
    /// JSON body, when the operation has one.
    pub body: Option<Value>,
}

/// Status and raw bytes of a response, before any interpretation.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Build a response from a status and body bytes.
    #[must_use]
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Build a JSON response from a status and a serializable value.
    #[must_use]
    pub fn json(status: StatusCode, value: &Value) -> Self {
        Self {
            status,
            body: serde_json::to_vec(value).unwrap_or_default(),
        }
    }

    /// Whether the status is in the 2xx range.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Body as text, lossily decoded.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Server error text, or a generic status message when the body is empty.
    #[must_use]
    pub fn error_message(&self) -> String {
        let text = self.text();
        if text.is_empty() {
            format!(
                "HTTP {} {}",
                self.status.as_u16(),
                self.status.canonical_reason().unwrap_or("request failed")
            )
        } else {
            text
        }
    }
}

/// Transport abstraction: executes one prepared request.
///
/// Production uses [`ReqwestBackend`]; tests inject a scripted fake.
#[async_trait]
pub trait HttpBackend: Send + Sync {
    /// Execute `request` and collect the response.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::Transport`] when the request never produced a
    /// response.
    async fn execute(&self, request: ApiRequest) -> Result<RawResponse, PortalError>;
}

/// Transport backed by a shared `reqwest::Client`.
#[derive(Debug, Default)]
pub struct ReqwestBackend {
    client: reqwest::Client,
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn execute(&self, request: ApiRequest) -> Result<RawResponse, PortalError> {
        let mut builder = self
            .client
            .request(request.method, &request.url)
            .header(CONTENT_TYPE, "application/json");
        if let Some(bearer) = &request.bearer {
            builder = builder.header(
                AUTHORIZATION,
                format!("Bearer {}", bearer.expose_secret()),
            );
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?.to_vec();
        Ok(RawResponse { status, body })
    }
}

/// Rotated tokens returned by `/auth/refresh`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RotatedTokens {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
}

struct ApiClientInner {
    backend: Arc<dyn HttpBackend>,
    base_url: String,
    tokens: Arc<dyn TokenStore>,
}

/// Authenticated portal client.
///
/// Cheap to clone; all clones share one transport and one token store. The
/// token store may be mutated mid-call when a 401 triggers a refresh.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

impl ApiClient {
    /// Create a client over the production reqwest transport.
    #[must_use]
    pub fn new(base_url: &str, tokens: Arc<dyn TokenStore>) -> Self {
        Self::with_backend(base_url, tokens, Arc::new(ReqwestBackend::default()))
    }

    /// Create a client over a custom transport.
    #[must_use]
    pub fn with_backend(
        base_url: &str,
        tokens: Arc<dyn TokenStore>,
        backend: Arc<dyn HttpBackend>,
    ) -> Self {
        Self {
            inner: Arc::new(ApiClientInner {
                backend,
                base_url: base_url.trim_end_matches('/').to_owned(),
                tokens,
            }),
        }
    }

    /// The token store this client reads and rotates.
    #[must_use]
    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.inner.tokens
    }

    /// Execute a request and parse the JSON response body into `T`.
    ///
    /// # Errors
    ///
    /// Propagates transport, HTTP, auth-expiry, and parse errors.
    pub async fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<T, PortalError> {
        let value = self.send(method, path, body).await?;
        Ok(serde_json::from_value(value.unwrap_or(Value::Null))?)
    }

    /// Execute a request, discarding any response body.
    ///
    /// # Errors
    ///
    /// Propagates transport, HTTP, auth-expiry, and parse errors.
    pub async fn send_empty(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<(), PortalError> {
        self.send(method, path, body).await?;
        Ok(())
    }

    /// Execute a request through the full pipeline.
    ///
    /// Returns `None` for 204 or an empty body, otherwise the parsed JSON.
    ///
    /// # Errors
    ///
    /// Propagates transport, HTTP, auth-expiry, and parse errors.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Option<Value>, PortalError> {
        let response = self.dispatch(method, path, body.as_ref()).await?;
        Self::finalize(&response)
    }

    /// Execute a request with auth handling but no JSON interpretation.
    ///
    /// Used for file downloads; the caller must check success explicitly.
    ///
    /// # Errors
    ///
    /// Returns transport and token-store errors only - any HTTP status comes
    /// back as a [`RawResponse`].
    pub async fn send_raw(
        &self,
        method: Method,
        path: &str,
    ) -> Result<RawResponse, PortalError> {
        self.dispatch(method, path, None).await
    }

    /// Attempt, then at most one refresh-and-retry.
    async fn dispatch(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<RawResponse, PortalError> {
        let bearer = self.inner.tokens.access()?;
        let first = self.attempt(method.clone(), path, body, bearer).await?;
        if first.status != StatusCode::UNAUTHORIZED {
            return Ok(first);
        }

        tracing::debug!(path, "got 401, attempting token refresh");
        match self.refresh_access().await? {
            Some(access) => self.attempt(method, path, body, Some(access)).await,
            None => Ok(first),
        }
    }

    async fn attempt(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        bearer: Option<SecretString>,
    ) -> Result<RawResponse, PortalError> {
        let request = ApiRequest {
            method,
            url: format!("{}{path}", self.inner.base_url),
            bearer,
            body: body.cloned(),
        };
        self.inner.backend.execute(request).await
    }

    /// Exchange the stored refresh token for a new access token.
    ///
    /// `Ok(None)` means "no retry": either no refresh token is stored or the
    /// refresh endpoint rejected it. A transport failure mid-refresh
    /// propagates as an error.
    async fn refresh_access(&self) -> Result<Option<SecretString>, PortalError> {
        let Some(refresh) = self.inner.tokens.refresh()? else {
            tracing::debug!("no refresh token stored");
            return Ok(None);
        };

        let request = ApiRequest {
            method: Method::POST,
            url: format!("{}/auth/refresh", self.inner.base_url),
            bearer: None,
            body: Some(serde_json::json!({ "refreshToken": refresh.expose_secret() })),
        };
        let response = self.inner.backend.execute(request).await?;

        if !response.is_success() {
            tracing::warn!(status = %response.status, "token refresh rejected");
            return Ok(None);
        }

        let rotated: RotatedTokens = serde_json::from_slice(&response.body)?;
        self.inner.tokens.set_access(&rotated.access_token)?;
        if let Some(refresh_token) = &rotated.refresh_token {
            self.inner.tokens.set_refresh(refresh_token)?;
        }
        Ok(Some(SecretString::from(rotated.access_token)))
    }

    /// Turn a raw response into the caller's outcome.
    fn finalize(response: &RawResponse) -> Result<Option<Value>, PortalError> {
        if response.status == StatusCode::UNAUTHORIZED {
            return Err(PortalError::AuthExpired(response.error_message()));
        }
        if !response.is_success() {
            return Err(PortalError::Api {
                status: response.status.as_u16(),
                message: response.error_message(),
            });
        }
        if response.status == StatusCode::NO_CONTENT || response.body.is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_slice(&response.body)?))
    }
}

/// Build a query string from key/value pairs.
///
/// Pairs whose value is `None` or an empty string are omitted entirely.
/// Returns an empty string when nothing survives, otherwise `?k=v&...`.
#[must_use]
pub fn query_string(pairs: &[(&str, Option<String>)]) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    let mut any = false;
    for (key, value) in pairs {
        if let Some(value) = value
            && !value.is_empty()
        {
            serializer.append_pair(key, value);
            any = true;
        }
    }
    if any {
        format!("?{}", serializer.finish())
    } else {
        String::new()
    }
}
