//! Integration tests for the Foody portal client.
//!
//! Flows run end to end against [`ScriptedBackend`], an in-process transport
//! that pops pre-queued responses and records every request it executes - no
//! live server or network access needed.
//!
//! # Test Categories
//!
//! - `auth_flow` - login/logout and the 401 refresh-and-retry pipeline
//! - `archive_flow` - archive listing, selection, bulk archiving, CSV export

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use foody_client::{ApiRequest, HttpBackend, PortalError, RawResponse};
use reqwest::StatusCode;
use secrecy::ExposeSecret;
use serde_json::Value;

/// What the backend saw for one executed request.
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub method: String,
    pub url: String,
    pub bearer: Option<String>,
    pub body: Option<Value>,
}

/// Scripted transport: responses are queued up front, requests are recorded.
#[derive(Default)]
pub struct ScriptedBackend {
    responses: Mutex<VecDeque<RawResponse>>,
    seen: Mutex<Vec<SeenRequest>>,
}

impl ScriptedBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a plain-text (or empty) response.
    pub fn push(&self, status: StatusCode, body: impl Into<Vec<u8>>) {
        self.lock_responses().push_back(RawResponse::new(status, body));
    }

    /// Queue a JSON response.
    pub fn push_json(&self, status: StatusCode, value: &Value) {
        self.lock_responses().push_back(RawResponse::json(status, value));
    }

    /// Every request executed so far, in order.
    #[must_use]
    pub fn seen(&self) -> Vec<SeenRequest> {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of requests executed so far.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn lock_responses(&self) -> std::sync::MutexGuard<'_, VecDeque<RawResponse>> {
        self.responses.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl HttpBackend for ScriptedBackend {
    async fn execute(&self, request: ApiRequest) -> Result<RawResponse, PortalError> {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(SeenRequest {
                method: request.method.to_string(),
                url: request.url.clone(),
                bearer: request
                    .bearer
                    .as_ref()
                    .map(|b| b.expose_secret().to_owned()),
                body: request.body.clone(),
            });

        self.lock_responses().pop_front().map_or_else(
            || {
                Err(PortalError::Api {
                    status: 599,
                    message: format!("no scripted response for {}", request.url),
                })
            },
            Ok,
        )
    }
}
