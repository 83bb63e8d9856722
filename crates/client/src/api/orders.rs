//! Order archive operations.

use foody_core::{Order, OrdersQuery, Paged};
use reqwest::Method;

use crate::error::PortalError;
use crate::http::{ApiClient, RawResponse, query_string};

/// A raw CSV download.
///
/// The export path bypasses JSON parsing and the shared error raising - the
/// payload is a file, not structured data - so callers check [`Self::is_ok`]
/// explicitly before using the bytes.
#[derive(Debug, Clone)]
pub struct CsvDownload {
    response: RawResponse,
}

impl CsvDownload {
    /// Whether the server produced the file.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.response.is_success()
    }

    /// CSV bytes. Meaningful only when [`Self::is_ok`].
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.response.body
    }

    /// Consume the download, returning the CSV bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.response.body
    }

    /// Server error text for a failed download.
    #[must_use]
    pub fn error_message(&self) -> String {
        self.response.error_message()
    }

    /// HTTP status of the download response.
    #[must_use]
    pub fn status(&self) -> u16 {
        self.response.status.as_u16()
    }
}

/// Order endpoints: list, archive (single and bulk), CSV export.
#[derive(Clone)]
pub struct OrdersApi {
    client: ApiClient,
}

impl OrdersApi {
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Fetch one page of orders matching `query`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list(&self, query: &OrdersQuery) -> Result<Paged<Order>, PortalError> {
        let path = format!("/orders{}", query_string(&query.query_pairs()));
        self.client.send_json(Method::GET, &path, None).await
    }

    /// Move a single order to the archive.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn archive(&self, order_id: &str) -> Result<(), PortalError> {
        let path = format!("/orders/{order_id}/archive");
        self.client.send_empty(Method::POST, &path, None).await
    }

    /// Move several orders to the archive in one request.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn archive_bulk(&self, ids: &[String]) -> Result<(), PortalError> {
        let body = serde_json::json!({ "ids": ids });
        self.client
            .send_empty(Method::POST, "/orders/archive/bulk", Some(body))
            .await
    }

    /// Download the CSV export for `query`.
    ///
    /// # Errors
    ///
    /// Returns transport and token-store errors; an HTTP failure comes back
    /// as an un-ok [`CsvDownload`] for the caller to inspect.
    pub async fn export_csv(&self, query: &OrdersQuery) -> Result<CsvDownload, PortalError> {
        let path = format!("/orders/export.csv{}", query_string(&query.query_pairs()));
        let response = self.client.send_raw(Method::GET, &path).await?;
        Ok(CsvDownload { response })
    }
}
