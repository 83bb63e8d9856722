//! Order records and status values.

use core::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Error returned when parsing an [`OrderStatus`] or [`StatusFilter`] from a
/// string.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid order status: {0}. Valid values: new, in_progress, done, archived, canceled")]
pub struct StatusParseError(pub String);

/// Lifecycle status of an order.
///
/// Matches the portal's wire values exactly. The client never changes a
/// status field directly; orders move to `archived` only through the archive
/// endpoints followed by a reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    New,
    InProgress,
    Done,
    Archived,
    Canceled,
}

impl OrderStatus {
    /// Wire form of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::InProgress => "in_progress",
            Self::Done => "done",
            Self::Archived => "archived",
            Self::Canceled => "canceled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(Self::New),
            "in_progress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            "archived" => Ok(Self::Archived),
            "canceled" => Ok(Self::Canceled),
            _ => Err(StatusParseError(s.to_owned())),
        }
    }
}

/// Status filter for order queries: either every status or a single one.
///
/// Encodes as `all` or the concrete status value in query strings and
/// export file names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(OrderStatus),
}

impl StatusFilter {
    /// Wire form of the filter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Only(status) => status.as_str(),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StatusFilter {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(Self::All);
        }
        s.parse::<OrderStatus>().map(Self::Only)
    }
}

impl From<OrderStatus> for StatusFilter {
    fn from(status: OrderStatus) -> Self {
        Self::Only(status)
    }
}

/// An order as returned by the portal.
///
/// Immutable from the client's point of view: the server is the source of
/// truth and every mutation happens through a dedicated endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Opaque server-assigned identifier.
    pub id: String,
    /// Human-readable order number.
    pub number: String,
    /// Current lifecycle status.
    pub status: OrderStatus,
    /// Order total. Rides the wire as a JSON number.
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    /// Creation timestamp (ISO 8601).
    pub created_at: DateTime<Utc>,
    /// Last update timestamp, if the order was ever updated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}
