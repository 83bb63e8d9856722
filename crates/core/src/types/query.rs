//! Order query projections and paged result envelopes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::order::StatusFilter;

/// Default archive page size, matching the portal's list view.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Filter and pagination parameters for the order list and CSV export.
///
/// A query is a pure projection of view state: it is regenerated whenever a
/// filter input changes, never mutated in place. Dates are inclusive bounds
/// in `YYYY-MM-DD` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrdersQuery {
    pub status: Option<StatusFilter>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    /// 1-based page index.
    pub page: u32,
    pub page_size: u32,
}

impl Default for OrdersQuery {
    fn default() -> Self {
        Self {
            status: None,
            date_from: None,
            date_to: None,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl OrdersQuery {
    /// Query parameters in wire order.
    ///
    /// `None` values stand for parameters that must be omitted from the query
    /// string entirely; everything present is already stringified.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("status", self.status.map(|s| s.as_str().to_owned())),
            ("dateFrom", self.date_from.map(|d| d.to_string())),
            ("dateTo", self.date_to.map(|d| d.to_string())),
            ("page", Some(self.page.to_string())),
            ("pageSize", Some(self.page_size.to_string())),
        ]
    }
}

/// A server-authoritative page of results.
///
/// Invariants (enforced server-side): `items.len() <= page_size`, and `page`
/// lies within `[1, total_pages]` whenever `total > 0`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

impl<T> Paged<T> {
    /// Number of pages needed for `total` items, at least 1.
    #[must_use]
    pub const fn total_pages(&self) -> u32 {
        total_pages(self.total, self.page_size)
    }
}

/// Page count for `total` items at `page_size` per page, at least 1.
// A paged endpoint never reports more pages than fit in u32.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub const fn total_pages(total: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 1;
    }
    let pages = total.div_ceil(page_size as u64);
    if pages == 0 { 1 } else { pages as u32 }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::order::OrderStatus;

    #[test]
    fn test_query_pairs_order_and_values() {
        let query = OrdersQuery {
            status: Some(StatusFilter::Only(OrderStatus::Done)),
            date_from: Some(NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()),
            date_to: None,
            page: 2,
            page_size: 20,
        };
        assert_eq!(
            query.query_pairs(),
            vec![
                ("status", Some("done".to_owned())),
                ("dateFrom", Some("2026-01-15".to_owned())),
                ("dateTo", None),
                ("page", Some("2".to_owned())),
                ("pageSize", Some("20".to_owned())),
            ]
        );
    }

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(total_pages(45, 20), 3);
        assert_eq!(total_pages(40, 20), 2);
        assert_eq!(total_pages(1, 20), 1);
    }

    #[test]
    fn test_total_pages_never_zero() {
        assert_eq!(total_pages(0, 20), 1);
        assert_eq!(total_pages(10, 0), 1);
    }

    #[test]
    fn test_paged_deserializes_wire_shape() {
        let json = r#"{ "items": [1, 2, 3], "total": 45, "page": 2, "pageSize": 20 }"#;
        let page: Paged<u32> = serde_json::from_str(json).unwrap();
        assert_eq!(page.items.len(), 3);
        assert_eq!(page.total_pages(), 3);
    }
}
