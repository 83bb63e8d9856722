//! Archive view state.
//!
//! `ArchiveView` keeps the visible order list consistent with the filter,
//! pagination, and selection state. The query sent to the server is a pure
//! projection of that state, regenerated on every change.
//!
//! Loads are tagged with a monotonically increasing sequence number: a
//! completed load is applied only while its tag is still the latest, so a
//! stale response can never overwrite the result of a newer query.

use std::collections::HashSet;

use chrono::{NaiveDate, Utc};
use foody_core::{Order, OrderStatus, OrdersQuery, Paged, StatusFilter, total_pages};

use crate::api::orders::{CsvDownload, OrdersApi};
use crate::error::PortalError;

/// A completed CSV export, ready to be written to disk.
#[derive(Debug, Clone)]
pub struct CsvExport {
    /// Suggested file name, `orders-{status}-{YYYY-MM-DD}.csv`.
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Filter/pagination/selection state of the order archive.
pub struct ArchiveView {
    api: OrdersApi,
    status: StatusFilter,
    date_from: Option<NaiveDate>,
    date_to: Option<NaiveDate>,
    /// 1-based page index.
    page: u32,
    page_size: u32,
    orders: Vec<Order>,
    total: u64,
    selection: HashSet<String>,
    /// Tag of the most recently issued load.
    seq: u64,
}

impl ArchiveView {
    /// Create a view over `api`. The archive opens on completed orders,
    /// matching the portal's default tab.
    #[must_use]
    pub fn new(api: OrdersApi, page_size: u32) -> Self {
        Self {
            api,
            status: StatusFilter::Only(OrderStatus::Done),
            date_from: None,
            date_to: None,
            page: 1,
            page_size,
            orders: Vec::new(),
            total: 0,
            selection: HashSet::new(),
            seq: 0,
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // State access
    // ─────────────────────────────────────────────────────────────────────

    #[must_use]
    pub const fn status(&self) -> StatusFilter {
        self.status
    }

    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Number of pages for the current total, at least 1.
    #[must_use]
    pub const fn total_pages(&self) -> u32 {
        total_pages(self.total, self.page_size)
    }

    #[must_use]
    pub fn is_selected(&self, id: &str) -> bool {
        self.selection.contains(id)
    }

    #[must_use]
    pub fn selected_count(&self) -> usize {
        self.selection.len()
    }

    /// The query projection of the current filter and pagination state.
    #[must_use]
    pub const fn query(&self) -> OrdersQuery {
        OrdersQuery {
            status: Some(self.status),
            date_from: self.date_from,
            date_to: self.date_to,
            page: self.page,
            page_size: self.page_size,
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Filter and pagination
    // ─────────────────────────────────────────────────────────────────────

    /// Switch the status tab. Resets the page to 1 so a narrower filter can
    /// never leave the view on an out-of-range page.
    pub fn set_status(&mut self, status: StatusFilter) {
        self.status = status;
        self.page = 1;
    }

    /// Set the inclusive date range. Resets the page to 1.
    pub fn set_date_range(&mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) {
        self.date_from = from;
        self.date_to = to;
        self.page = 1;
    }

    /// Move to `page`, clamped to `[1, total_pages]` once a total is known.
    pub fn set_page(&mut self, page: u32) {
        let mut page = page.max(1);
        if self.total > 0 {
            page = page.min(self.total_pages());
        }
        self.page = page;
    }

    // ─────────────────────────────────────────────────────────────────────
    // Loading
    // ─────────────────────────────────────────────────────────────────────

    /// Issue a new load tag and the query it should run.
    ///
    /// Embedders driving loads themselves pair this with [`Self::apply`];
    /// [`Self::reload`] does both.
    pub fn begin_load(&mut self) -> (u64, OrdersQuery) {
        self.seq += 1;
        (self.seq, self.query())
    }

    /// Install a load result, unless a newer load has been issued since.
    ///
    /// Replaces `orders`/`total` and clears the selection - item identity on
    /// a fresh page is unrelated to the old one, so the subset invariant
    /// holds by construction. Returns whether the result was applied.
    pub fn apply(&mut self, seq: u64, result: Paged<Order>) -> bool {
        if seq != self.seq {
            tracing::debug!(seq, latest = self.seq, "discarding stale load result");
            return false;
        }
        self.orders = result.items;
        self.total = result.total;
        self.selection.clear();
        true
    }

    /// Fetch the current query and apply the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the list request fails.
    pub async fn reload(&mut self) -> Result<(), PortalError> {
        let (seq, query) = self.begin_load();
        let result = self.api.list(&query).await?;
        self.apply(seq, result);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Selection
    // ─────────────────────────────────────────────────────────────────────

    /// Flip one order's selection. IDs not on the current page are ignored,
    /// keeping the selection a subset of the visible items.
    pub fn toggle(&mut self, id: &str) {
        if !self.orders.iter().any(|o| o.id == id) {
            return;
        }
        if !self.selection.remove(id) {
            self.selection.insert(id.to_owned());
        }
    }

    /// Select every visible order, or clear them all when every visible
    /// order is already selected.
    pub fn toggle_all(&mut self) {
        let all_selected = self
            .orders
            .iter()
            .all(|o| self.selection.contains(&o.id));
        if all_selected {
            for order in &self.orders {
                self.selection.remove(&order.id);
            }
        } else {
            for order in &self.orders {
                self.selection.insert(order.id.clone());
            }
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // ─────────────────────────────────────────────────────────────────────
    // Archive actions
    // ─────────────────────────────────────────────────────────────────────

    /// Archive a single order, then reload. No optimistic removal - the
    /// server decides what the page looks like afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if the archive call or the reload fails.
    pub async fn archive_one(&mut self, id: &str) -> Result<(), PortalError> {
        self.api.archive(id).await?;
        self.reload().await
    }

    /// Archive every selected order, then reload. A no-op when nothing is
    /// selected - no network call is made.
    ///
    /// # Errors
    ///
    /// Returns an error if the bulk call or the reload fails.
    pub async fn archive_selected(&mut self) -> Result<(), PortalError> {
        if self.selection.is_empty() {
            return Ok(());
        }
        let ids: Vec<String> = self.selection.iter().cloned().collect();
        self.api.archive_bulk(&ids).await?;
        self.reload().await
    }

    // ─────────────────────────────────────────────────────────────────────
    // CSV export
    // ─────────────────────────────────────────────────────────────────────

    /// Download the CSV export for the view's current query.
    ///
    /// # Errors
    ///
    /// A non-ok download surfaces the server's error text as
    /// [`PortalError::Api`].
    pub async fn export_csv(&self) -> Result<CsvExport, PortalError> {
        let download: CsvDownload = self.api.export_csv(&self.query()).await?;
        if !download.is_ok() {
            return Err(PortalError::Api {
                status: download.status(),
                message: download.error_message(),
            });
        }
        Ok(CsvExport {
            file_name: self.export_file_name_on(Utc::now().date_naive()),
            bytes: download.into_bytes(),
        })
    }

    /// Export file name for a given date: `orders-{status}-{YYYY-MM-DD}.csv`.
    #[must_use]
    pub fn export_file_name_on(&self, date: NaiveDate) -> String {
        format!("orders-{}-{date}.csv", self.status)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use chrono::TimeZone;
    use rust_decimal::Decimal;

    use super::*;
    use crate::http::ApiClient;
    use crate::token::MemoryTokenStore;

    fn view() -> ArchiveView {
        // The transport is never exercised by these tests.
        let client = ApiClient::new("http://unused.test", Arc::new(MemoryTokenStore::new()));
        ArchiveView::new(OrdersApi::new(client), 20)
    }

    fn order(id: &str) -> Order {
        Order {
            id: id.to_owned(),
            number: format!("A-{id}"),
            status: OrderStatus::Done,
            total: Decimal::new(1000, 2),
            created_at: Utc.with_ymd_and_hms(2026, 2, 1, 12, 0, 0).unwrap(),
            updated_at: None,
        }
    }

    fn page_of(ids: &[&str], total: u64) -> Paged<Order> {
        Paged {
            items: ids.iter().map(|id| order(id)).collect(),
            total,
            page: 1,
            page_size: 20,
        }
    }

    #[test]
    fn test_defaults_to_done_tab_page_one() {
        let view = view();
        assert_eq!(view.status(), StatusFilter::Only(OrderStatus::Done));
        assert_eq!(view.page(), 1);
        let query = view.query();
        assert_eq!(query.status, Some(StatusFilter::Only(OrderStatus::Done)));
        assert_eq!(query.page_size, 20);
    }

    #[test]
    fn test_status_change_resets_page() {
        let mut view = view();
        let (seq, _) = view.begin_load();
        view.apply(seq, page_of(&["1"], 45));
        view.set_page(3);
        assert_eq!(view.page(), 3);

        view.set_status(StatusFilter::All);
        assert_eq!(view.page(), 1);
    }

    #[test]
    fn test_date_range_change_resets_page() {
        let mut view = view();
        let (seq, _) = view.begin_load();
        view.apply(seq, page_of(&["1"], 45));
        view.set_page(2);

        view.set_date_range(NaiveDate::from_ymd_opt(2026, 1, 1), None);
        assert_eq!(view.page(), 1);
        assert_eq!(
            view.query().date_from,
            NaiveDate::from_ymd_opt(2026, 1, 1)
        );
    }

    #[test]
    fn test_set_page_clamps_to_known_range() {
        let mut view = view();
        view.set_page(0);
        assert_eq!(view.page(), 1);

        // No total known yet: any positive page is taken as-is.
        view.set_page(7);
        assert_eq!(view.page(), 7);

        let (seq, _) = view.begin_load();
        view.apply(seq, page_of(&["1"], 45));
        assert_eq!(view.total_pages(), 3);
        view.set_page(9);
        assert_eq!(view.page(), 3);
    }

    #[test]
    fn test_apply_replaces_list_and_clears_selection() {
        let mut view = view();
        let (seq, _) = view.begin_load();
        view.apply(seq, page_of(&["1", "2"], 2));
        view.toggle("1");
        assert_eq!(view.selected_count(), 1);

        let (seq, _) = view.begin_load();
        assert!(view.apply(seq, page_of(&["3"], 1)));
        assert_eq!(view.selected_count(), 0);
        assert_eq!(view.orders().len(), 1);
        assert_eq!(view.total(), 1);
    }

    #[test]
    fn test_stale_result_is_discarded() {
        let mut view = view();
        let (stale, _) = view.begin_load();
        let (fresh, _) = view.begin_load();

        assert!(view.apply(fresh, page_of(&["new"], 1)));
        assert!(!view.apply(stale, page_of(&["old"], 99)));

        assert_eq!(view.orders().first().unwrap().id, "new");
        assert_eq!(view.total(), 1);
    }

    #[test]
    fn test_toggle_ignores_ids_not_on_page() {
        let mut view = view();
        let (seq, _) = view.begin_load();
        view.apply(seq, page_of(&["1"], 1));

        view.toggle("other-page-id");
        assert_eq!(view.selected_count(), 0);

        view.toggle("1");
        assert!(view.is_selected("1"));
        view.toggle("1");
        assert!(!view.is_selected("1"));
    }

    #[test]
    fn test_toggle_all_selects_then_clears() {
        let mut view = view();
        let (seq, _) = view.begin_load();
        view.apply(seq, page_of(&["1", "2", "3"], 3));

        view.toggle("1");
        // Partially selected: toggle-all selects everything visible.
        view.toggle_all();
        assert_eq!(view.selected_count(), 3);

        // Fully selected: toggle-all clears everything visible.
        view.toggle_all();
        assert_eq!(view.selected_count(), 0);
    }

    #[test]
    fn test_export_file_name_encodes_status_and_date() {
        let mut view = view();
        let date = NaiveDate::from_ymd_opt(2026, 8, 30).unwrap();
        assert_eq!(view.export_file_name_on(date), "orders-done-2026-08-30.csv");

        view.set_status(StatusFilter::All);
        assert_eq!(view.export_file_name_on(date), "orders-all-2026-08-30.csv");
    }
}
