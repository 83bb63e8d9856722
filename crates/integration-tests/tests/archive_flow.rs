//! End-to-end archive flows against the scripted transport.
//!
//! Covers the query projection on the wire, pagination arithmetic, selection
//! behaviour across reloads, bulk archiving, and CSV export.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use foody_client::{ApiClient, ArchiveView, MemoryTokenStore, OrdersApi, PortalError, TokenStore};
use foody_core::{OrderStatus, StatusFilter};
use foody_integration_tests::ScriptedBackend;
use reqwest::StatusCode;
use serde_json::{Value, json};

const BASE: &str = "https://portal.test/api";

fn setup() -> (Arc<ScriptedBackend>, ArchiveView) {
    let backend = Arc::new(ScriptedBackend::new());
    let tokens = Arc::new(MemoryTokenStore::new());
    tokens.set_access("a1").expect("seed");
    let client = ApiClient::with_backend(BASE, tokens, backend.clone());
    let view = ArchiveView::new(OrdersApi::new(client), 20);
    (backend, view)
}

fn order_json(id: &str) -> Value {
    json!({
        "id": id,
        "number": format!("A-{id}"),
        "status": "done",
        "total": 42.5,
        "createdAt": "2026-02-11T09:30:00Z"
    })
}

fn paged_json(ids: &[&str], total: u64, page: u32) -> Value {
    json!({
        "items": ids.iter().map(|id| order_json(id)).collect::<Vec<_>>(),
        "total": total,
        "page": page,
        "pageSize": 20
    })
}

#[tokio::test]
async fn listing_45_done_orders_paginates_into_3_pages() {
    let (backend, mut view) = setup();

    let page2_ids: Vec<String> = (21..=40).map(|n| format!("o{n}")).collect();
    let id_refs: Vec<&str> = page2_ids.iter().map(String::as_str).collect();
    backend.push_json(StatusCode::OK, &paged_json(&id_refs, 45, 2));

    view.set_status(StatusFilter::Only(OrderStatus::Done));
    view.set_page(2);
    view.reload().await.expect("load");

    assert!(view.orders().len() <= 20);
    assert_eq!(view.total(), 45);
    assert_eq!(view.total_pages(), 3);

    let seen = backend.seen();
    let list = seen.first().expect("one request");
    assert_eq!(
        list.url,
        format!("{BASE}/orders?status=done&page=2&pageSize=20")
    );
    assert_eq!(list.bearer.as_deref(), Some("a1"));
}

#[tokio::test]
async fn date_filter_rides_the_query_and_resets_the_page() {
    let (backend, mut view) = setup();
    backend.push_json(StatusCode::OK, &paged_json(&["o1"], 1, 1));

    view.set_page(4);
    view.set_date_range(
        NaiveDate::from_ymd_opt(2026, 1, 1),
        NaiveDate::from_ymd_opt(2026, 1, 31),
    );
    view.reload().await.expect("load");

    let seen = backend.seen();
    assert_eq!(
        seen.first().expect("one request").url,
        format!("{BASE}/orders?status=done&dateFrom=2026-01-01&dateTo=2026-01-31&page=1&pageSize=20")
    );
}

#[tokio::test]
async fn selection_is_empty_after_every_load() {
    let (backend, mut view) = setup();
    backend.push_json(StatusCode::OK, &paged_json(&["o1", "o2"], 2, 1));
    backend.push_json(StatusCode::OK, &paged_json(&["o3"], 1, 1));

    view.reload().await.expect("load");
    view.toggle("o1");
    view.toggle("o2");
    assert_eq!(view.selected_count(), 2);

    view.reload().await.expect("reload");
    assert_eq!(view.selected_count(), 0);
}

#[tokio::test]
async fn bulk_archive_with_empty_selection_makes_no_network_call() {
    let (backend, mut view) = setup();
    backend.push_json(StatusCode::OK, &paged_json(&["o1"], 1, 1));
    view.reload().await.expect("load");

    let before = backend.request_count();
    view.archive_selected().await.expect("no-op");
    assert_eq!(backend.request_count(), before);
}

#[tokio::test]
async fn bulk_archive_sends_the_full_selection_then_reloads() {
    let (backend, mut view) = setup();
    backend.push_json(StatusCode::OK, &paged_json(&["o1", "o2"], 2, 1));
    backend.push(StatusCode::NO_CONTENT, "");
    backend.push_json(StatusCode::OK, &paged_json(&[], 0, 1));

    view.reload().await.expect("load");
    view.toggle_all();
    view.archive_selected().await.expect("bulk archive");

    let seen = backend.seen();
    assert_eq!(seen.len(), 3, "load, bulk call, reload");
    let bulk = seen.get(1).expect("bulk request");
    assert_eq!(bulk.url, format!("{BASE}/orders/archive/bulk"));
    let ids: HashSet<String> = bulk
        .body
        .as_ref()
        .and_then(|b| b.get("ids"))
        .and_then(Value::as_array)
        .expect("ids array")
        .iter()
        .filter_map(|v| v.as_str().map(str::to_owned))
        .collect();
    assert_eq!(
        ids,
        HashSet::from(["o1".to_owned(), "o2".to_owned()])
    );

    assert!(view.orders().is_empty());
    assert_eq!(view.selected_count(), 0);
}

#[tokio::test]
async fn archive_one_reloads_unconditionally() {
    let (backend, mut view) = setup();
    backend.push_json(StatusCode::OK, &paged_json(&["o1", "o2"], 2, 1));
    backend.push(StatusCode::NO_CONTENT, "");
    backend.push_json(StatusCode::OK, &paged_json(&["o2"], 1, 1));

    view.reload().await.expect("load");
    view.archive_one("o1").await.expect("archive");

    let seen = backend.seen();
    assert_eq!(seen.len(), 3);
    assert_eq!(
        seen.get(1).expect("archive request").url,
        format!("{BASE}/orders/o1/archive")
    );
    assert_eq!(view.orders().len(), 1);
}

#[tokio::test]
async fn export_downloads_csv_with_the_list_query() {
    let (backend, view) = setup();
    backend.push(StatusCode::OK, "id,number,status\no1,A-o1,done\n");

    let export = view.export_csv().await.expect("export");
    assert_eq!(
        String::from_utf8_lossy(&export.bytes),
        "id,number,status\no1,A-o1,done\n"
    );
    assert!(export.file_name.starts_with("orders-done-"));
    assert!(export.file_name.ends_with(".csv"));

    let seen = backend.seen();
    assert_eq!(
        seen.first().expect("one request").url,
        format!("{BASE}/orders/export.csv?status=done&page=1&pageSize=20")
    );
}

#[tokio::test]
async fn export_failure_surfaces_the_server_text() {
    let (backend, view) = setup();
    backend.push(StatusCode::FORBIDDEN, "Export not allowed");

    let err = view.export_csv().await.expect_err("export fails");
    assert!(
        matches!(err, PortalError::Api { status: 403, ref message } if message == "Export not allowed")
    );
}

#[tokio::test]
async fn stale_load_results_never_overwrite_newer_state() {
    let (_, mut view) = setup();

    let (stale_tag, _) = view.begin_load();
    let (fresh_tag, _) = view.begin_load();

    let fresh: foody_core::Paged<foody_core::Order> =
        serde_json::from_value(paged_json(&["fresh"], 1, 1)).expect("parse");
    let stale: foody_core::Paged<foody_core::Order> =
        serde_json::from_value(paged_json(&["stale"], 9, 1)).expect("parse");

    assert!(view.apply(fresh_tag, fresh));
    assert!(!view.apply(stale_tag, stale));
    assert_eq!(view.orders().first().expect("one order").id, "fresh");
    assert_eq!(view.total(), 1);
}
