//! Order archive commands.

use std::path::PathBuf;

use chrono::NaiveDate;
use foody_client::{ArchiveView, OrdersApi};
use foody_core::StatusFilter;

use super::{CliError, portal};

/// Build the archive view with the given filters applied.
fn view_with(
    status: Option<StatusFilter>,
    date_from: Option<NaiveDate>,
    date_to: Option<NaiveDate>,
) -> Result<ArchiveView, CliError> {
    let (config, client) = portal()?;
    let mut view = ArchiveView::new(OrdersApi::new(client), config.page_size);
    if let Some(status) = status {
        view.set_status(status);
    }
    if date_from.is_some() || date_to.is_some() {
        view.set_date_range(date_from, date_to);
    }
    Ok(view)
}

/// List one page of the filtered archive.
pub async fn list(
    status: Option<StatusFilter>,
    date_from: Option<NaiveDate>,
    date_to: Option<NaiveDate>,
    page: u32,
) -> Result<(), CliError> {
    let mut view = view_with(status, date_from, date_to)?;
    view.set_page(page);
    view.reload().await?;

    if view.orders().is_empty() {
        tracing::info!("No orders match the current filter");
        return Ok(());
    }

    tracing::info!(
        "{:<12} {:<12} {:>10}  {}",
        "NUMBER",
        "STATUS",
        "TOTAL",
        "CREATED"
    );
    for order in view.orders() {
        tracing::info!(
            "{:<12} {:<12} {:>10}  {}  [{}]",
            order.number,
            order.status.as_str(),
            order.total,
            order.created_at.format("%Y-%m-%d %H:%M"),
            order.id
        );
    }
    tracing::info!(
        "Page {} / {} ({} orders total)",
        view.page(),
        view.total_pages(),
        view.total()
    );
    Ok(())
}

/// Archive a single order.
pub async fn archive(id: &str) -> Result<(), CliError> {
    let (_, client) = portal()?;
    OrdersApi::new(client).archive(id).await?;
    tracing::info!("Order {id} archived");
    Ok(())
}

/// Archive several orders in one request.
pub async fn archive_bulk(ids: &[String]) -> Result<(), CliError> {
    let (_, client) = portal()?;
    OrdersApi::new(client).archive_bulk(ids).await?;
    tracing::info!("{} orders archived", ids.len());
    Ok(())
}

/// Download the CSV export and write it to disk.
pub async fn export(
    status: Option<StatusFilter>,
    date_from: Option<NaiveDate>,
    date_to: Option<NaiveDate>,
    output: Option<PathBuf>,
) -> Result<(), CliError> {
    let view = view_with(status, date_from, date_to)?;
    let export = view.export_csv().await?;

    let path = output.unwrap_or_else(|| PathBuf::from(&export.file_name));
    std::fs::write(&path, &export.bytes).map_err(|source| CliError::WriteFile {
        path: path.display().to_string(),
        source,
    })?;
    tracing::info!("Wrote {} bytes to {}", export.bytes.len(), path.display());
    Ok(())
}
