//! Foody CLI - terminal front-end for the customer portal.
//!
//! # Usage
//!
//! ```bash
//! # Log in and store the session tokens
//! foody login -e ivan@example.com -p secret
//!
//! # Show the current profile, update the city
//! foody profile show
//! foody profile update --city Moscow
//!
//! # Browse the archive
//! foody orders list --status done --from 2026-01-01 --page 2
//!
//! # Archive orders and export the current view as CSV
//! foody orders archive o-17
//! foody orders archive-bulk o-17 o-18 o-19
//! foody orders export --status done
//! ```
//!
//! # Environment Variables
//!
//! - `FOODY_API_BASE_URL` - Base URL of the portal REST API (required)
//! - `FOODY_TOKEN_FILE` - Durable token file (default: `.foody-tokens.json`)
//! - `FOODY_PAGE_SIZE` - Archive page size (default: 20)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use foody_core::StatusFilter;

mod commands;

#[derive(Parser)]
#[command(name = "foody")]
#[command(author, version, about = "Foody customer portal CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the session tokens
    Login {
        /// Account email
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,
    },
    /// Create an account and store the session tokens
    Register {
        /// Account email
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,

        /// Display name
        #[arg(short, long)]
        name: String,

        /// City
        #[arg(long)]
        city: Option<String>,

        /// Street address
        #[arg(long)]
        address: Option<String>,

        /// Latitude
        #[arg(long)]
        lat: Option<f64>,

        /// Longitude
        #[arg(long)]
        lng: Option<f64>,
    },
    /// Drop the stored session (best-effort server notification)
    Logout,
    /// Show the currently authenticated user
    Whoami,
    /// Show or update the profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// Browse and manage the order archive
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
}

#[derive(Subcommand)]
enum ProfileAction {
    /// Show the current profile
    Show,
    /// Update profile fields; omitted fields are left untouched
    Update {
        /// Display name
        #[arg(long)]
        name: Option<String>,

        /// City
        #[arg(long)]
        city: Option<String>,

        /// Street address
        #[arg(long)]
        address: Option<String>,

        /// Latitude
        #[arg(long)]
        lat: Option<f64>,

        /// Longitude
        #[arg(long)]
        lng: Option<f64>,
    },
}

#[derive(Subcommand)]
enum OrdersAction {
    /// List one page of orders
    List {
        /// Status filter: all, new, in_progress, done, archived, canceled
        #[arg(short, long)]
        status: Option<StatusFilter>,

        /// Inclusive start date (YYYY-MM-DD)
        #[arg(long = "from")]
        date_from: Option<NaiveDate>,

        /// Inclusive end date (YYYY-MM-DD)
        #[arg(long = "to")]
        date_to: Option<NaiveDate>,

        /// 1-based page index
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
    /// Move one order to the archive
    Archive {
        /// Order ID
        id: String,
    },
    /// Move several orders to the archive in one request
    ArchiveBulk {
        /// Order IDs
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Download the CSV export of the filtered archive
    Export {
        /// Status filter: all, new, in_progress, done, archived, canceled
        #[arg(short, long)]
        status: Option<StatusFilter>,

        /// Inclusive start date (YYYY-MM-DD)
        #[arg(long = "from")]
        date_from: Option<NaiveDate>,

        /// Inclusive end date (YYYY-MM-DD)
        #[arg(long = "to")]
        date_to: Option<NaiveDate>,

        /// Output file (default: the generated orders-{status}-{date}.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Login { email, password } => commands::auth::login(&email, &password).await?,
        Commands::Register {
            email,
            password,
            name,
            city,
            address,
            lat,
            lng,
        } => {
            commands::auth::register(foody_core::RegisterRequest {
                email,
                password,
                name,
                city,
                address,
                lat,
                lng,
            })
            .await?;
        }
        Commands::Logout => commands::auth::logout().await?,
        Commands::Whoami => commands::auth::whoami().await?,
        Commands::Profile { action } => match action {
            ProfileAction::Show => commands::profile::show().await?,
            ProfileAction::Update {
                name,
                city,
                address,
                lat,
                lng,
            } => {
                commands::profile::update(foody_core::ProfileUpdate {
                    name,
                    city,
                    address,
                    lat,
                    lng,
                })
                .await?;
            }
        },
        Commands::Orders { action } => match action {
            OrdersAction::List {
                status,
                date_from,
                date_to,
                page,
            } => commands::orders::list(status, date_from, date_to, page).await?,
            OrdersAction::Archive { id } => commands::orders::archive(&id).await?,
            OrdersAction::ArchiveBulk { ids } => commands::orders::archive_bulk(&ids).await?,
            OrdersAction::Export {
                status,
                date_from,
                date_to,
                output,
            } => commands::orders::export(status, date_from, date_to, output).await?,
        },
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use foody_core::OrderStatus;

    use super::*;

    #[test]
    fn test_orders_list_parses_status_and_dates() {
        let cli = Cli::try_parse_from([
            "foody", "orders", "list", "--status", "done", "--from", "2026-01-01", "--to",
            "2026-01-31", "--page", "2",
        ])
        .unwrap();

        let Commands::Orders {
            action:
                OrdersAction::List {
                    status,
                    date_from,
                    date_to,
                    page,
                },
        } = cli.command
        else {
            panic!("expected orders list");
        };
        assert_eq!(status, Some(StatusFilter::Only(OrderStatus::Done)));
        assert_eq!(date_from, NaiveDate::from_ymd_opt(2026, 1, 1));
        assert_eq!(date_to, NaiveDate::from_ymd_opt(2026, 1, 31));
        assert_eq!(page, 2);
    }

    #[test]
    fn test_orders_list_defaults_to_page_one() {
        let cli = Cli::try_parse_from(["foody", "orders", "list"]).unwrap();
        let Commands::Orders {
            action: OrdersAction::List { status, page, .. },
        } = cli.command
        else {
            panic!("expected orders list");
        };
        assert_eq!(status, None);
        assert_eq!(page, 1);
    }

    #[test]
    fn test_invalid_status_is_rejected() {
        assert!(Cli::try_parse_from(["foody", "orders", "list", "--status", "shipped"]).is_err());
    }

    #[test]
    fn test_archive_bulk_requires_at_least_one_id() {
        assert!(Cli::try_parse_from(["foody", "orders", "archive-bulk"]).is_err());
        assert!(Cli::try_parse_from(["foody", "orders", "archive-bulk", "o-17", "o-18"]).is_ok());
    }
}
