//! Core types for the Foody portal.
//!
//! This module provides the domain types shared by the client SDK and the CLI.

pub mod order;
pub mod query;
pub mod user;

pub use order::{Order, OrderStatus, StatusFilter, StatusParseError};
pub use query::{DEFAULT_PAGE_SIZE, OrdersQuery, Paged, total_pages};
pub use user::{AuthResponse, ProfileUpdate, RegisterRequest, User};
