//! Typed request builders over [`ApiClient`](crate::http::ApiClient).
//!
//! Each operation is pure path/payload shaping: one client call with a fixed
//! method, path, and query encoding. No state lives here.

pub mod auth;
pub mod orders;
pub mod profile;

pub use auth::AuthApi;
pub use orders::{CsvDownload, OrdersApi};
pub use profile::ProfileApi;
