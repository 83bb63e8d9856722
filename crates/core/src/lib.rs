//! Foody Core - Shared domain types.
//!
//! This crate provides the common types used across the Foody portal
//! components:
//! - `client` - Portal SDK (HTTP client, token store, archive view state)
//! - `cli` - Terminal front-end for the portal
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. Everything
//! here is a faithful projection of the portal's REST wire format, so the
//! serde attributes (camelCase field renames, snake_case status values) are
//! part of the contract, not a styling choice.
//!
//! # Modules
//!
//! - [`types`] - Orders, users, queries, and paged result envelopes

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
