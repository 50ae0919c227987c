//! Shelfmark Core - Shared types library.
//!
//! This crate provides the types used by the Shelfmark proxy:
//! - `server` - JSON API in front of the Shopify Admin API
//! - `integration-tests` - End-to-end tests against a fake Shopify
//!
//! # Architecture
//!
//! The core crate contains only types and algorithms - no I/O, no HTTP
//! clients, no logging. Everything here can be exercised with plain unit
//! tests; the server crate owns fetching and persisting.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for Shopify IDs and emails
//! - [`wishlist`] - The bucketed wishlist document and its mutations

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;
pub mod wishlist;

pub use types::*;
