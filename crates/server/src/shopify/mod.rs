//! Shopify Admin REST API client.
//!
//! # Architecture
//!
//! - One [`AdminRestClient`] wraps a shared `reqwest::Client`
//! - Every call goes through [`AdminRestClient::request`], which returns a
//!   uniform [`RemoteResponse`] envelope and never fails on a non-2xx status
//! - Resource helpers (customers, metafields, orders, products) decide which
//!   statuses are errors and parse the body
//! - Shopify is the only store: no caching, no retries, no local sync
//!
//! # Example
//!
//! ```rust,ignore
//! use shelfmark_server::shopify::AdminRestClient;
//!
//! let client = AdminRestClient::new(&config.shopify)?;
//!
//! let customer_id = client.find_customer_by_email(&email).await?;
//! let metafields = client.list_customer_metafields(customer_id).await?;
//! ```

mod client;
mod customers;
mod metafields;
mod orders;
mod products;
pub mod types;

pub use client::{AdminRestClient, RemoteResponse};
pub use types::*;

use thiserror::Error;

/// Errors that can occur when interacting with the Shopify Admin API.
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Shopify answered with a non-success status.
    #[error("Shopify returned {status}: {message}")]
    Api {
        /// HTTP status code returned by Shopify.
        status: u16,
        /// Response body or a summary of it.
        message: String,
    },

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Client configuration is unusable.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ShopifyError {
    /// The upstream HTTP status, if Shopify responded at all.
    #[must_use]
    pub const fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
