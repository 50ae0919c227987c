//! Shelfmark server library.
//!
//! The router, services and Shopify client are exposed as a library so the
//! integration tests can drive the real application in-process.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod shopify;
pub mod state;

pub use routes::app;
pub use state::AppState;
