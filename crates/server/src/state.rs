//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::services::WishlistService;
use crate::shopify::{AdminRestClient, ShopifyError};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. It is immutable after
/// startup: there is no cache and no per-customer state.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    shopify: AdminRestClient,
    wishlist: WishlistService<AdminRestClient>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the Shopify client cannot be built from the
    /// configuration.
    pub fn new(config: ServerConfig) -> Result<Self, ShopifyError> {
        let shopify = AdminRestClient::new(&config.shopify)?;
        let wishlist = WishlistService::new(shopify.clone(), config.removal_scope);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                shopify,
                wishlist,
            }),
        })
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the Shopify Admin API client.
    #[must_use]
    pub fn shopify(&self) -> &AdminRestClient {
        &self.inner.shopify
    }

    /// Get a reference to the wishlist service.
    #[must_use]
    pub fn wishlist(&self) -> &WishlistService<AdminRestClient> {
        &self.inner.wishlist
    }
}
