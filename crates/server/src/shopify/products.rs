//! Product reads.

use serde_json::Value;
use shelfmark_core::ProductId;

use super::{
    AdminRestClient, ShopifyError,
    types::{Product, ProductEnvelope},
};

impl AdminRestClient {
    /// Fetch `products.json` as returned by Shopify.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::Api` on a non-success status.
    pub async fn list_products(&self) -> Result<Value, ShopifyError> {
        self.get("products.json").await?.success()?.json()
    }

    /// Fetch one product with its variants.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::Api` on a non-success status.
    pub async fn get_product(&self, product_id: ProductId) -> Result<Product, ShopifyError> {
        let envelope: ProductEnvelope = self
            .get(&format!("products/{product_id}.json"))
            .await?
            .success()?
            .json()?;
        Ok(envelope.product)
    }
}
