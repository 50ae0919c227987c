//! Customer and product metafields.

use serde_json::json;
use shelfmark_core::{CustomerId, MetafieldId, ProductId};
use tracing::instrument;

use super::{
    AdminRestClient, ShopifyError,
    types::{Metafield, MetafieldEnvelope, MetafieldList, NewMetafield},
};

impl AdminRestClient {
    /// List every metafield on a customer.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::Api` on a non-success status.
    #[instrument(skip(self), fields(customer_id = %customer_id))]
    pub async fn list_customer_metafields(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Metafield>, ShopifyError> {
        let list: MetafieldList = self
            .get(&format!("customers/{customer_id}/metafields.json"))
            .await?
            .success()?
            .json()?;
        Ok(list.metafields)
    }

    /// Create a metafield on a customer.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::Api` on a non-success status.
    #[instrument(skip(self, metafield), fields(customer_id = %customer_id, key = %metafield.key))]
    pub async fn create_customer_metafield(
        &self,
        customer_id: CustomerId,
        metafield: &NewMetafield,
    ) -> Result<Metafield, ShopifyError> {
        let envelope: MetafieldEnvelope = self
            .post(
                &format!("customers/{customer_id}/metafields.json"),
                &json!({ "metafield": metafield }),
            )
            .await?
            .success()?
            .json()?;
        Ok(envelope.metafield)
    }

    /// Overwrite an existing customer metafield's value.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::Api` on a non-success status.
    #[instrument(skip(self, metafield), fields(customer_id = %customer_id, metafield_id = %metafield_id))]
    pub async fn update_customer_metafield(
        &self,
        customer_id: CustomerId,
        metafield_id: MetafieldId,
        metafield: &NewMetafield,
    ) -> Result<(), ShopifyError> {
        self.put(
            &format!("customers/{customer_id}/metafields/{metafield_id}.json"),
            &json!({
                "metafield": {
                    "id": metafield_id,
                    "value": metafield.value,
                    "type": metafield.kind,
                }
            }),
        )
        .await?
        .success()?;
        Ok(())
    }

    /// List every metafield on a product.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::Api` on a non-success status.
    pub async fn list_product_metafields(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<Metafield>, ShopifyError> {
        let list: MetafieldList = self
            .get(&format!("products/{product_id}/metafields.json"))
            .await?
            .success()?
            .json()?;
        Ok(list.metafields)
    }
}
