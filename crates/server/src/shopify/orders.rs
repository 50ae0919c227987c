//! Order listing.

use serde_json::Value;
use shelfmark_core::{CustomerId, Email};
use tracing::instrument;

use super::{
    AdminRestClient, ShopifyError,
    types::{Order, OrderList},
};

impl AdminRestClient {
    /// Fetch `orders.json` as returned by Shopify, optionally filtered to a
    /// single customer.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::Api` on a non-success status.
    pub async fn list_orders(&self, customer_id: Option<CustomerId>) -> Result<Value, ShopifyError> {
        let path = match customer_id {
            Some(id) => format!("orders.json?customer_id={id}"),
            None => "orders.json".to_string(),
        };
        self.get(&path).await?.success()?.json()
    }

    /// Fetch the orders placed with an email address.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::Api` on a non-success status, or
    /// `ShopifyError::Parse` if an order cannot be read.
    #[instrument(skip(self), fields(email = %email))]
    pub async fn orders_by_email(&self, email: &Email) -> Result<Vec<Order>, ShopifyError> {
        let path = format!(
            "orders.json?email={}",
            urlencoding::encode(email.as_str())
        );
        let list: OrderList = self.get(&path).await?.success()?.json()?;
        Ok(list.orders)
    }
}
