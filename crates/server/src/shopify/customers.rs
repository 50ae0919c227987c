//! Customer lookup and creation.

use serde_json::{Value, json};
use shelfmark_core::{CustomerId, Email};
use tracing::instrument;

use super::{
    AdminRestClient, ShopifyError,
    types::{CreatedCustomer, CustomerEnvelope, CustomerSearch},
};

impl AdminRestClient {
    /// Resolve an email address to a customer id.
    ///
    /// Shopify may hold several customers with one email; the first search
    /// hit wins.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::NotFound` when no customer matches, or
    /// `ShopifyError::Api` when the search itself fails.
    #[instrument(skip(self), fields(email = %email))]
    pub async fn find_customer_by_email(&self, email: &Email) -> Result<CustomerId, ShopifyError> {
        let path = format!(
            "customers/search.json?query=email:{}",
            urlencoding::encode(email.as_str())
        );
        let search: CustomerSearch = self.get(&path).await?.success()?.json()?;

        search
            .customers
            .first()
            .map(|customer| customer.id)
            .ok_or_else(|| ShopifyError::NotFound("Customer not found".to_string()))
    }

    /// Fetch `customers.json` as returned by Shopify.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::Api` on a non-success status.
    pub async fn list_customers(&self) -> Result<Value, ShopifyError> {
        self.get("customers.json").await?.success()?.json()
    }

    /// Create a customer from raw Shopify customer fields.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::Api` with the upstream status when Shopify
    /// rejects the customer. The message is the first validation error
    /// flattened to `"{field} {message}"` when one is present.
    #[instrument(skip_all)]
    pub async fn create_customer(&self, fields: &Value) -> Result<CreatedCustomer, ShopifyError> {
        let response = self
            .post("customers.json", &json!({ "customer": fields }))
            .await?;

        if !response.ok {
            return Err(ShopifyError::Api {
                status: response.status.as_u16(),
                message: first_validation_error(&response.raw)
                    .unwrap_or_else(|| "Failed to create customer".to_string()),
            });
        }

        let envelope: CustomerEnvelope = response.json()?;
        Ok(envelope.customer)
    }
}

/// Flatten Shopify's `{"errors": {"field": ["message", ...]}}` into
/// `"field message"`.
fn first_validation_error(raw: &str) -> Option<String> {
    let body: Value = serde_json::from_str(raw).ok()?;
    let errors = body.get("errors")?;

    match errors {
        Value::Object(fields) => {
            let (field, messages) = fields.iter().next()?;
            let message = match messages {
                Value::Array(list) => list.first()?.as_str()?.to_string(),
                Value::String(s) => s.clone(),
                _ => return None,
            };
            Some(format!("{field} {message}"))
        }
        Value::String(message) => Some(message.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_validation_error_flattens_field() {
        let raw = r#"{"errors":{"email":["has already been taken"],"phone":["is invalid"]}}"#;
        assert_eq!(
            first_validation_error(raw).as_deref(),
            Some("email has already been taken")
        );
    }

    #[test]
    fn test_first_validation_error_plain_string() {
        let raw = r#"{"errors":"Not Found"}"#;
        assert_eq!(first_validation_error(raw).as_deref(), Some("Not Found"));
    }

    #[test]
    fn test_first_validation_error_unusable_body() {
        assert_eq!(first_validation_error("<html>"), None);
        assert_eq!(first_validation_error(r#"{"ok":true}"#), None);
        assert_eq!(first_validation_error(r#"{"errors":{}}"#), None);
    }
}
