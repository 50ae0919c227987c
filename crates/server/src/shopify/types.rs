//! Admin REST API payload types.
//!
//! Only the fields this service reads are modeled; Shopify sends many more
//! and serde ignores them.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shelfmark_core::{CustomerId, MetafieldId, OrderId};

// =============================================================================
// Metafields
// =============================================================================

/// Metafield type for JSON-encoded values.
pub const METAFIELD_TYPE_JSON: &str = "json";
/// Metafield type for single-line text.
pub const METAFIELD_TYPE_SINGLE_LINE: &str = "single_line_text_field";
/// Metafield type for multi-line text.
pub const METAFIELD_TYPE_MULTI_LINE: &str = "multi_line_text_field";

/// A metafield attached to a Shopify resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metafield {
    pub id: MetafieldId,
    pub namespace: String,
    pub key: String,
    /// Stored value. Shopify returns text for most types but may inline
    /// numbers and booleans.
    #[serde(default)]
    pub value: Value,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl Metafield {
    /// Whether this metafield lives at `namespace.key`.
    #[must_use]
    pub fn is(&self, namespace: &str, key: &str) -> bool {
        self.namespace == namespace && self.key == key
    }

    /// The value as text, or `None` when empty or null.
    #[must_use]
    pub fn value_text(&self) -> Option<String> {
        match &self.value {
            Value::Null => None,
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// A metafield to create or overwrite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewMetafield {
    pub namespace: String,
    pub key: String,
    pub value: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl NewMetafield {
    /// Build a metafield payload.
    #[must_use]
    pub fn new(namespace: &str, key: &str, value: impl Into<String>, kind: &str) -> Self {
        Self {
            namespace: namespace.to_owned(),
            key: key.to_owned(),
            value: value.into(),
            kind: kind.to_owned(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct MetafieldList {
    #[serde(default)]
    pub metafields: Vec<Metafield>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MetafieldEnvelope {
    pub metafield: Metafield,
}

// =============================================================================
// Customers
// =============================================================================

/// Minimal customer record returned by customer search.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomerSummary {
    pub id: CustomerId,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CustomerSearch {
    #[serde(default)]
    pub customers: Vec<CustomerSummary>,
}

/// Customer record returned after creation.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedCustomer {
    pub id: Option<CustomerId>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(default)]
    pub addresses: Vec<CustomerAddress>,
}

/// A customer mailing address.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomerAddress {
    pub address1: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CustomerEnvelope {
    pub customer: CreatedCustomer,
}

// =============================================================================
// Orders
// =============================================================================

/// An order as returned by `orders.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub name: Option<String>,
    pub created_at: DateTime<FixedOffset>,
    pub financial_status: Option<String>,
    pub total_price: Option<String>,
    pub currency: Option<String>,
    #[serde(default)]
    pub payment_gateway_names: Vec<String>,
    pub customer: Option<OrderCustomer>,
    #[serde(default)]
    pub line_items: Vec<LineItem>,
    pub order_status_url: Option<String>,
}

/// The customer embedded in an order.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderCustomer {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

/// A line item in an order.
#[derive(Debug, Clone, Deserialize)]
pub struct LineItem {
    pub title: Option<String>,
    pub variant_title: Option<String>,
    pub quantity: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OrderList {
    #[serde(default)]
    pub orders: Vec<Order>,
}

// =============================================================================
// Products
// =============================================================================

/// A product with its variants.
#[derive(Debug, Clone, Deserialize)]
pub struct Product {
    #[serde(default)]
    pub variants: Vec<ProductVariant>,
}

/// A product variant.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductVariant {
    #[serde(default)]
    pub title: String,
    /// Decimal price as sent by Shopify (e.g. `"19.99"`).
    pub price: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProductEnvelope {
    pub product: Product,
}
