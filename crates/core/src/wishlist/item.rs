//! Wishlist items and identity matching.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field holding the product title, the primary identity of an item.
const PRODUCT_TITLE: &str = "productTitle";
/// Optional field holding the Shopify variant id.
const VARIANT_ID: &str = "variantId";

/// Errors raised when a client-supplied item is unusable.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ItemError {
    /// The item is not a JSON object.
    #[error("wishlist item must be a JSON object")]
    NotAnObject,
    /// The item has no non-empty `productTitle` string.
    #[error("wishlist item requires a productTitle")]
    MissingTitle,
}

/// Normalize a product title into its identity key.
///
/// Apostrophes are stripped and the result is lowercased, so
/// `"Baker's Dozen"` and `"bakers dozen"` refer to the same product.
#[must_use]
pub fn normalize_title(title: &str) -> String {
    title.replace('\'', "").to_lowercase()
}

/// A product reference stored in a wishlist bucket.
///
/// The item is an opaque JSON object: fields other than `productTitle` and
/// `variantId` are carried through untouched and in their original order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WishlistItem(Map<String, Value>);

impl WishlistItem {
    /// Build an item from client input.
    ///
    /// # Errors
    ///
    /// Returns [`ItemError`] if the value is not an object or lacks a
    /// non-empty `productTitle`.
    pub fn from_value(value: Value) -> Result<Self, ItemError> {
        let Value::Object(fields) = value else {
            return Err(ItemError::NotAnObject);
        };
        let item = Self(fields);
        match item.product_title() {
            Some(title) if !title.trim().is_empty() => Ok(item),
            _ => Err(ItemError::MissingTitle),
        }
    }

    /// Wrap a stored object without validation.
    ///
    /// Stored documents may predate title validation; such items are kept
    /// but never match an identity key.
    #[must_use]
    pub const fn from_stored(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// The raw `productTitle`, if present.
    #[must_use]
    pub fn product_title(&self) -> Option<&str> {
        self.0.get(PRODUCT_TITLE).and_then(Value::as_str)
    }

    /// The identity key derived from `productTitle`.
    #[must_use]
    pub fn identity_key(&self) -> Option<String> {
        self.product_title().map(normalize_title)
    }

    /// The variant id in canonical string form.
    ///
    /// Numbers, numeric strings and GraphQL global ids all collapse to the
    /// trailing numeric segment so `4411`, `"4411"` and
    /// `"gid://shopify/ProductVariant/4411"` compare equal.
    #[must_use]
    pub fn variant_id(&self) -> Option<String> {
        match self.0.get(VARIANT_ID)? {
            Value::Number(n) => Some(n.to_string()),
            Value::String(s) => canonical_variant_id(s),
            _ => None,
        }
    }

    /// Borrow the underlying JSON fields.
    #[must_use]
    pub const fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

fn canonical_variant_id(raw: &str) -> Option<String> {
    let tail = raw.rsplit('/').next().unwrap_or(raw).trim();
    (!tail.is_empty()).then(|| tail.to_owned())
}

/// Criteria for locating an item inside a bucket.
///
/// When both the selector and the item carry a variant id, variant equality
/// decides. Otherwise the normalized titles are compared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSelector {
    title_key: Option<String>,
    variant_id: Option<String>,
}

impl ItemSelector {
    /// Build a selector from request fields. Blank values are ignored.
    ///
    /// Returns `None` when neither a title nor a variant id was supplied.
    #[must_use]
    pub fn new(product_title: Option<&str>, variant_id: Option<&str>) -> Option<Self> {
        let title_key = product_title
            .filter(|t| !t.trim().is_empty())
            .map(normalize_title);
        let variant_id = variant_id.and_then(canonical_variant_id);

        if title_key.is_none() && variant_id.is_none() {
            return None;
        }
        Some(Self {
            title_key,
            variant_id,
        })
    }

    /// Select by title only, ignoring variants.
    #[must_use]
    pub fn title(product_title: &str) -> Self {
        Self {
            title_key: Some(normalize_title(product_title)),
            variant_id: None,
        }
    }

    /// Whether `item` is the product this selector refers to.
    #[must_use]
    pub fn matches(&self, item: &WishlistItem) -> bool {
        if let (Some(wanted), Some(actual)) = (&self.variant_id, item.variant_id()) {
            return *wanted == actual;
        }
        match (&self.title_key, item.identity_key()) {
            (Some(wanted), Some(actual)) => *wanted == actual,
            _ => false,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn item(value: Value) -> WishlistItem {
        WishlistItem::from_value(value).unwrap()
    }

    #[test]
    fn test_normalize_title() {
        assert_eq!(normalize_title("Baker's Dozen"), "bakers dozen");
        assert_eq!(normalize_title("RED MUG"), "red mug");
    }

    #[test]
    fn test_from_value_requires_title() {
        assert_eq!(
            WishlistItem::from_value(json!({"variantId": 1})),
            Err(ItemError::MissingTitle)
        );
        assert_eq!(
            WishlistItem::from_value(json!({"productTitle": "  "})),
            Err(ItemError::MissingTitle)
        );
        assert_eq!(
            WishlistItem::from_value(json!("Red Mug")),
            Err(ItemError::NotAnObject)
        );
    }

    #[test]
    fn test_unknown_fields_round_trip_in_order() {
        let raw = r#"{"productTitle":"Red Mug","price":"12.00","image":{"src":"a.png"}}"#;
        let parsed: WishlistItem = serde_json::from_str(raw).unwrap();
        assert_eq!(serde_json::to_string(&parsed).unwrap(), raw);
    }

    #[test]
    fn test_variant_id_forms_are_equivalent() {
        let numeric = item(json!({"productTitle": "A", "variantId": 4411}));
        let gid = item(json!({"productTitle": "A", "variantId": "gid://shopify/ProductVariant/4411"}));
        assert_eq!(numeric.variant_id(), gid.variant_id());
    }

    #[test]
    fn test_selector_prefers_variant_when_both_present() {
        let stored = item(json!({"productTitle": "Red Mug", "variantId": 1}));
        let same_title_other_variant = ItemSelector::new(Some("Red Mug"), Some("2")).unwrap();
        assert!(!same_title_other_variant.matches(&stored));

        let variant_only = ItemSelector::new(None, Some("1")).unwrap();
        assert!(variant_only.matches(&stored));
    }

    #[test]
    fn test_selector_falls_back_to_title() {
        let stored = item(json!({"productTitle": "Baker's Dozen"}));
        let selector = ItemSelector::new(Some("BAKERS DOZEN"), Some("99")).unwrap();
        assert!(selector.matches(&stored));
    }

    #[test]
    fn test_selector_needs_some_criteria() {
        assert!(ItemSelector::new(None, None).is_none());
        assert!(ItemSelector::new(Some(""), Some(" ")).is_none());
    }

    #[test]
    fn test_untitled_stored_item_never_matches_title() {
        let stored = WishlistItem::from_stored(Map::new());
        assert!(!ItemSelector::title("").matches(&stored));
    }
}
