//! Per-variant detail lists.
//!
//! Products carry rich-text metafields named `quantity_{n}_details`. A
//! variant whose title contains the number `n` (e.g. "6 Pack") is paired with
//! the flattened list items of that metafield.

use serde::Serialize;
use serde_json::Value;

use crate::shopify::{Metafield, Product};

/// One variant with its detail list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantDetails {
    pub variant_title: String,
    pub variant_price: Option<String>,
    pub metafield_key: Option<String>,
    pub metafield_items: Vec<String>,
}

/// Pair every variant of `product` with its detail list.
#[must_use]
pub fn variant_details(product: &Product, metafields: &[Metafield]) -> Vec<VariantDetails> {
    product
        .variants
        .iter()
        .map(|variant| {
            let metafield_key = first_number(&variant.title).map(detail_key);
            let metafield_items = metafield_key
                .as_deref()
                .and_then(|key| metafields.iter().find(|m| m.key == key))
                .and_then(Metafield::value_text)
                .map(|raw| extract_list_items(&raw))
                .unwrap_or_default();

            VariantDetails {
                variant_title: variant.title.clone(),
                variant_price: variant.price.clone(),
                metafield_key,
                metafield_items,
            }
        })
        .collect()
}

/// Metafield key for a quantity.
#[must_use]
pub fn detail_key(quantity: &str) -> String {
    format!("quantity_{quantity}_details")
}

/// The first run of ASCII digits in `text`.
#[must_use]
pub fn first_number(text: &str) -> Option<&str> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let rest = text.get(start..)?;
    let len = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    rest.get(..len)
}

/// Flatten the first list of a rich-text document into its item strings.
///
/// Expects `{"children": [{"children": [{"children": [{"value": "..."}]}, ...]}]}`.
/// Anything that does not parse yields an empty list; empty items are skipped.
#[must_use]
pub fn extract_list_items(rich_text: &str) -> Vec<String> {
    let Ok(root) = serde_json::from_str::<Value>(rich_text) else {
        return Vec::new();
    };

    root.pointer("/children/0/children")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.pointer("/children/0/value")?.as_str())
                .filter(|text| !text.is_empty())
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default()
}
