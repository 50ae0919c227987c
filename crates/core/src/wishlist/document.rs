//! The wishlist document and its mutations.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use super::bucket::{BucketError, BucketName};
use super::item::{ItemSelector, WishlistItem, normalize_title};

/// Problems found while reading a stored document.
///
/// None of these fail a read: the offending part is dropped (or the whole
/// document replaced by an empty one) and the warning is handed back so the
/// caller can log it.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadWarning {
    /// The stored value is not valid JSON.
    #[error("stored wishlist is not valid JSON: {0}")]
    Malformed(String),
    /// The stored value is JSON but not an object.
    #[error("stored wishlist is not a JSON object")]
    NotAnObject,
    /// A bucket key is blank.
    #[error("dropped bucket with blank name")]
    BlankBucketName,
    /// A bucket value is not a list.
    #[error("dropped bucket '{0}': value is not a list")]
    BucketNotAList(String),
    /// A bucket entry is not an object.
    #[error("dropped non-object entry in bucket '{0}'")]
    ItemNotAnObject(String),
    /// Two keys collapsed to the same bucket after lowercasing.
    #[error("merged bucket keys that differ only by case into '{0}'")]
    MergedBucket(String),
    /// A bucket listed the same product twice.
    #[error("dropped duplicate '{title}' in bucket '{bucket}'")]
    DuplicateItem {
        /// Bucket holding the duplicate.
        bucket: String,
        /// Title of the dropped entry.
        title: String,
    },
}

/// How a bucket-scoped `remove` is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RemovalScope {
    /// Remove from the named bucket, and from `"all"` only if no other
    /// bucket still holds the item.
    #[default]
    Bucket,
    /// Always remove from every bucket, whatever bucket was named.
    Global,
}

/// Error parsing a [`RemovalScope`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown removal scope '{0}' (expected 'bucket' or 'global')")]
pub struct RemovalScopeError(String);

impl std::str::FromStr for RemovalScope {
    type Err = RemovalScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bucket" => Ok(Self::Bucket),
            "global" => Ok(Self::Global),
            other => Err(RemovalScopeError(other.to_owned())),
        }
    }
}

/// Result of [`WishlistDocument::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// The item was appended.
    Added,
    /// The bucket already held the item; nothing changed.
    AlreadyPresent,
}

/// Result of [`WishlistDocument::toggle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The item was not in the bucket and has been added.
    Added,
    /// The item was in the bucket and has been removed.
    Removed,
}

impl ToggleOutcome {
    /// Whether the item is wished after the toggle.
    #[must_use]
    pub const fn is_wished(self) -> bool {
        matches!(self, Self::Added)
    }
}

/// Result of [`WishlistDocument::replace_bucket`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplaceOutcome {
    /// Requested titles that matched no item in any bucket.
    pub unresolved: Vec<String>,
}

/// A customer's bucketed wishlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WishlistDocument {
    buckets: IndexMap<String, Vec<WishlistItem>>,
}

impl Default for WishlistDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl WishlistDocument {
    /// An empty document: `{"all": []}`.
    #[must_use]
    pub fn new() -> Self {
        let mut buckets = IndexMap::new();
        buckets.insert(BucketName::ALL.to_owned(), Vec::new());
        Self { buckets }
    }

    /// Parse a stored document, recovering from anything malformed.
    ///
    /// Invalid JSON or a non-object value yields an empty document. Bucket
    /// keys are lowercased (colliding keys are merged), `"all"` is created if
    /// missing and moved first, and duplicate items are dropped.
    #[must_use]
    pub fn parse_lenient(raw: &str) -> (Self, Vec<LoadWarning>) {
        let mut warnings = Vec::new();
        let document = match serde_json::from_str::<Value>(raw) {
            Ok(value) => Self::from_value(value, &mut warnings),
            Err(e) => {
                warnings.push(LoadWarning::Malformed(e.to_string()));
                Self::new()
            }
        };
        (document, warnings)
    }

    fn from_value(value: Value, warnings: &mut Vec<LoadWarning>) -> Self {
        let Value::Object(fields) = value else {
            warnings.push(LoadWarning::NotAnObject);
            return Self::new();
        };

        let mut buckets: IndexMap<String, Vec<WishlistItem>> = IndexMap::new();
        for (key, entries) in fields {
            let Ok(name) = BucketName::parse(&key) else {
                warnings.push(LoadWarning::BlankBucketName);
                continue;
            };
            let Value::Array(entries) = entries else {
                warnings.push(LoadWarning::BucketNotAList(key));
                continue;
            };

            let name = String::from(name);
            if buckets.contains_key(&name) {
                warnings.push(LoadWarning::MergedBucket(name.clone()));
            }
            let items = buckets.entry(name.clone()).or_default();

            for entry in entries {
                let Value::Object(entry) = entry else {
                    warnings.push(LoadWarning::ItemNotAnObject(name.clone()));
                    continue;
                };
                let item = WishlistItem::from_stored(entry);
                let title = item.product_title().unwrap_or_default().to_owned();
                if !push_unique(items, item) {
                    warnings.push(LoadWarning::DuplicateItem {
                        bucket: name.clone(),
                        title,
                    });
                }
            }
        }

        let mut document = Self { buckets };
        document.ensure_all_first();
        document
    }

    fn ensure_all_first(&mut self) {
        match self.buckets.get_index_of(BucketName::ALL) {
            Some(0) => {}
            Some(index) => self.buckets.move_index(index, 0),
            None => {
                self.buckets
                    .shift_insert(0, BucketName::ALL.to_owned(), Vec::new());
            }
        }
    }

    /// Items in the `"all"` bucket.
    #[must_use]
    pub fn all(&self) -> &[WishlistItem] {
        self.buckets
            .get(BucketName::ALL)
            .map_or(&[], Vec::as_slice)
    }

    /// Items in `name`, if the bucket exists.
    #[must_use]
    pub fn bucket(&self, name: &BucketName) -> Option<&[WishlistItem]> {
        self.buckets.get(name.as_str()).map(Vec::as_slice)
    }

    /// Whether the bucket exists.
    #[must_use]
    pub fn has_bucket(&self, name: &BucketName) -> bool {
        self.buckets.contains_key(name.as_str())
    }

    /// Bucket names in serialization order (`"all"` first).
    pub fn bucket_names(&self) -> impl Iterator<Item = &str> {
        self.buckets.keys().map(String::as_str)
    }

    /// The document as a JSON object with `"all"` first.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut fields = Map::with_capacity(self.buckets.len());
        fields.insert(BucketName::ALL.to_owned(), items_to_value(self.all()));
        for (name, items) in self.named_buckets() {
            fields.insert(name.to_owned(), items_to_value(items));
        }
        Value::Object(fields)
    }

    /// The document as a compact JSON string, the form stored in Shopify.
    #[must_use]
    pub fn to_json_string(&self) -> String {
        self.to_value().to_string()
    }

    fn named_buckets(&self) -> impl Iterator<Item = (&str, &[WishlistItem])> {
        self.buckets
            .iter()
            .filter(|(name, _)| name.as_str() != BucketName::ALL)
            .map(|(name, items)| (name.as_str(), items.as_slice()))
    }

    fn bucket_mut(&mut self, name: &BucketName) -> &mut Vec<WishlistItem> {
        self.buckets.entry(name.as_str().to_owned()).or_default()
    }

    fn all_mut(&mut self) -> &mut Vec<WishlistItem> {
        self.bucket_mut(&BucketName::all())
    }

    fn bucket_contains(&self, name: &BucketName, selector: &ItemSelector) -> bool {
        self.bucket(name)
            .is_some_and(|items| items.iter().any(|item| selector.matches(item)))
    }

    /// Add `item` to `bucket` and to `"all"`.
    ///
    /// A no-op if `bucket` already holds a product with the same title.
    /// Items are never duplicated in `"all"`.
    pub fn add(&mut self, bucket: &BucketName, item: WishlistItem) -> AddOutcome {
        let selector = title_selector(&item);
        if self.bucket_contains(bucket, &selector) {
            return AddOutcome::AlreadyPresent;
        }
        self.insert(bucket, item);
        AddOutcome::Added
    }

    /// Add `item` if `bucket` lacks it, otherwise remove it.
    ///
    /// Removal follows bucket-scoped [`remove`](Self::remove): the product
    /// stays in `"all"` while another named bucket still holds it, and
    /// toggling it off in `"all"` clears it everywhere.
    pub fn toggle(&mut self, bucket: &BucketName, item: WishlistItem) -> ToggleOutcome {
        let selector = title_selector(&item);
        if self.bucket_contains(bucket, &selector) {
            self.remove(&selector, Some(bucket), RemovalScope::Bucket);
            return ToggleOutcome::Removed;
        }
        self.insert(bucket, item);
        ToggleOutcome::Added
    }

    fn insert(&mut self, bucket: &BucketName, item: WishlistItem) {
        if !bucket.is_all() {
            push_unique(self.bucket_mut(bucket), item.clone());
        }
        push_unique(self.all_mut(), item);
    }

    /// Remove the selected product.
    ///
    /// With no bucket, the `"all"` bucket, or [`RemovalScope::Global`], the
    /// product is removed from every bucket. Otherwise it is removed from
    /// `bucket`, and from `"all"` only if no other named bucket still holds
    /// it.
    ///
    /// Returns the number of entries removed across all buckets.
    pub fn remove(
        &mut self,
        selector: &ItemSelector,
        bucket: Option<&BucketName>,
        scope: RemovalScope,
    ) -> usize {
        let before = self.entry_count();

        match bucket {
            Some(name) if !name.is_all() && scope == RemovalScope::Bucket => {
                let held_elsewhere = self.named_buckets().any(|(other, items)| {
                    other != name.as_str() && items.iter().any(|i| selector.matches(i))
                });
                if let Some(items) = self.buckets.get_mut(name.as_str()) {
                    items.retain(|i| !selector.matches(i));
                }
                if !held_elsewhere {
                    self.all_mut().retain(|i| !selector.matches(i));
                }
            }
            _ => {
                for items in self.buckets.values_mut() {
                    items.retain(|i| !selector.matches(i));
                }
            }
        }

        before - self.entry_count()
    }

    fn entry_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// Create an empty bucket. Returns `false` if it already existed.
    pub fn create_bucket(&mut self, name: &BucketName) -> bool {
        if self.has_bucket(name) {
            return false;
        }
        self.buckets.insert(name.as_str().to_owned(), Vec::new());
        true
    }

    /// Delete a bucket. Its items stay in `"all"`.
    ///
    /// # Errors
    ///
    /// Returns [`BucketError::Reserved`] for `"all"` and
    /// [`BucketError::NotFound`] if the bucket does not exist.
    pub fn remove_bucket(&mut self, name: &BucketName) -> Result<Vec<WishlistItem>, BucketError> {
        if name.is_all() {
            return Err(BucketError::Reserved);
        }
        self.buckets
            .shift_remove(name.as_str())
            .ok_or_else(|| BucketError::NotFound(name.to_string()))
    }

    /// Replace the contents of `name` with the products named by `titles`.
    ///
    /// Each title is resolved against items already in the document (first
    /// match in bucket order wins); unknown titles are skipped and reported.
    /// Replacing `"all"` also prunes every named bucket down to the requested
    /// titles. Replacing a named bucket adds any resolved item missing from
    /// `"all"`.
    pub fn replace_bucket<S: AsRef<str>>(
        &mut self,
        name: &BucketName,
        titles: &[S],
    ) -> ReplaceOutcome {
        let mut catalog: HashMap<String, &WishlistItem> = HashMap::new();
        for item in self.buckets.values().flatten() {
            if let Some(key) = item.identity_key() {
                catalog.entry(key).or_insert(item);
            }
        }

        let mut outcome = ReplaceOutcome::default();
        let mut placed = HashSet::new();
        let mut replacement = Vec::with_capacity(titles.len());
        for title in titles {
            let title = title.as_ref();
            let key = normalize_title(title);
            if placed.contains(&key) {
                continue;
            }
            match catalog.get(&key) {
                Some(item) => {
                    replacement.push((*item).clone());
                    placed.insert(key);
                }
                None => outcome.unresolved.push(title.to_owned()),
            }
        }

        if name.is_all() {
            let wanted: HashSet<String> = titles
                .iter()
                .map(|title| normalize_title(title.as_ref()))
                .collect();
            for (bucket, items) in &mut self.buckets {
                if bucket != BucketName::ALL {
                    items.retain(|i| i.identity_key().is_some_and(|k| wanted.contains(&k)));
                }
            }
            *self.all_mut() = replacement;
        } else {
            for item in &replacement {
                push_unique(self.all_mut(), item.clone());
            }
            *self.bucket_mut(name) = replacement;
        }

        outcome
    }
}

/// Append `item` unless an entry with the same title is already present.
/// Untitled entries are always appended.
fn push_unique(items: &mut Vec<WishlistItem>, item: WishlistItem) -> bool {
    if item.identity_key().is_some() {
        let selector = title_selector(&item);
        if items.iter().any(|existing| selector.matches(existing)) {
            return false;
        }
    }
    items.push(item);
    true
}

fn title_selector(item: &WishlistItem) -> ItemSelector {
    ItemSelector::title(item.product_title().unwrap_or_default())
}

fn items_to_value(items: &[WishlistItem]) -> Value {
    Value::Array(
        items
            .iter()
            .map(|item| Value::Object(item.fields().clone()))
            .collect(),
    )
}

impl Serialize for WishlistDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.buckets.len()))?;
        map.serialize_entry(BucketName::ALL, self.all())?;
        for (name, items) in self.named_buckets() {
            map.serialize_entry(name, items)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for WishlistDocument {
    /// Deserialization is lenient, like [`WishlistDocument::parse_lenient`],
    /// but discards the warnings.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(value, &mut Vec::new()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use serde_json::json;

    use super::*;

    fn bucket(name: &str) -> BucketName {
        BucketName::parse(name).unwrap()
    }

    fn item(title: &str) -> WishlistItem {
        WishlistItem::from_value(json!({ "productTitle": title })).unwrap()
    }

    fn doc(value: Value) -> WishlistDocument {
        let (document, warnings) = WishlistDocument::parse_lenient(&value.to_string());
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
        document
    }

    fn titles(items: &[WishlistItem]) -> Vec<&str> {
        items.iter().filter_map(WishlistItem::product_title).collect()
    }

    // =========================================================================
    // Loading & serialization
    // =========================================================================

    #[test]
    fn test_new_document_is_all_only() {
        assert_eq!(WishlistDocument::new().to_json_string(), r#"{"all":[]}"#);
    }

    #[test]
    fn test_all_serialized_first() {
        let document = doc(json!({"gifts": [], "all": [], "later": []}));
        assert_eq!(
            document.bucket_names().collect::<Vec<_>>(),
            ["all", "gifts", "later"]
        );
        assert!(document.to_json_string().starts_with(r#"{"all":"#));
        assert!(serde_json::to_string(&document).unwrap().starts_with(r#"{"all":"#));
    }

    #[test]
    fn test_missing_all_is_created() {
        let document = doc(json!({"favorites": [{"productTitle": "Red Mug"}]}));
        assert!(document.all().is_empty());
        assert_eq!(document.bucket_names().next(), Some("all"));
    }

    #[test]
    fn test_malformed_json_degrades_to_empty() {
        let (document, warnings) = WishlistDocument::parse_lenient("{not json");
        assert_eq!(document, WishlistDocument::new());
        assert!(matches!(warnings[..], [LoadWarning::Malformed(_)]));

        let (document, warnings) = WishlistDocument::parse_lenient("[1,2]");
        assert_eq!(document, WishlistDocument::new());
        assert_eq!(warnings, [LoadWarning::NotAnObject]);
    }

    #[test]
    fn test_keys_lowercased_and_merged() {
        let raw = json!({
            "Favorites": [{"productTitle": "Red Mug"}],
            "favorites": [{"productTitle": "red mug"}, {"productTitle": "Tea Pot"}],
            "all": [],
        });
        let (document, warnings) = WishlistDocument::parse_lenient(&raw.to_string());
        assert_eq!(titles(document.bucket(&bucket("favorites")).unwrap()), ["Red Mug", "Tea Pot"]);
        assert!(warnings.contains(&LoadWarning::MergedBucket("favorites".to_string())));
        assert!(warnings.iter().any(|w| matches!(w, LoadWarning::DuplicateItem { .. })));
    }

    #[test]
    fn test_bad_shapes_are_dropped() {
        let raw = json!({"all": [1, {"productTitle": "A"}], "weird": "x"});
        let (document, warnings) = WishlistDocument::parse_lenient(&raw.to_string());
        assert_eq!(titles(document.all()), ["A"]);
        assert!(!document.has_bucket(&bucket("weird")));
        assert_eq!(warnings.len(), 2);
    }

    // =========================================================================
    // add / toggle
    // =========================================================================

    #[test]
    fn test_add_to_empty_document() {
        let mut document = WishlistDocument::new();
        let outcome = document.add(&bucket("favorites"), item("Red Mug"));

        assert_eq!(outcome, AddOutcome::Added);
        assert_eq!(
            document.to_value(),
            json!({"all": [{"productTitle": "Red Mug"}], "favorites": [{"productTitle": "Red Mug"}]})
        );
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut document = WishlistDocument::new();
        document.add(&bucket("favorites"), item("Red Mug"));
        let outcome = document.add(&bucket("Favorites"), item("RED MUG"));

        assert_eq!(outcome, AddOutcome::AlreadyPresent);
        assert_eq!(document.all().len(), 1);
        assert_eq!(document.bucket(&bucket("favorites")).unwrap().len(), 1);
    }

    #[test]
    fn test_add_to_second_bucket_does_not_duplicate_all() {
        let mut document = WishlistDocument::new();
        document.add(&bucket("favorites"), item("Red Mug"));
        assert_eq!(document.add(&bucket("gifts"), item("Red Mug")), AddOutcome::Added);

        assert_eq!(titles(document.all()), ["Red Mug"]);
        assert_eq!(titles(document.bucket(&bucket("gifts")).unwrap()), ["Red Mug"]);
    }

    #[test]
    fn test_add_to_all_only_touches_all() {
        let mut document = WishlistDocument::new();
        document.add(&BucketName::all(), item("Red Mug"));
        assert_eq!(document.to_value(), json!({"all": [{"productTitle": "Red Mug"}]}));
    }

    #[test]
    fn test_toggle_twice_restores_state() {
        let mut document = WishlistDocument::new();
        assert_eq!(
            document.toggle(&bucket("favorites"), item("Red Mug")),
            ToggleOutcome::Added
        );
        let outcome = document.toggle(&bucket("favorites"), item("Red Mug"));

        assert_eq!(outcome, ToggleOutcome::Removed);
        assert!(!outcome.is_wished());
        assert_eq!(document.to_value(), json!({"all": [], "favorites": []}));
    }

    #[test]
    fn test_toggle_matches_normalized_title() {
        let mut document = doc(json!({
            "all": [{"productTitle": "Baker's Dozen"}],
            "treats": [{"productTitle": "Baker's Dozen"}],
        }));
        let outcome = document.toggle(&bucket("TREATS"), item("bakers dozen"));
        assert_eq!(outcome, ToggleOutcome::Removed);
        assert!(document.all().is_empty());
    }

    #[test]
    fn test_toggle_off_keeps_all_when_held_elsewhere() {
        let mut document = doc(json!({
            "all": [{"productTitle": "Red Mug"}],
            "favorites": [{"productTitle": "Red Mug"}],
            "gifts": [{"productTitle": "Red Mug"}],
        }));
        let outcome = document.toggle(&bucket("gifts"), item("Red Mug"));

        assert_eq!(outcome, ToggleOutcome::Removed);
        assert_eq!(titles(document.all()), ["Red Mug"]);
        assert_eq!(titles(document.bucket(&bucket("favorites")).unwrap()), ["Red Mug"]);
        assert!(document.bucket(&bucket("gifts")).unwrap().is_empty());
    }

    #[test]
    fn test_toggle_off_in_all_clears_named_buckets() {
        let mut document = doc(json!({
            "all": [{"productTitle": "Red Mug"}],
            "favorites": [{"productTitle": "Red Mug"}],
        }));
        let outcome = document.toggle(&BucketName::all(), item("Red Mug"));

        assert_eq!(outcome, ToggleOutcome::Removed);
        assert_eq!(document.to_value(), json!({"all": [], "favorites": []}));
    }

    #[test]
    fn test_toggle_on_all_bucket() {
        let mut document = WishlistDocument::new();
        assert!(document.toggle(&BucketName::all(), item("Tea Pot")).is_wished());
        assert_eq!(titles(document.all()), ["Tea Pot"]);
        assert!(!document.toggle(&BucketName::all(), item("Tea Pot")).is_wished());
        assert!(document.all().is_empty());
    }

    // =========================================================================
    // remove
    // =========================================================================

    fn two_bucket_doc() -> WishlistDocument {
        doc(json!({
            "all": [{"productTitle": "Red Mug"}, {"productTitle": "Tea Pot"}],
            "favorites": [{"productTitle": "Red Mug"}],
            "gifts": [{"productTitle": "Red Mug"}, {"productTitle": "Tea Pot"}],
        }))
    }

    #[test]
    fn test_remove_from_all_clears_every_bucket() {
        let mut document = two_bucket_doc();
        let selector = ItemSelector::new(Some("red mug"), None).unwrap();
        let removed = document.remove(&selector, Some(&BucketName::all()), RemovalScope::Bucket);

        assert_eq!(removed, 3);
        assert_eq!(titles(document.all()), ["Tea Pot"]);
        assert!(document.bucket(&bucket("favorites")).unwrap().is_empty());
    }

    #[test]
    fn test_remove_without_bucket_is_global() {
        let mut document = two_bucket_doc();
        let selector = ItemSelector::new(Some("Red Mug"), None).unwrap();
        document.remove(&selector, None, RemovalScope::Bucket);
        assert_eq!(titles(document.all()), ["Tea Pot"]);
    }

    #[test]
    fn test_bucket_remove_keeps_all_when_held_elsewhere() {
        let mut document = two_bucket_doc();
        let selector = ItemSelector::new(Some("Red Mug"), None).unwrap();
        document.remove(&selector, Some(&bucket("favorites")), RemovalScope::Bucket);

        assert_eq!(titles(document.all()), ["Red Mug", "Tea Pot"]);
        assert!(document.bucket(&bucket("favorites")).unwrap().is_empty());
        assert_eq!(titles(document.bucket(&bucket("gifts")).unwrap()), ["Red Mug", "Tea Pot"]);
    }

    #[test]
    fn test_bucket_remove_drops_from_all_when_last_holder() {
        let mut document = two_bucket_doc();
        let selector = ItemSelector::new(Some("Tea Pot"), None).unwrap();
        document.remove(&selector, Some(&bucket("gifts")), RemovalScope::Bucket);
        assert_eq!(titles(document.all()), ["Red Mug"]);
    }

    #[test]
    fn test_global_scope_ignores_named_bucket() {
        let mut document = two_bucket_doc();
        let selector = ItemSelector::new(Some("Red Mug"), None).unwrap();
        document.remove(&selector, Some(&bucket("favorites")), RemovalScope::Global);
        assert!(document.bucket(&bucket("gifts")).unwrap().iter().all(|i| i.product_title() != Some("Red Mug")));
    }

    #[test]
    fn test_remove_by_variant_id() {
        let mut document = doc(json!({
            "all": [{"productTitle": "Mug", "variantId": 1}, {"productTitle": "Jug", "variantId": 2}],
        }));
        let selector = ItemSelector::new(Some("Mug"), Some("gid://shopify/ProductVariant/2")).unwrap();
        assert_eq!(document.remove(&selector, None, RemovalScope::Bucket), 1);
        assert_eq!(titles(document.all()), ["Mug"]);
    }

    // =========================================================================
    // buckets
    // =========================================================================

    #[test]
    fn test_create_bucket() {
        let mut document = WishlistDocument::new();
        assert!(document.create_bucket(&bucket("Later")));
        assert!(!document.create_bucket(&bucket("later")));
        assert!(!document.create_bucket(&BucketName::all()));
        assert_eq!(document.to_value(), json!({"all": [], "later": []}));
    }

    #[test]
    fn test_remove_bucket_keeps_items_in_all() {
        let mut document = WishlistDocument::new();
        document.add(&bucket("favorites"), item("Red Mug"));

        let removed = document.remove_bucket(&bucket("favorites")).unwrap();
        assert_eq!(titles(&removed), ["Red Mug"]);
        assert_eq!(document.to_value(), json!({"all": [{"productTitle": "Red Mug"}]}));
    }

    #[test]
    fn test_remove_missing_bucket_leaves_document() {
        let mut document = two_bucket_doc();
        let before = document.clone();
        assert_eq!(
            document.remove_bucket(&bucket("nope")),
            Err(BucketError::NotFound("nope".to_string()))
        );
        assert_eq!(document.remove_bucket(&BucketName::all()), Err(BucketError::Reserved));
        assert_eq!(document, before);
    }

    #[test]
    fn test_remove_bucket_preserves_order() {
        let mut document = doc(json!({"all": [], "a": [], "b": [], "c": []}));
        document.remove_bucket(&bucket("b")).unwrap();
        assert_eq!(document.bucket_names().collect::<Vec<_>>(), ["all", "a", "c"]);
    }

    // =========================================================================
    // replace_bucket
    // =========================================================================

    #[test]
    fn test_replace_named_bucket_resolves_titles() {
        let mut document = two_bucket_doc();
        let outcome =
            document.replace_bucket(&bucket("favorites"), &["TEA POT", "Ghost", "Red Mug", "tea pot"]);

        assert_eq!(outcome.unresolved, ["Ghost"]);
        assert_eq!(titles(document.bucket(&bucket("favorites")).unwrap()), ["Tea Pot", "Red Mug"]);
        assert_eq!(titles(document.all()), ["Red Mug", "Tea Pot"]);
    }

    #[test]
    fn test_replace_all_prunes_other_buckets() {
        let mut document = two_bucket_doc();
        document.replace_bucket(&BucketName::all(), &["Tea Pot"]);

        assert_eq!(titles(document.all()), ["Tea Pot"]);
        assert!(document.bucket(&bucket("favorites")).unwrap().is_empty());
        assert_eq!(titles(document.bucket(&bucket("gifts")).unwrap()), ["Tea Pot"]);
    }

    #[test]
    fn test_replace_all_with_current_titles_is_noop() {
        let mut document = two_bucket_doc();
        let before = document.clone();
        let current: Vec<String> = titles(document.all()).into_iter().map(String::from).collect();

        let outcome = document.replace_bucket(&BucketName::all(), &current);
        assert!(outcome.unresolved.is_empty());
        assert_eq!(document, before);
    }

    #[test]
    fn test_replace_creates_missing_bucket_and_fills_all() {
        let mut document = doc(json!({
            "all": [],
            "legacy": [{"productTitle": "Red Mug", "price": "9.00"}],
        }));
        document.replace_bucket(&bucket("new"), &["red mug"]);

        assert_eq!(titles(document.bucket(&bucket("new")).unwrap()), ["Red Mug"]);
        assert_eq!(document.all()[0].fields()["price"], json!("9.00"));
    }

    #[test]
    fn test_removal_scope_from_str() {
        assert_eq!("bucket".parse::<RemovalScope>(), Ok(RemovalScope::Bucket));
        assert_eq!(" GLOBAL ".parse::<RemovalScope>(), Ok(RemovalScope::Global));
        assert!("everything".parse::<RemovalScope>().is_err());
    }
}
