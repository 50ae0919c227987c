//! Bucketed wishlist documents.
//!
//! A customer's wishlist is a single JSON object mapping bucket names to
//! ordered lists of product references:
//!
//! ```json
//! {
//!   "all": [{ "productTitle": "Red Mug", "variantId": 4411 }],
//!   "favorites": [{ "productTitle": "Red Mug", "variantId": 4411 }]
//! }
//! ```
//!
//! `"all"` is always present and always serialized first. It is the source
//! of truth for membership; named buckets are labeled subsets of it. Items
//! within a bucket are unique by identity key (see [`normalize_title`]).
//!
//! Everything here is pure: loading and saving the document is the server's
//! job. A mutation never touches the network, so every rule in this module is
//! covered by plain unit tests.

mod bucket;
mod document;
mod item;

pub use bucket::{BucketError, BucketName};
pub use document::{
    AddOutcome, LoadWarning, RemovalScope, RemovalScopeError, ReplaceOutcome, ToggleOutcome,
    WishlistDocument,
};
pub use item::{ItemError, ItemSelector, WishlistItem, normalize_title};
