//! Business logic services.
//!
//! # Services
//!
//! - `wishlist` - Bucketed wishlists persisted in a customer metafield
//! - `orders` - Order summaries with a monthly renewal window
//! - `products` - Per-variant detail lists read from product metafields

pub mod orders;
pub mod products;
pub mod wishlist;

pub use orders::OrderSummary;
pub use products::VariantDetails;
pub use wishlist::{LoadedWishlist, WishlistBackend, WishlistError, WishlistService, WishlistStore};
