//! Newtype IDs for type-safe Shopify resource references.
//!
//! The Admin REST API identifies every resource by a numeric id. Use the
//! `define_id!` macro to create wrappers that prevent accidentally passing a
//! product id where a customer id is expected.

/// Macro to define a type-safe Shopify ID wrapper.
///
/// Creates a newtype wrapper around `u64` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `get()`
/// - `FromStr` accepting either a bare number or a GraphQL global id
///   (`gid://shopify/Customer/123`)
///
/// # Example
///
/// ```rust
/// # use shelfmark_core::define_id;
/// define_id!(CustomerId);
/// define_id!(OrderId);
///
/// let customer: CustomerId = "gid://shopify/Customer/42".parse().unwrap();
/// assert_eq!(customer.get(), 42);
///
/// // These are different types, so this won't compile:
/// // let _: CustomerId = OrderId::new(42);
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Create a new ID from a raw Shopify id.
            #[must_use]
            pub const fn new(id: u64) -> Self {
                Self(id)
            }

            /// Get the underlying numeric id.
            #[must_use]
            pub const fn get(&self) -> u64 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = ::core::num::ParseIntError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                let raw = s.rsplit('/').next().unwrap_or(s);
                raw.trim().parse::<u64>().map(Self)
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(CustomerId);
define_id!(MetafieldId);
define_id!(ProductId);
define_id!(OrderId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display() {
        assert_eq!(CustomerId::new(22_827_399_807_270).to_string(), "22827399807270");
    }

    #[test]
    fn test_id_from_str() {
        let id: ProductId = "8123".parse().unwrap();
        assert_eq!(id.get(), 8123);

        let id: MetafieldId = "gid://shopify/Metafield/77".parse().unwrap();
        assert_eq!(id, MetafieldId::new(77));

        assert!("abc".parse::<OrderId>().is_err());
    }

    #[test]
    fn test_id_serde_is_transparent() {
        let id: CustomerId = serde_json::from_str("207119551").unwrap();
        assert_eq!(id.get(), 207_119_551);
        assert_eq!(serde_json::to_string(&id).unwrap(), "207119551");
    }
}
