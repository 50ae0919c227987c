//! Bucket names.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors produced by bucket-level operations.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BucketError {
    /// The bucket name is empty after trimming.
    #[error("bucket name cannot be empty")]
    Empty,
    /// The bucket does not exist in the document.
    #[error("Bucket '{0}' not found.")]
    NotFound(String),
    /// The `"all"` bucket cannot be removed.
    #[error("Bucket 'all' cannot be removed.")]
    Reserved,
}

/// A normalized bucket name.
///
/// Bucket names are case-insensitive: they are trimmed and lowercased on
/// construction, so `"Favorites"` and `" favorites"` address the same bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BucketName(String);

impl BucketName {
    /// Name of the umbrella bucket holding every wished item.
    pub const ALL: &'static str = "all";

    /// Parse and normalize a bucket name.
    ///
    /// # Errors
    ///
    /// Returns [`BucketError::Empty`] if the name is blank.
    pub fn parse(name: &str) -> Result<Self, BucketError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(BucketError::Empty);
        }
        Ok(Self(trimmed.to_lowercase()))
    }

    /// The reserved `"all"` bucket.
    #[must_use]
    pub fn all() -> Self {
        Self(Self::ALL.to_owned())
    }

    /// Whether this is the reserved `"all"` bucket.
    #[must_use]
    pub fn is_all(&self) -> bool {
        self.0 == Self::ALL
    }

    /// Returns the normalized name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BucketName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for BucketName {
    type Error = BucketError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<BucketName> for String {
    fn from(name: BucketName) -> Self {
        name.0
    }
}

impl AsRef<str> for BucketName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
