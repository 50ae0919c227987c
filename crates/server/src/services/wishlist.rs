//! Wishlist persistence and operations.
//!
//! A customer's whole wishlist lives in one JSON metafield
//! (`custom.wishlist`). Every operation resolves the customer, loads the
//! document, mutates it in memory with the algorithms in
//! [`shelfmark_core::wishlist`], and writes it back with a single create or
//! update call. There is no concurrency token: the last writer wins.

use std::future::Future;

use shelfmark_core::wishlist::{
    AddOutcome, BucketError, BucketName, ItemSelector, RemovalScope, ToggleOutcome,
    WishlistDocument, WishlistItem,
};
use shelfmark_core::{CustomerId, Email, MetafieldId};
use thiserror::Error;
use tracing::instrument;

use crate::shopify::{
    AdminRestClient, METAFIELD_TYPE_JSON, Metafield, NewMetafield, ShopifyError,
};

/// Metafield namespace holding the wishlist.
pub const WISHLIST_NAMESPACE: &str = "custom";
/// Metafield key holding the wishlist.
pub const WISHLIST_KEY: &str = "wishlist";

/// Errors from wishlist operations.
#[derive(Debug, Error)]
pub enum WishlistError {
    /// The request itself is unusable.
    #[error("{0}")]
    Validation(String),

    /// No customer has the given email.
    #[error("Customer not found")]
    CustomerNotFound,

    /// The customer has no wishlist metafield yet.
    #[error("Wishlist not found")]
    WishlistNotFound,

    /// The named bucket does not exist.
    #[error("Bucket '{0}' not found.")]
    BucketNotFound(String),

    /// Writing the metafield back failed.
    #[error("Failed to update wishlist")]
    SaveFailed(#[source] ShopifyError),

    /// Any other Shopify failure.
    #[error("Shopify error: {0}")]
    Upstream(#[from] ShopifyError),
}

impl From<BucketError> for WishlistError {
    fn from(err: BucketError) -> Self {
        match err {
            BucketError::NotFound(name) => Self::BucketNotFound(name),
            other => Self::Validation(other.to_string()),
        }
    }
}

/// Remote operations the wishlist needs.
///
/// Implemented by [`AdminRestClient`]; tests substitute an in-memory store.
pub trait WishlistBackend: Send + Sync {
    /// Resolve an email to a customer id.
    fn find_customer(
        &self,
        email: &Email,
    ) -> impl Future<Output = Result<CustomerId, ShopifyError>> + Send;

    /// List a customer's metafields.
    fn list_metafields(
        &self,
        customer_id: CustomerId,
    ) -> impl Future<Output = Result<Vec<Metafield>, ShopifyError>> + Send;

    /// Create a customer metafield.
    fn create_metafield(
        &self,
        customer_id: CustomerId,
        metafield: &NewMetafield,
    ) -> impl Future<Output = Result<Metafield, ShopifyError>> + Send;

    /// Overwrite an existing customer metafield.
    fn update_metafield(
        &self,
        customer_id: CustomerId,
        metafield_id: MetafieldId,
        metafield: &NewMetafield,
    ) -> impl Future<Output = Result<(), ShopifyError>> + Send;
}

impl WishlistBackend for AdminRestClient {
    async fn find_customer(&self, email: &Email) -> Result<CustomerId, ShopifyError> {
        self.find_customer_by_email(email).await
    }

    async fn list_metafields(&self, customer_id: CustomerId) -> Result<Vec<Metafield>, ShopifyError> {
        self.list_customer_metafields(customer_id).await
    }

    async fn create_metafield(
        &self,
        customer_id: CustomerId,
        metafield: &NewMetafield,
    ) -> Result<Metafield, ShopifyError> {
        self.create_customer_metafield(customer_id, metafield).await
    }

    async fn update_metafield(
        &self,
        customer_id: CustomerId,
        metafield_id: MetafieldId,
        metafield: &NewMetafield,
    ) -> Result<(), ShopifyError> {
        self.update_customer_metafield(customer_id, metafield_id, metafield)
            .await
    }
}

/// A wishlist read from Shopify, ready to mutate and save.
#[derive(Debug, Clone)]
pub struct LoadedWishlist {
    pub customer_id: CustomerId,
    /// The stored metafield, if the customer has one.
    pub metafield_id: Option<MetafieldId>,
    pub document: WishlistDocument,
}

impl LoadedWishlist {
    /// Whether the wishlist metafield already exists.
    #[must_use]
    pub const fn exists(&self) -> bool {
        self.metafield_id.is_some()
    }
}

/// Loads and saves wishlist documents.
#[derive(Debug, Clone)]
pub struct WishlistStore<B> {
    backend: B,
}

impl<B: WishlistBackend> WishlistStore<B> {
    pub const fn new(backend: B) -> Self {
        Self { backend }
    }

    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Read a customer's wishlist.
    ///
    /// A missing metafield yields an empty document. A stored value that
    /// cannot be read is replaced by an empty document (the metafield id is
    /// kept so the next save overwrites it) and the problem is logged.
    ///
    /// # Errors
    ///
    /// Returns `WishlistError::Upstream` if the metafields cannot be listed.
    #[instrument(skip(self), fields(customer_id = %customer_id))]
    pub async fn load(&self, customer_id: CustomerId) -> Result<LoadedWishlist, WishlistError> {
        let metafields = self.backend.list_metafields(customer_id).await?;

        let Some(stored) = metafields
            .into_iter()
            .find(|m| m.is(WISHLIST_NAMESPACE, WISHLIST_KEY))
        else {
            return Ok(LoadedWishlist {
                customer_id,
                metafield_id: None,
                document: WishlistDocument::new(),
            });
        };

        let document = match stored.value_text() {
            Some(raw) => {
                let (document, warnings) = WishlistDocument::parse_lenient(&raw);
                for warning in &warnings {
                    tracing::warn!(
                        metafield_id = %stored.id,
                        warning = %warning,
                        "Recovered from unreadable wishlist data"
                    );
                }
                document
            }
            None => WishlistDocument::new(),
        };

        Ok(LoadedWishlist {
            customer_id,
            metafield_id: Some(stored.id),
            document,
        })
    }

    /// Write the document back, creating the metafield if needed.
    ///
    /// # Errors
    ///
    /// Returns `WishlistError::SaveFailed` if Shopify rejects the write.
    #[instrument(skip_all, fields(customer_id = %wishlist.customer_id))]
    pub async fn save(&self, wishlist: &mut LoadedWishlist) -> Result<(), WishlistError> {
        let payload = NewMetafield::new(
            WISHLIST_NAMESPACE,
            WISHLIST_KEY,
            wishlist.document.to_json_string(),
            METAFIELD_TYPE_JSON,
        );

        let result = match wishlist.metafield_id {
            Some(metafield_id) => {
                self.backend
                    .update_metafield(wishlist.customer_id, metafield_id, &payload)
                    .await
            }
            None => self
                .backend
                .create_metafield(wishlist.customer_id, &payload)
                .await
                .map(|created| wishlist.metafield_id = Some(created.id)),
        };

        result.map_err(|e| {
            tracing::error!(error = %e, "Failed to save wishlist");
            WishlistError::SaveFailed(e)
        })
    }
}

/// Wishlist operations keyed by customer email.
#[derive(Debug, Clone)]
pub struct WishlistService<B> {
    store: WishlistStore<B>,
    removal_scope: RemovalScope,
}

impl<B: WishlistBackend> WishlistService<B> {
    pub const fn new(backend: B, removal_scope: RemovalScope) -> Self {
        Self {
            store: WishlistStore::new(backend),
            removal_scope,
        }
    }

    #[must_use]
    pub const fn removal_scope(&self) -> RemovalScope {
        self.removal_scope
    }

    async fn open(&self, email: &Email) -> Result<LoadedWishlist, WishlistError> {
        let customer_id = self
            .store
            .backend()
            .find_customer(email)
            .await
            .map_err(|e| match e {
                ShopifyError::NotFound(_) => WishlistError::CustomerNotFound,
                other => WishlistError::Upstream(other),
            })?;
        self.store.load(customer_id).await
    }

    async fn open_existing(&self, email: &Email) -> Result<LoadedWishlist, WishlistError> {
        let wishlist = self.open(email).await?;
        if wishlist.exists() {
            Ok(wishlist)
        } else {
            Err(WishlistError::WishlistNotFound)
        }
    }

    /// The `"all"` bucket. Creates an empty wishlist metafield if the
    /// customer has none.
    ///
    /// # Errors
    ///
    /// Returns `CustomerNotFound` or `Upstream`. A failure to create the
    /// missing metafield is logged, not returned.
    #[instrument(skip(self), fields(email = %email))]
    pub async fn get(&self, email: &Email) -> Result<Vec<WishlistItem>, WishlistError> {
        let mut wishlist = self.open(email).await?;

        if !wishlist.exists() {
            if let Err(e) = self.store.save(&mut wishlist).await {
                tracing::warn!(error = %e, "Could not create empty wishlist");
            }
        }

        Ok(wishlist.document.all().to_vec())
    }

    /// Add an item to a bucket (and to `"all"`). Nothing is written when the
    /// bucket already holds it.
    ///
    /// # Errors
    ///
    /// Returns `CustomerNotFound`, `Upstream` or `SaveFailed`.
    #[instrument(skip(self, item), fields(email = %email, bucket = %bucket))]
    pub async fn add(
        &self,
        email: &Email,
        bucket: &BucketName,
        item: WishlistItem,
    ) -> Result<(AddOutcome, Vec<WishlistItem>), WishlistError> {
        let mut wishlist = self.open(email).await?;

        let outcome = wishlist.document.add(bucket, item);
        if outcome == AddOutcome::Added {
            self.store.save(&mut wishlist).await?;
        }

        Ok((outcome, wishlist.document.all().to_vec()))
    }

    /// Add the item if the bucket lacks it, otherwise remove it as a
    /// bucket-scoped remove would.
    ///
    /// # Errors
    ///
    /// Returns `CustomerNotFound`, `Upstream` or `SaveFailed`.
    #[instrument(skip(self, item), fields(email = %email, bucket = %bucket))]
    pub async fn toggle(
        &self,
        email: &Email,
        bucket: &BucketName,
        item: WishlistItem,
    ) -> Result<(ToggleOutcome, Vec<WishlistItem>), WishlistError> {
        let mut wishlist = self.open(email).await?;

        let outcome = wishlist.document.toggle(bucket, item);
        self.store.save(&mut wishlist).await?;

        Ok((outcome, wishlist.document.all().to_vec()))
    }

    /// Remove a product, honoring the configured removal scope.
    ///
    /// # Errors
    ///
    /// Returns `CustomerNotFound`, `WishlistNotFound`, `Upstream` or
    /// `SaveFailed`.
    #[instrument(skip(self, selector), fields(email = %email))]
    pub async fn remove(
        &self,
        email: &Email,
        selector: &ItemSelector,
        bucket: Option<&BucketName>,
    ) -> Result<Vec<WishlistItem>, WishlistError> {
        let mut wishlist = self.open_existing(email).await?;

        let removed = wishlist
            .document
            .remove(selector, bucket, self.removal_scope);
        tracing::debug!(removed, "Removed wishlist entries");
        self.store.save(&mut wishlist).await?;

        Ok(wishlist.document.all().to_vec())
    }

    /// Ensure a bucket exists. Returns the whole document.
    ///
    /// # Errors
    ///
    /// Returns `CustomerNotFound`, `Upstream` or `SaveFailed`.
    #[instrument(skip(self), fields(email = %email, bucket = %bucket))]
    pub async fn create_bucket(
        &self,
        email: &Email,
        bucket: &BucketName,
    ) -> Result<WishlistDocument, WishlistError> {
        let mut wishlist = self.open(email).await?;

        let created = wishlist.document.create_bucket(bucket);
        if created || !wishlist.exists() {
            self.store.save(&mut wishlist).await?;
        }

        Ok(wishlist.document)
    }

    /// Delete a bucket; its items stay in `"all"`. Returns the whole
    /// document.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for `"all"`, `BucketNotFound`,
    /// `CustomerNotFound`, `WishlistNotFound`, `Upstream` or `SaveFailed`.
    #[instrument(skip(self), fields(email = %email, bucket = %bucket))]
    pub async fn remove_bucket(
        &self,
        email: &Email,
        bucket: &BucketName,
    ) -> Result<WishlistDocument, WishlistError> {
        if bucket.is_all() {
            return Err(BucketError::Reserved.into());
        }

        let mut wishlist = self.open_existing(email).await?;
        wishlist.document.remove_bucket(bucket)?;
        self.store.save(&mut wishlist).await?;

        Ok(wishlist.document)
    }

    /// Replace a bucket's contents with the products named by `titles`.
    /// Returns the replaced bucket.
    ///
    /// # Errors
    ///
    /// Returns `CustomerNotFound`, `WishlistNotFound`, `Upstream` or
    /// `SaveFailed`.
    #[instrument(skip(self, titles), fields(email = %email, bucket = %bucket, titles = titles.len()))]
    pub async fn replace_bucket(
        &self,
        email: &Email,
        bucket: &BucketName,
        titles: &[String],
    ) -> Result<Vec<WishlistItem>, WishlistError> {
        let mut wishlist = self.open_existing(email).await?;

        let outcome = wishlist.document.replace_bucket(bucket, titles);
        if !outcome.unresolved.is_empty() {
            tracing::warn!(
                unresolved = ?outcome.unresolved,
                "Skipped titles not found in wishlist"
            );
        }
        self.store.save(&mut wishlist).await?;

        Ok(wishlist
            .document
            .bucket(bucket)
            .map(<[WishlistItem]>::to_vec)
            .unwrap_or_default())
    }
}
