//! Wishlist route handlers.
//!
//! Request fields are all optional at the type level: a missing field is
//! reported as a 400 with a readable message before Shopify is called.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shelfmark_core::Email;
use shelfmark_core::wishlist::{
    AddOutcome, BucketName, ItemSelector, WishlistDocument, WishlistItem,
};

use super::JsonBody;
use crate::error::{AppError, Result};
use crate::state::AppState;

// =============================================================================
// Requests
// =============================================================================

/// Query for `GET /wishlist/get`.
#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: Option<String>,
}

/// Body for `add` and `toggle`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRequest {
    pub email: Option<String>,
    pub bucket: Option<String>,
    pub new_item: Option<Value>,
}

/// Body for `remove`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveRequest {
    pub email: Option<String>,
    pub product_title: Option<String>,
    /// Shopify variant id, as a number or a string.
    pub variant_id: Option<Value>,
    pub bucket: Option<String>,
}

/// Body for `create-bucket` and `remove-bucket`.
#[derive(Debug, Deserialize)]
pub struct BucketRequest {
    pub email: Option<String>,
    pub bucket: Option<String>,
}

/// Body for `replace-bucket`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceRequest {
    pub email: Option<String>,
    pub bucket: Option<String>,
    pub product_titles: Option<Value>,
}

// =============================================================================
// Responses
// =============================================================================

/// Response for `GET /wishlist/get`.
#[derive(Debug, Serialize)]
pub struct WishlistResponse {
    pub wishlist: Vec<WishlistItem>,
}

/// Response for `add` and `toggle`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemResponse {
    pub success: bool,
    pub is_wished: bool,
    pub message: String,
    /// The `"all"` bucket after the change.
    pub wishlist: Vec<WishlistItem>,
}

/// Response for the remaining mutations. `wishlist` is the `"all"` bucket,
/// a single bucket, or the whole document depending on the operation.
#[derive(Debug, Serialize)]
pub struct UpdateResponse<T> {
    pub success: bool,
    pub message: String,
    pub wishlist: T,
}

impl<T> UpdateResponse<T> {
    fn ok(message: impl Into<String>, wishlist: T) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.into(),
            wishlist,
        })
    }
}

// =============================================================================
// Validation
// =============================================================================

fn present<'a>(value: Option<&'a str>) -> Option<&'a str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_email(raw: &str) -> Result<Email> {
    Email::parse(raw).map_err(|e| AppError::BadRequest(format!("Invalid email: {e}")))
}

fn parse_bucket(raw: &str) -> Result<BucketName> {
    BucketName::parse(raw).map_err(|e| AppError::BadRequest(e.to_string()))
}

fn parse_item(value: Value) -> Result<WishlistItem> {
    WishlistItem::from_value(value).map_err(|e| AppError::BadRequest(e.to_string()))
}

fn variant_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => present(Some(s.as_str())).map(str::to_owned),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn title_list(value: &Value) -> Option<Vec<String>> {
    value
        .as_array()?
        .iter()
        .map(|title| title.as_str().map(str::to_owned))
        .collect()
}

/// Validated `email`, `bucket` and `newItem`.
fn item_request(req: ItemRequest) -> Result<(Email, BucketName, WishlistItem)> {
    let (Some(email), Some(bucket), Some(item)) = (
        present(req.email.as_deref()),
        present(req.bucket.as_deref()),
        req.new_item.filter(|v| !v.is_null()),
    ) else {
        return Err(AppError::BadRequest("Missing required fields".to_string()));
    };

    Ok((parse_email(email)?, parse_bucket(bucket)?, parse_item(item)?))
}

/// Validated `email` and `bucket`.
fn bucket_request(req: &BucketRequest) -> Result<(Email, BucketName)> {
    let (Some(email), Some(bucket)) = (
        present(req.email.as_deref()),
        present(req.bucket.as_deref()),
    ) else {
        return Err(AppError::BadRequest(
            "Email and bucket name are required.".to_string(),
        ));
    };

    Ok((parse_email(email)?, parse_bucket(bucket)?))
}

// =============================================================================
// Handlers
// =============================================================================

/// `GET /wishlist/get?email=`
pub async fn get(
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<WishlistResponse>> {
    let email = present(query.email.as_deref())
        .ok_or_else(|| AppError::BadRequest("Email is required".to_string()))?;
    let email = parse_email(email)?;

    let wishlist = state.wishlist().get(&email).await?;
    Ok(Json(WishlistResponse { wishlist }))
}

/// `POST /wishlist/add`
pub async fn add(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<ItemRequest>,
) -> Result<Json<ItemResponse>> {
    let (email, bucket, item) = item_request(req)?;

    let (outcome, wishlist) = state.wishlist().add(&email, &bucket, item).await?;
    let message = match outcome {
        AddOutcome::Added => "Item added to wishlist",
        AddOutcome::AlreadyPresent => "Item already in wishlist",
    };

    Ok(Json(ItemResponse {
        success: true,
        is_wished: true,
        message: message.to_string(),
        wishlist,
    }))
}

/// `POST /wishlist/toggle`
pub async fn toggle(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<ItemRequest>,
) -> Result<Json<ItemResponse>> {
    let (email, bucket, item) = item_request(req)?;

    let (outcome, wishlist) = state.wishlist().toggle(&email, &bucket, item).await?;
    let message = if outcome.is_wished() {
        "Item added to wishlist"
    } else {
        "Item removed from wishlist"
    };

    Ok(Json(ItemResponse {
        success: true,
        is_wished: outcome.is_wished(),
        message: message.to_string(),
        wishlist,
    }))
}

/// `POST /wishlist/remove`
///
/// Identifies the product by `productTitle` or `variantId`. Without a
/// bucket (or with `"all"`) the product is removed everywhere.
pub async fn remove(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<RemoveRequest>,
) -> Result<Json<UpdateResponse<Vec<WishlistItem>>>> {
    let missing = || AppError::BadRequest("Missing email or product info".to_string());

    let email = present(req.email.as_deref()).ok_or_else(missing)?;
    let variant_id = variant_text(req.variant_id.as_ref());
    let selector = ItemSelector::new(present(req.product_title.as_deref()), variant_id.as_deref())
        .ok_or_else(missing)?;
    let email = parse_email(email)?;
    let bucket = present(req.bucket.as_deref()).map(parse_bucket).transpose()?;

    let wishlist = state
        .wishlist()
        .remove(&email, &selector, bucket.as_ref())
        .await?;

    Ok(UpdateResponse::ok("Item removed", wishlist))
}

/// `POST /wishlist/create-bucket`
pub async fn create_bucket(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<BucketRequest>,
) -> Result<Json<UpdateResponse<WishlistDocument>>> {
    let (email, bucket) = bucket_request(&req)?;

    let document = state.wishlist().create_bucket(&email, &bucket).await?;

    Ok(UpdateResponse::ok(
        format!("Bucket '{bucket}' created successfully."),
        document,
    ))
}

/// `POST /wishlist/remove-bucket`
pub async fn remove_bucket(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<BucketRequest>,
) -> Result<Json<UpdateResponse<WishlistDocument>>> {
    let (email, bucket) = bucket_request(&req)?;

    let document = state.wishlist().remove_bucket(&email, &bucket).await?;

    Ok(UpdateResponse::ok(
        format!("Bucket '{bucket}' removed successfully."),
        document,
    ))
}

/// `POST /wishlist/replace-bucket`
pub async fn replace_bucket(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<ReplaceRequest>,
) -> Result<Json<UpdateResponse<Vec<WishlistItem>>>> {
    let (Some(email), Some(bucket), Some(titles)) = (
        present(req.email.as_deref()),
        present(req.bucket.as_deref()),
        req.product_titles.as_ref().and_then(title_list),
    ) else {
        return Err(AppError::BadRequest("Missing or invalid fields".to_string()));
    };
    let email = parse_email(email)?;
    let bucket = parse_bucket(bucket)?;

    let items = state
        .wishlist()
        .replace_bucket(&email, &bucket, &titles)
        .await?;

    Ok(UpdateResponse::ok(
        format!("Bucket '{bucket}' replaced successfully"),
        items,
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_item_request_requires_all_fields() {
        let req = ItemRequest {
            email: Some("a@example.com".to_string()),
            bucket: Some("  ".to_string()),
            new_item: Some(json!({"productTitle": "Red Mug"})),
        };
        assert!(matches!(item_request(req), Err(AppError::BadRequest(m)) if m == "Missing required fields"));

        let req = ItemRequest {
            email: Some("a@example.com".to_string()),
            bucket: Some("gifts".to_string()),
            new_item: Some(Value::Null),
        };
        assert!(item_request(req).is_err());
    }

    #[test]
    fn test_item_request_validates_values() {
        let req = ItemRequest {
            email: Some("not-an-email".to_string()),
            bucket: Some("gifts".to_string()),
            new_item: Some(json!({"productTitle": "Red Mug"})),
        };
        assert!(matches!(item_request(req), Err(AppError::BadRequest(m)) if m.starts_with("Invalid email")));

        let req = ItemRequest {
            email: Some("a@example.com".to_string()),
            bucket: Some("Gifts".to_string()),
            new_item: Some(json!({"price": 3})),
        };
        assert!(matches!(item_request(req), Err(AppError::BadRequest(_))));

        let req = ItemRequest {
            email: Some(" a@example.com ".to_string()),
            bucket: Some(" Gifts ".to_string()),
            new_item: Some(json!({"productTitle": "Red Mug"})),
        };
        let (email, bucket, item) = item_request(req).unwrap();
        assert_eq!(email.as_str(), "a@example.com");
        assert_eq!(bucket.as_str(), "gifts");
        assert_eq!(item.product_title(), Some("Red Mug"));
    }

    #[test]
    fn test_variant_text() {
        assert_eq!(variant_text(Some(&json!(42))).as_deref(), Some("42"));
        assert_eq!(
            variant_text(Some(&json!("gid://shopify/ProductVariant/42"))).as_deref(),
            Some("gid://shopify/ProductVariant/42")
        );
        assert_eq!(variant_text(Some(&json!(""))), None);
        assert_eq!(variant_text(Some(&json!(true))), None);
        assert_eq!(variant_text(None), None);
    }

    #[test]
    fn test_title_list() {
        assert_eq!(
            title_list(&json!(["Red Mug", "Blue Cup"])),
            Some(vec!["Red Mug".to_string(), "Blue Cup".to_string()])
        );
        assert_eq!(title_list(&json!([])), Some(vec![]));
        assert_eq!(title_list(&json!("Red Mug")), None);
        assert_eq!(title_list(&json!(["Red Mug", 3])), None);
    }

    #[test]
    fn test_response_shapes() {
        let body = serde_json::to_value(ItemResponse {
            success: true,
            is_wished: false,
            message: "Item removed from wishlist".to_string(),
            wishlist: vec![],
        })
        .unwrap();
        assert_eq!(
            body,
            json!({
                "success": true,
                "isWished": false,
                "message": "Item removed from wishlist",
                "wishlist": [],
            })
        );
    }
}
