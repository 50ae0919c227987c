//! Product routes.

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::Value;
use shelfmark_core::ProductId;

use crate::error::{AppError, Result};
use crate::services::{VariantDetails, products};
use crate::state::AppState;

/// `GET /products`
pub async fn index(State(state): State<AppState>) -> Result<Json<Value>> {
    state
        .shopify()
        .list_products()
        .await
        .map(Json)
        .map_err(|e| AppError::upstream(e, "Failed to fetch products from Shopify"))
}

/// `GET /products/metafields/{product_id}`
pub async fn variant_details(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<Json<Vec<VariantDetails>>> {
    let product_id: ProductId = product_id
        .parse()
        .map_err(|_| AppError::BadRequest("Invalid product id".to_string()))?;

    let metafields = state
        .shopify()
        .list_product_metafields(product_id)
        .await
        .map_err(|e| AppError::upstream(e, "Failed to fetch metafields from Shopify"))?;
    let product = state
        .shopify()
        .get_product(product_id)
        .await
        .map_err(|e| AppError::upstream(e, "Failed to fetch product details"))?;

    Ok(Json(products::variant_details(&product, &metafields)))
}
