//! Order routes.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use shelfmark_core::{CustomerId, Email};

use crate::error::{AppError, Result};
use crate::services::OrderSummary;
use crate::state::AppState;

const FETCH_FAILED: &str = "Failed to fetch orders from Shopify";

/// Query for `GET /order/all`.
#[derive(Debug, Deserialize)]
pub struct AllOrdersQuery {
    pub customer_id: Option<String>,
}

/// `GET /order/all?customer_id=`
pub async fn all(
    State(state): State<AppState>,
    Query(query): Query<AllOrdersQuery>,
) -> Result<Json<Value>> {
    let customer_id = query
        .customer_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(|id| {
            id.parse::<CustomerId>()
                .map_err(|_| AppError::BadRequest("Invalid customer_id".to_string()))
        })
        .transpose()?;

    state
        .shopify()
        .list_orders(customer_id)
        .await
        .map(Json)
        .map_err(|e| AppError::upstream(e, FETCH_FAILED))
}

/// `GET /order/{email}`
pub async fn by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<Vec<OrderSummary>>> {
    let email = Email::parse(&email)
        .map_err(|e| AppError::BadRequest(format!("Invalid email: {e}")))?;

    let orders = state
        .shopify()
        .orders_by_email(&email)
        .await
        .map_err(|e| AppError::upstream(e, FETCH_FAILED))?;

    let now = Utc::now();
    Ok(Json(
        orders
            .iter()
            .map(|order| OrderSummary::from_order(order, now))
            .collect(),
    ))
}
