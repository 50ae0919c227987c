//! Customer account routes.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

use super::JsonBody;
use crate::error::{AppError, Result};
use crate::shopify::{
    CreatedCustomer, METAFIELD_TYPE_MULTI_LINE, METAFIELD_TYPE_SINGLE_LINE, Metafield,
    NewMetafield, ShopifyError,
};
use crate::state::AppState;

/// Namespace for the profile metafields written after signup.
const PROFILE_NAMESPACE: &str = "custom";

/// Response for `POST /accounts/create`.
#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub message: String,
    pub created: Vec<Metafield>,
}

/// `GET /accounts`
pub async fn index(State(state): State<AppState>) -> Result<Json<Value>> {
    state
        .shopify()
        .list_customers()
        .await
        .map(Json)
        .map_err(|e| AppError::upstream(e, "Failed to fetch customers from Shopify"))
}

/// `POST /accounts/create`
///
/// Creates the customer, then copies name, phone, email and first address
/// line into `custom.*` metafields. Individual metafield failures are logged
/// and skipped.
pub async fn create(
    State(state): State<AppState>,
    JsonBody(fields): JsonBody<Value>,
) -> Result<Response> {
    let customer = state
        .shopify()
        .create_customer(&fields)
        .await
        .map_err(|e| match e {
            ShopifyError::Api { status, message } => AppError::Upstream { status, message },
            other => other.into(),
        })?;

    let (Some(customer_id), Some(metafields)) = (customer.id, profile_metafields(&customer)) else {
        return Err(AppError::BadRequest("Missing required customer data.".to_string()));
    };

    let mut created = Vec::with_capacity(metafields.len());
    for metafield in &metafields {
        match state
            .shopify()
            .create_customer_metafield(customer_id, metafield)
            .await
        {
            Ok(m) => created.push(m),
            Err(e) => tracing::warn!(
                customer_id = %customer_id,
                key = %metafield.key,
                error = %e,
                "Failed to create profile metafield"
            ),
        }
    }

    if created.is_empty() {
        return Ok((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "No metafields were created." })),
        )
            .into_response());
    }

    Ok(Json(CreatedResponse {
        message: "Metafields added successfully.".to_string(),
        created,
    })
    .into_response())
}

/// The profile metafields for a new customer, or `None` if the customer
/// lacks an id, first or last name, email or first address line.
fn profile_metafields(customer: &CreatedCustomer) -> Option<Vec<NewMetafield>> {
    let non_empty = |v: &Option<String>| v.clone().filter(|s| !s.trim().is_empty());

    customer.id?;
    let first_name = non_empty(&customer.first_name)?;
    let last_name = non_empty(&customer.last_name)?;
    let email = non_empty(&customer.email)?;
    let address = customer
        .addresses
        .first()
        .and_then(|a| non_empty(&a.address1))?;

    Some(vec![
        NewMetafield::new(
            PROFILE_NAMESPACE,
            "name",
            format!("{first_name} {last_name}"),
            METAFIELD_TYPE_SINGLE_LINE,
        ),
        NewMetafield::new(
            PROFILE_NAMESPACE,
            "phone_no",
            customer.phone.clone().unwrap_or_default(),
            METAFIELD_TYPE_SINGLE_LINE,
        ),
        NewMetafield::new(PROFILE_NAMESPACE, "email", email, METAFIELD_TYPE_SINGLE_LINE),
        NewMetafield::new(PROFILE_NAMESPACE, "address", address, METAFIELD_TYPE_MULTI_LINE),
    ])
}
