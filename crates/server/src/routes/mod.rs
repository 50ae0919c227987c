//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Health check
//!
//! # Wishlist
//! GET  /wishlist/get?email=             - The "all" bucket
//! POST /wishlist/add                    - Add an item to a bucket
//! POST /wishlist/toggle                 - Add or remove an item
//! POST /wishlist/remove                 - Remove an item
//! POST /wishlist/create-bucket          - Create an empty bucket
//! POST /wishlist/remove-bucket          - Delete a bucket
//! POST /wishlist/replace-bucket         - Replace a bucket's contents
//!
//! # Accounts
//! GET  /accounts                        - Shopify customers, verbatim
//! POST /accounts/create                 - Create a customer and its profile metafields
//!
//! # Orders
//! GET  /order/all?customer_id=          - Shopify orders, verbatim
//! GET  /order/{email}                   - Order summaries with renewal window
//!
//! # Products
//! GET  /products                        - Shopify products, verbatim
//! GET  /products/metafields/{productId} - Per-variant detail lists
//! ```

pub mod customers;
pub mod orders;
pub mod products;
pub mod wishlist;

use axum::{
    Json, Router,
    extract::{FromRequest, Request, rejection::JsonRejection},
    middleware,
    routing::{get, post},
};
use serde::de::DeserializeOwned;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultOnResponse, OnResponse, TraceLayer},
};
use tracing::Span;

use crate::error::AppError;
use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// JSON body extractor whose rejections render as `AppError::BadRequest`.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        Json::<T>::from_request(req, state)
            .await
            .map(|Json(value)| Self(value))
            .map_err(|rejection: JsonRejection| {
                tracing::debug!(error = %rejection.body_text(), "Rejected request body");
                AppError::BadRequest("Invalid JSON body".to_string())
            })
    }
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/get", get(wishlist::get))
        .route("/add", post(wishlist::add))
        .route("/toggle", post(wishlist::toggle))
        .route("/remove", post(wishlist::remove))
        .route("/create-bucket", post(wishlist::create_bucket))
        .route("/remove-bucket", post(wishlist::remove_bucket))
        .route("/replace-bucket", post(wishlist::replace_bucket))
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(customers::index))
        .route("/create", post(customers::create))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/all", get(orders::all))
        .route("/{email}", get(orders::by_email))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/metafields/{product_id}", get(products::variant_details))
}

/// Create all API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/wishlist", wishlist_routes())
        .nest("/accounts", account_routes())
        .nest("/order", order_routes())
        .nest("/products", product_routes())
}

/// The full application: routes, health check and middleware.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(routes())
        .layer(middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not call Shopify.
async fn health() -> &'static str {
    "ok"
}
