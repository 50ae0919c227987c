//! Unified error handling with Sentry integration.
//!
//! Every handler returns `Result<T, AppError>`. Errors render as a JSON body
//! `{"error": "<message>"}`; server-side failures are captured to Sentry and
//! their details are never sent to the client.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::services::WishlistError;
use crate::shopify::ShopifyError;

/// Application-level error type for the server.
#[derive(Debug, Error)]
pub enum AppError {
    /// Shopify API operation failed.
    #[error("Shopify error: {0}")]
    Shopify(#[from] ShopifyError),

    /// Wishlist operation failed.
    #[error("Wishlist error: {0}")]
    Wishlist(#[from] WishlistError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Shopify rejected a pass-through call; its status is relayed.
    #[error("Upstream {status}: {message}")]
    Upstream {
        /// Status returned by Shopify.
        status: u16,
        /// Message for the client.
        message: String,
    },

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Relay a failed pass-through call.
    ///
    /// A Shopify error status is passed on with `message`; anything else
    /// (transport or parse failure) stays a server error.
    #[must_use]
    pub fn upstream(err: ShopifyError, message: &str) -> Self {
        match err.upstream_status() {
            Some(status) => Self::Upstream {
                status,
                message: message.to_string(),
            },
            None => Self::Shopify(err),
        }
    }

    /// The HTTP status this error renders with.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Shopify(ShopifyError::NotFound(_)) | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Shopify(_) => StatusCode::BAD_GATEWAY,
            Self::Wishlist(err) => match err {
                WishlistError::Validation(_) => StatusCode::BAD_REQUEST,
                WishlistError::CustomerNotFound
                | WishlistError::WishlistNotFound
                | WishlistError::BucketNotFound(_) => StatusCode::NOT_FOUND,
                WishlistError::SaveFailed(_) | WishlistError::Upstream(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
        }
    }

    /// The message sent to the client.
    #[must_use]
    pub fn client_message(&self) -> String {
        match self {
            Self::Internal(_) | Self::Wishlist(WishlistError::Upstream(_)) => {
                "Internal server error".to_string()
            }
            Self::Shopify(ShopifyError::NotFound(msg)) | Self::NotFound(msg) => msg.clone(),
            Self::Shopify(_) => "External service error".to_string(),
            Self::Wishlist(err) => err.to_string(),
            Self::BadRequest(msg) | Self::Upstream { message: msg, .. } => msg.clone(),
        }
    }

    fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Internal(_)
                | Self::Shopify(
                    ShopifyError::Http(_)
                        | ShopifyError::Parse(_)
                        | ShopifyError::Api { .. }
                        | ShopifyError::Config(_)
                )
                | Self::Wishlist(WishlistError::SaveFailed(_) | WishlistError::Upstream(_))
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = self.status();
        let body = Json(json!({ "error": self.client_message() }));

        (status, body).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
