//! Uniform request/response envelope over the Admin REST API.

use std::sync::Arc;

use reqwest::{
    Method, StatusCode,
    header::{CONTENT_TYPE, HeaderMap, HeaderValue},
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{Span, instrument};

use crate::config::ShopifyConfig;

use super::ShopifyError;

/// Header carrying the Admin API access token.
const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// Raw outcome of an Admin API call.
///
/// A non-2xx status is not an error at this level: `ok` is `false` and the
/// caller decides what to do with `status` and `raw`.
#[derive(Debug, Clone)]
pub struct RemoteResponse {
    /// Whether the status is in the 2xx class.
    pub ok: bool,
    /// HTTP status returned by Shopify.
    pub status: StatusCode,
    /// Unparsed response body.
    pub raw: String,
}

impl RemoteResponse {
    /// Parse the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::Parse` if the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ShopifyError> {
        Ok(serde_json::from_str(&self.raw)?)
    }

    /// Turn a non-success response into `ShopifyError::Api`.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::Api` carrying the status and body when `ok` is
    /// false.
    pub fn success(self) -> Result<Self, ShopifyError> {
        if self.ok {
            Ok(self)
        } else {
            Err(ShopifyError::Api {
                status: self.status.as_u16(),
                message: self.raw,
            })
        }
    }
}

/// Shopify Admin REST API client.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct AdminRestClient {
    inner: Arc<AdminRestClientInner>,
}

struct AdminRestClientInner {
    client: reqwest::Client,
    api_root: String,
}

impl std::fmt::Debug for AdminRestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminRestClient")
            .field("api_root", &self.inner.api_root)
            .finish_non_exhaustive()
    }
}

impl AdminRestClient {
    /// Create a new Admin API client.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::Config` if the access token is not a valid
    /// header value, or `ShopifyError::Http` if the HTTP client fails to build.
    pub fn new(config: &ShopifyConfig) -> Result<Self, ShopifyError> {
        let mut headers = HeaderMap::new();

        let mut token = HeaderValue::from_str(config.access_token())
            .map_err(|e| ShopifyError::Config(format!("Invalid access token format: {e}")))?;
        token.set_sensitive(true);
        headers.insert(ACCESS_TOKEN_HEADER, token);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: Arc::new(AdminRestClientInner {
                client,
                api_root: config.api_root(),
            }),
        })
    }

    /// Full URL for an API path such as `customers.json`.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.inner.api_root, path.trim_start_matches('/'))
    }

    /// Send a request and return the raw envelope.
    ///
    /// `body` is serialized as JSON when present.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::Http` only for transport failures; HTTP error
    /// statuses come back as a `RemoteResponse` with `ok == false`.
    #[instrument(skip(self, body), fields(status = tracing::field::Empty))]
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<RemoteResponse, ShopifyError> {
        let mut request = self.inner.client.request(method, self.endpoint(path));
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        Span::current().record("status", status.as_u16());

        let raw = response.text().await?;
        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), body = %raw, "Shopify returned error status");
        }

        Ok(RemoteResponse {
            ok: status.is_success(),
            status,
            raw,
        })
    }

    /// `GET` a path.
    ///
    /// # Errors
    ///
    /// See [`AdminRestClient::request`].
    pub async fn get(&self, path: &str) -> Result<RemoteResponse, ShopifyError> {
        self.request(Method::GET, path, None).await
    }

    /// `POST` a JSON body to a path.
    ///
    /// # Errors
    ///
    /// See [`AdminRestClient::request`].
    pub async fn post(&self, path: &str, body: &Value) -> Result<RemoteResponse, ShopifyError> {
        self.request(Method::POST, path, Some(body)).await
    }

    /// `PUT` a JSON body to a path.
    ///
    /// # Errors
    ///
    /// See [`AdminRestClient::request`].
    pub async fn put(&self, path: &str, body: &Value) -> Result<RemoteResponse, ShopifyError> {
        self.request(Method::PUT, path, Some(body)).await
    }
}
