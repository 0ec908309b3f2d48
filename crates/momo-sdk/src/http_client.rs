//! Thin `reqwest` wrapper shared by every client in this crate.
//!
//! [`create_client`] builds a transport rooted at a base URL with the
//! subscription key and any header overrides installed as default headers.
//! [`ApiClient`] is the narrow seam the resource operations depend on:
//! anything that can issue a request and hand back a status and a body.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::constants::{REQUEST_TIMEOUT_SECS, SUBSCRIPTION_KEY_HEADER};
use crate::error::MomoError;
use crate::url_path::join_url;

/// Status and raw body of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Parse the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, MomoError> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Body as text, replacing invalid UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Anything that can issue requests against a configured base URL.
///
/// Paths are relative to the client's base URL.
pub trait ApiClient: Send + Sync {
    /// Issue a `GET` for `path`.
    fn get(&self, path: &str) -> impl Future<Output = Result<ApiResponse, MomoError>> + Send;

    /// Issue a `POST` for `path` with extra headers and an optional JSON body.
    fn post_json(
        &self,
        path: &str,
        headers: HeaderMap,
        body: Option<serde_json::Value>,
    ) -> impl Future<Output = Result<ApiResponse, MomoError>> + Send;
}

impl<C: ApiClient> ApiClient for Arc<C> {
    fn get(&self, path: &str) -> impl Future<Output = Result<ApiResponse, MomoError>> + Send {
        (**self).get(path)
    }

    fn post_json(
        &self,
        path: &str,
        headers: HeaderMap,
        body: Option<serde_json::Value>,
    ) -> impl Future<Output = Result<ApiResponse, MomoError>> + Send {
        (**self).post_json(path, headers, body)
    }
}

/// Inputs to [`create_client`].
#[derive(Clone)]
pub struct CreateClientOptions {
    pub base_url: String,
    pub subscription_key: String,
    /// Extra default headers sent with every request.
    pub header_overrides: Vec<(String, String)>,
}

impl std::fmt::Debug for CreateClientOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateClientOptions")
            .field("base_url", &self.base_url)
            .field("subscription_key", &"[REDACTED]")
            .field("header_overrides", &self.header_overrides)
            .finish()
    }
}

/// Build an [`HttpClient`] rooted at `options.base_url`.
pub fn create_client(options: CreateClientOptions) -> Result<HttpClient, MomoError> {
    let mut headers = HeaderMap::new();

    let mut key = HeaderValue::from_str(&options.subscription_key)
        .map_err(|e| MomoError::Config(format!("invalid subscription key: {e}")))?;
    key.set_sensitive(true);
    headers.insert(header_name(SUBSCRIPTION_KEY_HEADER)?, key);

    for (name, value) in &options.header_overrides {
        let value = HeaderValue::from_str(value)
            .map_err(|e| MomoError::Config(format!("invalid value for header {name}: {e}")))?;
        headers.insert(header_name(name)?, value);
    }

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .default_headers(headers)
        .build()
        .map_err(|e| MomoError::Http(format!("failed to build HTTP client: {e}")))?;

    Ok(HttpClient {
        http,
        base_url: options.base_url.trim_end_matches('/').to_string(),
    })
}

/// Parse a header name, lowercasing mixed-case spellings.
pub(crate) fn header_name(name: &str) -> Result<HeaderName, MomoError> {
    HeaderName::from_bytes(name.as_bytes())
        .map_err(|e| MomoError::Config(format!("invalid header name {name}: {e}")))
}

/// Unauthenticated client: subscription key and default headers only.
#[derive(Debug, Clone)]
pub struct HttpClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpClient {
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a request and collect the status and body.
    ///
    /// Any status is returned as `Ok`; only transport failures are errors.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        headers: HeaderMap,
        body: Option<serde_json::Value>,
    ) -> Result<ApiResponse, MomoError> {
        let url = join_url(&self.base_url, path);
        tracing::debug!(method = %method, url = %url, "dispatching request");

        let mut req = self.http.request(method, &url).headers(headers);
        if let Some(body) = body {
            req = req
                .header(CONTENT_TYPE, "application/json")
                .body(serde_json::to_vec(&body)?);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| MomoError::Http(format!("request failed: {e}")))?;
        let status = resp.status().as_u16();
        let body = resp
            .bytes()
            .await
            .map_err(|e| MomoError::Http(format!("failed to read response body: {e}")))?;

        tracing::debug!(url = %url, status, "response received");
        Ok(ApiResponse::new(status, body.to_vec()))
    }
}

impl ApiClient for HttpClient {
    async fn get(&self, path: &str) -> Result<ApiResponse, MomoError> {
        self.send(Method::GET, path, HeaderMap::new(), None).await
    }

    async fn post_json(
        &self,
        path: &str,
        headers: HeaderMap,
        body: Option<serde_json::Value>,
    ) -> Result<ApiResponse, MomoError> {
        self.send(Method::POST, path, headers, body).await
    }
}
