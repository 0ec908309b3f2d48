//! API user lookup and sandbox provisioning.
//!
//! All operations take any [`ApiClient`], so they work equally with a
//! registry-created [`ProductClient`](crate::ProductClient), the
//! subscription-key-only client from [`provisioning_client`], or a test double.

use reqwest::header::{HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};

use crate::constants::{PROVISIONING_PATH, REFERENCE_ID_HEADER};
use crate::error::MomoError;
use crate::http_client::{
    create_client, header_name, ApiClient, ApiResponse, CreateClientOptions, HttpClient,
};
use crate::types::TargetEnvironment;
use crate::url_path::{join_url, url_path_from};

/// Details of an API user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiUser {
    /// Wire name of the user's environment; always `sandbox` on the sandbox
    /// host. Kept as a string so unknown markets still parse.
    pub target_environment: String,
    /// Host the provider redirects to after callback-driven actions.
    pub provider_callback_host: String,
}

impl ApiUser {
    /// Typed environment, if it names one this crate knows.
    pub fn environment(&self) -> Option<TargetEnvironment> {
        self.target_environment.parse().ok()
    }
}

/// A freshly generated API key.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKey {
    pub api_key: String,
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKey")
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

/// Client for the user provisioning API at `{base_url}/v1_0/apiuser`.
///
/// Provisioning is authenticated by the subscription key alone.
pub fn provisioning_client(
    base_url: &str,
    subscription_key: impl Into<String>,
) -> Result<HttpClient, MomoError> {
    create_client(CreateClientOptions {
        base_url: join_url(base_url, &url_path_from(PROVISIONING_PATH)),
        subscription_key: subscription_key.into(),
        header_overrides: Vec::new(),
    })
}

/// Fetch the details of the API user `user_id`.
///
/// Succeeds only on status 200 with a body that parses as [`ApiUser`].
/// Any other outcome, including a transport failure, is
/// [`MomoError::UnknownUserResponse`]. Token errors pass through unchanged.
pub async fn fetch_api_user<C: ApiClient>(user_id: &str, client: &C) -> Result<ApiUser, MomoError> {
    let resp = match client.get(&format!("/{user_id}")).await {
        Ok(resp) => resp,
        Err(MomoError::Http(e)) => {
            tracing::debug!(error = %e, "api user lookup did not get a response");
            return Err(MomoError::UnknownUserResponse {
                status: None,
                body: e,
            });
        }
        Err(e) => return Err(e),
    };

    if resp.status != 200 {
        tracing::debug!(status = resp.status, "api user lookup failed");
        return Err(MomoError::UnknownUserResponse {
            status: Some(resp.status),
            body: resp.text(),
        });
    }

    resp.json::<ApiUser>()
        .map_err(|_| MomoError::UnknownUserResponse {
            status: Some(resp.status),
            body: resp.text(),
        })
}

/// Register a new API user under `reference_id` (a caller-chosen UUID).
pub async fn create_api_user<C: ApiClient>(
    reference_id: &str,
    provider_callback_host: &str,
    client: &C,
) -> Result<(), MomoError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        header_name(REFERENCE_ID_HEADER)?,
        HeaderValue::from_str(reference_id)
            .map_err(|e| MomoError::Config(format!("invalid reference id: {e}")))?,
    );
    let body = serde_json::json!({ "providerCallbackHost": provider_callback_host });

    let resp = client.post_json("", headers, Some(body)).await?;
    expect_status(&resp, 201, "create api user")?;

    tracing::info!(reference_id = %reference_id, "api user created");
    Ok(())
}

/// Generate a new API key for `user_id`. Invalidates any previous key.
pub async fn create_api_key<C: ApiClient>(user_id: &str, client: &C) -> Result<ApiKey, MomoError> {
    let resp = client
        .post_json(&url_path_from([user_id, "apikey"]), HeaderMap::new(), None)
        .await?;
    expect_status(&resp, 201, "create api key")?;
    resp.json()
}

fn expect_status(
    resp: &ApiResponse,
    expected: u16,
    operation: &'static str,
) -> Result<(), MomoError> {
    if resp.status == expected {
        return Ok(());
    }
    tracing::warn!(operation, status = resp.status, "unexpected provisioning status");
    Err(MomoError::UnexpectedStatus {
        operation,
        status: resp.status,
        body: resp.text(),
    })
}
