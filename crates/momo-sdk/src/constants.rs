use crate::types::ApiVersion;

/// API root for the MoMo developer sandbox.
pub const SANDBOX_BASE_URL: &str = "https://sandbox.momodeveloper.mtn.com";

/// API root for live (non-sandbox) target environments.
pub const PRODUCTION_BASE_URL: &str = "https://proxy.momoapi.mtn.com";

/// Header carrying the product subscription key on every request.
pub const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// Header declaring which deployment target a request is meant for.
pub const TARGET_ENVIRONMENT_HEADER: &str = "X-Target-Environment";

/// Header carrying the caller-chosen id of a resource being created.
pub const REFERENCE_ID_HEADER: &str = "X-Reference-Id";

/// Version used when a caller does not pick one.
pub const DEFAULT_API_VERSION: ApiVersion = ApiVersion::V1;

/// Path (under the API root) of the sandbox user provisioning API.
pub const PROVISIONING_PATH: [&str; 2] = ["v1_0", "apiuser"];

/// Request timeout applied to every transport built by this crate.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Upper bound on how long a token is cached, whatever `expires_in` says.
pub const MAX_TOKEN_LIFETIME_SECS: u64 = 24 * 60 * 60;

/// Tokens are refreshed once they are this close to expiry.
pub const TOKEN_REFRESH_MARGIN_SECS: u64 = 60;
