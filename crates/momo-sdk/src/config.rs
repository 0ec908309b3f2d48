use std::env;
use url::Url;

use crate::constants::{PRODUCTION_BASE_URL, SANDBOX_BASE_URL};
use crate::error::MomoError;
use crate::registry::CreateProductClientOptions;
use crate::types::{ApiVersion, Product, TargetEnvironment};

/// SDK settings read from the environment.
#[derive(Clone)]
pub struct MomoConfig {
    /// Product subscription key (`Ocp-Apim-Subscription-Key`)
    pub subscription_key: String,
    /// API key of the API user (None until provisioned)
    pub api_key: Option<String>,
    /// API user id (None until provisioned)
    pub user_id: Option<String>,
    pub target_environment: TargetEnvironment,
    pub product: Product,
    pub api_version: ApiVersion,
    /// API root; defaults to the sandbox or production host by environment
    pub base_url: String,
}

impl std::fmt::Debug for MomoConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MomoConfig")
            .field("subscription_key", &"[REDACTED]")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("user_id", &self.user_id)
            .field("target_environment", &self.target_environment)
            .field("product", &self.product)
            .field("api_version", &self.api_version)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl MomoConfig {
    /// Load from process environment variables (`MOMO_*`).
    pub fn from_env() -> Result<Self, MomoError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load using `lookup` to resolve variable names. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, MomoError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        // Required: subscription key
        let subscription_key = get("MOMO_SUBSCRIPTION_KEY")
            .ok_or_else(|| MomoError::Config("MOMO_SUBSCRIPTION_KEY is required".to_string()))?;

        let api_key = get("MOMO_API_KEY");
        let user_id = get("MOMO_USER_ID");

        let target_environment = match get("MOMO_TARGET_ENVIRONMENT") {
            Some(v) => v.parse()?,
            None => TargetEnvironment::default(),
        };
        let product = match get("MOMO_PRODUCT") {
            Some(v) => v.parse()?,
            None => Product::Collection,
        };
        let api_version = match get("MOMO_API_VERSION") {
            Some(v) => v.parse()?,
            None => ApiVersion::default(),
        };

        let base_url = get("MOMO_BASE_URL").unwrap_or_else(|| {
            if target_environment.is_sandbox() {
                SANDBOX_BASE_URL.to_string()
            } else {
                PRODUCTION_BASE_URL.to_string()
            }
        });
        Url::parse(&base_url)
            .map_err(|e| MomoError::Config(format!("invalid MOMO_BASE_URL {base_url}: {e}")))?;

        if !target_environment.is_sandbox() && base_url == SANDBOX_BASE_URL {
            tracing::warn!(
                environment = %target_environment,
                "live target environment configured against the sandbox host"
            );
        }

        Ok(Self {
            subscription_key,
            api_key,
            user_id,
            target_environment,
            product,
            api_version,
            base_url,
        })
    }

    /// Registry options for the configured product. Needs a provisioned user.
    pub fn product_options(&self) -> Result<CreateProductClientOptions, MomoError> {
        let user_id = self
            .user_id
            .clone()
            .ok_or_else(|| MomoError::Config("MOMO_USER_ID is required".to_string()))?;
        let api_key = self
            .api_key
            .clone()
            .ok_or_else(|| MomoError::Config("MOMO_API_KEY is required".to_string()))?;

        Ok(CreateProductClientOptions {
            subscription_key: self.subscription_key.clone(),
            target_environment: self.target_environment,
            target_product: self.product,
            api_key,
            user_id,
            api_version: Some(self.api_version),
        })
    }
}
