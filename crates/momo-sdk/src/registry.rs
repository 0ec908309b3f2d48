//! Per-product client registry.
//!
//! [`ClientRegistry`] hands out one authenticated [`ProductClient`] per
//! (product, API version). The first request for a pair builds the client;
//! every later request for the same pair gets the same `Arc` back, whatever
//! credentials it passes. Authentication is attached as a [`BearerAuth`]
//! decorator that resolves a token immediately before each request.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use reqwest::header::HeaderMap;
use reqwest::Method;
use std::fmt;
use std::sync::Arc;

use crate::auth::BearerAuth;
use crate::constants::{DEFAULT_API_VERSION, SANDBOX_BASE_URL, TARGET_ENVIRONMENT_HEADER};
use crate::error::MomoError;
use crate::http_client::{create_client, ApiClient, ApiResponse, CreateClientOptions, HttpClient};
use crate::token::{AuthContext, TokenProvider};
use crate::types::{ApiVersion, Product, TargetEnvironment};
use crate::url_path::{join_url, url_path_from};

/// Cache key: one client per (product, version).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientKey {
    pub product: Product,
    pub version: ApiVersion,
}

impl ClientKey {
    /// `None` resolves to the default API version.
    pub fn new(product: Product, version: Option<ApiVersion>) -> Self {
        Self {
            product,
            version: version.unwrap_or(DEFAULT_API_VERSION),
        }
    }
}

impl fmt::Display for ClientKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.product, self.version)
    }
}

/// Inputs to [`ClientRegistry::get_or_create`].
#[derive(Clone)]
pub struct CreateProductClientOptions {
    pub subscription_key: String,
    pub target_environment: TargetEnvironment,
    pub target_product: Product,
    pub api_key: String,
    pub user_id: String,
    pub api_version: Option<ApiVersion>,
}

impl fmt::Debug for CreateProductClientOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateProductClientOptions")
            .field("subscription_key", &"[REDACTED]")
            .field("target_environment", &self.target_environment)
            .field("target_product", &self.target_product)
            .field("api_key", &"[REDACTED]")
            .field("user_id", &self.user_id)
            .field("api_version", &self.api_version)
            .finish()
    }
}

impl CreateProductClientOptions {
    fn auth_context(&self) -> AuthContext {
        AuthContext {
            subscription_key: self.subscription_key.clone(),
            target_environment: self.target_environment,
            target_product: self.target_product,
            api_key: self.api_key.clone(),
            user_id: self.user_id.clone(),
        }
    }
}

/// HTTP client for one product/version with bearer auth applied per request.
pub struct ProductClient<T> {
    key: ClientKey,
    http: HttpClient,
    auth: BearerAuth<T>,
}

impl<T: TokenProvider> ProductClient<T> {
    pub fn key(&self) -> ClientKey {
        self.key
    }

    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }

    /// Context the bearer token is resolved from.
    pub fn auth_context(&self) -> &AuthContext {
        self.auth.context()
    }

    async fn dispatch(
        &self,
        method: Method,
        path: &str,
        mut headers: HeaderMap,
        body: Option<serde_json::Value>,
    ) -> Result<ApiResponse, MomoError> {
        self.auth.decorate(&mut headers).await?;
        self.http.send(method, path, headers, body).await
    }
}

impl<T: TokenProvider> ApiClient for ProductClient<T> {
    async fn get(&self, path: &str) -> Result<ApiResponse, MomoError> {
        self.dispatch(Method::GET, path, HeaderMap::new(), None).await
    }

    async fn post_json(
        &self,
        path: &str,
        headers: HeaderMap,
        body: Option<serde_json::Value>,
    ) -> Result<ApiResponse, MomoError> {
        self.dispatch(Method::POST, path, headers, body).await
    }
}

/// Registry of shared product clients. Empty on construction; entries live
/// as long as the registry.
pub struct ClientRegistry<T> {
    base_url: String,
    tokens: Arc<T>,
    clients: DashMap<ClientKey, Arc<ProductClient<T>>>,
}

impl<T: TokenProvider> ClientRegistry<T> {
    /// Registry against the sandbox API root.
    pub fn new(tokens: Arc<T>) -> Self {
        Self::with_base_url(SANDBOX_BASE_URL, tokens)
    }

    pub fn with_base_url(base_url: impl Into<String>, tokens: Arc<T>) -> Self {
        Self {
            base_url: base_url.into(),
            tokens,
            clients: DashMap::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Return the client for `(options.target_product, options.api_version)`,
    /// building it on first use.
    ///
    /// A cached client is returned as is: its environment and credentials
    /// are those of the call that created it.
    pub fn get_or_create(
        &self,
        options: &CreateProductClientOptions,
    ) -> Result<Arc<ProductClient<T>>, MomoError> {
        let key = ClientKey::new(options.target_product, options.api_version);

        match self.clients.entry(key) {
            Entry::Occupied(entry) => {
                let client = entry.get();
                if client.auth_context().user_id != options.user_id
                    || client.auth_context().target_environment != options.target_environment
                {
                    tracing::debug!(
                        client_key = %key,
                        "cached client was created with a different user or environment"
                    );
                }
                Ok(Arc::clone(client))
            }
            Entry::Vacant(entry) => {
                // Built while the shard is locked so concurrent misses share
                // one client. Building does no I/O.
                let client = Arc::new(self.build(key, options)?);
                tracing::info!(
                    client_key = %key,
                    base_url = %client.base_url(),
                    environment = %options.target_environment,
                    "created product client"
                );
                entry.insert(Arc::clone(&client));
                Ok(client)
            }
        }
    }

    /// Cached client for a pair, if one has been created.
    pub fn get(&self, product: Product, version: Option<ApiVersion>) -> Option<Arc<ProductClient<T>>> {
        self.clients
            .get(&ClientKey::new(product, version))
            .map(|entry| Arc::clone(entry.value()))
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    fn build(
        &self,
        key: ClientKey,
        options: &CreateProductClientOptions,
    ) -> Result<ProductClient<T>, MomoError> {
        let base_url = join_url(
            &self.base_url,
            &url_path_from([key.product.as_str(), key.version.path_segment()]),
        );

        let http = create_client(CreateClientOptions {
            base_url,
            subscription_key: options.subscription_key.clone(),
            header_overrides: vec![(
                TARGET_ENVIRONMENT_HEADER.to_string(),
                options.target_environment.as_str().to_string(),
            )],
        })?;

        Ok(ProductClient {
            key,
            http,
            auth: BearerAuth::new(options.auth_context(), Arc::clone(&self.tokens)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::AccessToken;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingTokens {
        calls: AtomicUsize,
    }

    impl TokenProvider for CountingTokens {
        async fn create_or_refresh_access_token(
            &self,
            _context: &AuthContext,
        ) -> Result<AccessToken, MomoError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(AccessToken {
                access_token: "tok".to_string(),
                token_type: "access_token".to_string(),
                expires_in: 3600,
            })
        }
    }

    fn options(product: Product, version: Option<ApiVersion>) -> CreateProductClientOptions {
        CreateProductClientOptions {
            subscription_key: "sub".to_string(),
            target_environment: TargetEnvironment::Sandbox,
            target_product: product,
            api_key: "key".to_string(),
            user_id: "user-a".to_string(),
            api_version: version,
        }
    }

    fn registry() -> (ClientRegistry<CountingTokens>, Arc<CountingTokens>) {
        let tokens = Arc::new(CountingTokens::default());
        (ClientRegistry::new(Arc::clone(&tokens)), tokens)
    }

    #[test]
    fn test_client_key_display() {
        let key = ClientKey::new(Product::Collection, None);
        assert_eq!(key.to_string(), "collection-v1");
        assert_eq!(
            ClientKey::new(Product::Remittance, Some(ApiVersion::V2)).to_string(),
            "remittance-v2"
        );
    }

    #[test]
    fn test_same_pair_returns_same_instance() {
        let (registry, _) = registry();
        let a = registry
            .get_or_create(&options(Product::Collection, Some(ApiVersion::V1)))
            .unwrap();
        let b = registry
            .get_or_create(&options(Product::Collection, Some(ApiVersion::V1)))
            .unwrap();

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_first_configuration_wins() {
        let (registry, _) = registry();
        let first = registry
            .get_or_create(&options(Product::Collection, None))
            .unwrap();

        let mut other = options(Product::Collection, None);
        other.user_id = "user-b".to_string();
        other.api_key = "other-key".to_string();
        other.target_environment = TargetEnvironment::MtnGhana;
        let second = registry.get_or_create(&other).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.auth_context().user_id, "user-a");
        assert_eq!(
            second.auth_context().target_environment,
            TargetEnvironment::Sandbox
        );
    }

    #[test]
    fn test_distinct_pairs_return_distinct_instances() {
        let (registry, _) = registry();
        let collection = registry
            .get_or_create(&options(Product::Collection, None))
            .unwrap();
        let disbursement = registry
            .get_or_create(&options(Product::Disbursement, None))
            .unwrap();
        let collection_v2 = registry
            .get_or_create(&options(Product::Collection, Some(ApiVersion::V2)))
            .unwrap();

        assert!(!Arc::ptr_eq(&collection, &disbursement));
        assert!(!Arc::ptr_eq(&collection, &collection_v2));
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_omitted_version_equals_default() {
        let (registry, _) = registry();
        let implicit = registry
            .get_or_create(&options(Product::Remittance, None))
            .unwrap();
        let explicit = registry
            .get_or_create(&options(Product::Remittance, Some(DEFAULT_API_VERSION)))
            .unwrap();

        assert!(Arc::ptr_eq(&implicit, &explicit));
        assert_eq!(implicit.key(), explicit.key());
        assert_eq!(
            implicit.base_url(),
            "https://sandbox.momodeveloper.mtn.com/remittance/v1_0"
        );
    }

    #[test]
    fn test_base_url_composition() {
        let tokens = Arc::new(CountingTokens::default());
        let registry = ClientRegistry::with_base_url("https://proxy.example/", tokens);
        let client = registry
            .get_or_create(&options(Product::Disbursement, Some(ApiVersion::V2)))
            .unwrap();
        assert_eq!(client.base_url(), "https://proxy.example/disbursement/v2_0");
    }

    #[test]
    fn test_no_token_fetched_at_creation() {
        let (registry, tokens) = registry();
        registry
            .get_or_create(&options(Product::Collection, None))
            .unwrap();
        assert_eq!(tokens.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_get_returns_only_cached() {
        let (registry, _) = registry();
        assert!(registry.is_empty());
        assert!(registry.get(Product::Collection, None).is_none());

        let created = registry
            .get_or_create(&options(Product::Collection, None))
            .unwrap();
        let cached = registry
            .get(Product::Collection, Some(ApiVersion::V1))
            .unwrap();
        assert!(Arc::ptr_eq(&created, &cached));
    }

    #[test]
    fn test_invalid_subscription_key_is_config_error() {
        let (registry, _) = registry();
        let mut bad = options(Product::Collection, None);
        bad.subscription_key = "bad\r\nkey".to_string();

        assert!(matches!(
            registry.get_or_create(&bad),
            Err(MomoError::Config(_))
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_failed_build_releases_slot() {
        let (registry, _) = registry();
        let mut bad = options(Product::Collection, None);
        bad.subscription_key = "bad\r\nkey".to_string();
        let _ = registry.get_or_create(&bad);

        let client = registry
            .get_or_create(&options(Product::Collection, None))
            .unwrap();

        assert_eq!(registry.len(), 1);
        assert!(Arc::ptr_eq(
            &client,
            &registry.get(Product::Collection, None).unwrap()
        ));
    }

    #[test]
    fn test_concurrent_creation_yields_one_client() {
        let (registry, _) = registry();
        let registry = Arc::new(registry);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    registry
                        .get_or_create(&options(Product::Collection, None))
                        .unwrap()
                })
            })
            .collect();
        let clients: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(registry.len(), 1);
        for client in &clients[1..] {
            assert!(Arc::ptr_eq(&clients[0], client));
        }
    }
}
