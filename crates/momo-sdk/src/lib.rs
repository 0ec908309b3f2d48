//! Client SDK for the MoMo mobile-money API.
//!
//! # Pieces
//!
//! - **Registry** ([`ClientRegistry`]): one shared [`ProductClient`] per
//!   (product, API version), each with bearer auth resolved per request
//! - **Tokens** ([`TokenProvider`], [`TokenManager`]): exchanges API user
//!   credentials for access tokens and caches them until near expiry
//! - **Resources** ([`fetch_api_user`], [`create_api_user`], [`create_api_key`]):
//!   operations that accept any [`ApiClient`]
//!
//! # Quick example
//!
//! ```no_run
//! use std::sync::Arc;
//! use momo::{fetch_api_user, ClientRegistry, CreateProductClientOptions, Product, TargetEnvironment, TokenManager};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), momo::MomoError> {
//! let registry = ClientRegistry::new(Arc::new(TokenManager::new()?));
//! let client = registry.get_or_create(&CreateProductClientOptions {
//!     subscription_key: "YOUR_SUBSCRIPTION_KEY".to_string(),
//!     target_environment: TargetEnvironment::Sandbox,
//!     target_product: Product::Collection,
//!     api_key: "YOUR_API_KEY".to_string(),
//!     user_id: "YOUR_USER_ID".to_string(),
//!     api_version: None,
//! })?;
//!
//! let user = fetch_api_user("YOUR_USER_ID", &client).await?;
//! println!("{}", user.provider_callback_host);
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod config;
pub mod constants;
pub mod error;
pub mod http_client;
pub mod provisioning;
pub mod registry;
pub mod token;
pub mod types;
pub mod url_path;

pub use auth::BearerAuth;
pub use config::MomoConfig;
pub use error::MomoError;
pub use http_client::{create_client, ApiClient, ApiResponse, CreateClientOptions, HttpClient};
pub use provisioning::{
    create_api_key, create_api_user, fetch_api_user, provisioning_client, ApiKey, ApiUser,
};
pub use registry::{ClientKey, ClientRegistry, CreateProductClientOptions, ProductClient};
pub use token::{AccessToken, AuthContext, TokenManager, TokenProvider};
pub use types::{ApiVersion, Product, TargetEnvironment};
pub use url_path::{join_url, url_path_from};
