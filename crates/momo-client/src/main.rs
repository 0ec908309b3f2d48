use std::sync::Arc;

use momo::{
    create_api_key, create_api_user, fetch_api_user, provisioning_client, ClientRegistry,
    MomoConfig, MomoError, TokenManager, TokenProvider,
};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: momo-client <user <user-id> | provision <callback-host> | token>";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    let config = match MomoConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    tracing::debug!(config = ?config, "loaded configuration");

    let result = match args.first().map(String::as_str) {
        Some("user") => match args.get(1) {
            Some(user_id) => show_user(&config, user_id).await,
            None => usage(),
        },
        Some("provision") => match args.get(1) {
            Some(host) => provision(&config, host).await,
            None => usage(),
        },
        Some("token") => show_token(&config).await,
        _ => usage(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn usage() -> Result<(), MomoError> {
    eprintln!("{USAGE}");
    std::process::exit(2);
}

async fn show_user(config: &MomoConfig, user_id: &str) -> Result<(), MomoError> {
    let client = provisioning_client(&config.base_url, config.subscription_key.clone())?;
    let user = fetch_api_user(user_id, &client).await?;

    println!("API user {user_id}:");
    println!("{}", serde_json::to_string_pretty(&user)?);
    Ok(())
}

async fn provision(config: &MomoConfig, callback_host: &str) -> Result<(), MomoError> {
    if !config.target_environment.is_sandbox() {
        return Err(MomoError::Config(format!(
            "provisioning is only available in sandbox, not {}",
            config.target_environment
        )));
    }

    let client = provisioning_client(&config.base_url, config.subscription_key.clone())?;
    let user_id = uuid::Uuid::new_v4().to_string();

    create_api_user(&user_id, callback_host, &client).await?;
    let key = create_api_key(&user_id, &client).await?;

    println!("Provisioned API user.");
    println!("MOMO_USER_ID={user_id}");
    println!("MOMO_API_KEY={}", key.api_key);
    Ok(())
}

async fn show_token(config: &MomoConfig) -> Result<(), MomoError> {
    let tokens = Arc::new(TokenManager::with_base_url(config.base_url.clone())?);
    let registry = ClientRegistry::with_base_url(config.base_url.clone(), Arc::clone(&tokens));
    let client = registry.get_or_create(&config.product_options()?)?;

    let token = tokens
        .create_or_refresh_access_token(client.auth_context())
        .await?;

    println!("Client: {} ({})", client.key(), client.base_url());
    println!(
        "Token: {} issued, expires in {}s",
        token.token_type, token.expires_in
    );
    Ok(())
}
