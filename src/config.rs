use anyhow::Result;
use sea_orm::Database;
use tracing::{info, warn};

use crate::schemas::AppState;

/// Default secret used when `TOKEN_SECRET` is not set. Fine for local
/// development, never for a deployment.
const DEV_TOKEN_SECRET: &str = "quickbite-dev-secret";

/// Runtime configuration resolved from the environment.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Key for signing access tokens.
    pub token_secret: String,
    /// Access token lifetime in seconds.
    pub token_ttl_secs: u64,
    /// Identity that orders are attributed to when no authenticated
    /// session is presented. The `seed` command creates this user.
    pub default_user_id: i32,
}

impl AppConfig {
    /// Load configuration from environment variables, with defaults.
    pub fn from_env() -> Self {
        let token_secret = std::env::var("TOKEN_SECRET").unwrap_or_else(|_| {
            warn!("TOKEN_SECRET not set, using the development secret");
            DEV_TOKEN_SECRET.to_string()
        });

        let token_ttl_secs = env_or("TOKEN_TTL_SECS", 3600);
        let default_user_id = env_or("DEFAULT_USER_ID", 1);

        Self {
            token_secret,
            token_ttl_secs,
            default_user_id,
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(value) => match value.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("Invalid {} value '{}': {}, using default", key, value, e);
                default
            }
        },
        Err(_) => default,
    }
}

/// Initialize application configuration and state
pub async fn initialize_app_state() -> Result<AppState> {
    // Load configuration
    dotenvy::dotenv().ok();
    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://quickbite.db".to_string());

    initialize_app_state_with_url(&database_url).await
}

/// Initialize application state against a specific database URL
pub async fn initialize_app_state_with_url(database_url: &str) -> Result<AppState> {
    // Connect to database
    info!("Connecting to database: {}", database_url);
    let db = Database::connect(database_url).await?;

    Ok(AppState {
        db,
        config: AppConfig::from_env(),
    })
}

/// Get bind address from environment or use default
pub fn get_bind_address() -> String {
    std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string())
}
