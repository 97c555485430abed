//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ORDER_WEBHOOK_URL` - Notification sink endpoint (may embed a bot token)
//! - `ORDER_CHAT_ID` - Chat that receives order notifications
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL (default: <http://localhost:3000>)
//! - `CATALOG_PATH` - Catalog JSON document (default: data/db.json)
//! - `ORDER_WEBHOOK_TIMEOUT_SECS` - Sink request timeout (default: 5)
//! - `ORDER_PLACED_COOLDOWN_SECS` - "Order placed" display window (default: 5)
//! - `ORDER_UTC_OFFSET_HOURS` - Offset used for order timestamps (default: 5)
//! - `DEFAULT_DELIVERY_ADDRESS` - Address used when the customer gives none
//! - `LOG_FORMAT` - `json` for structured logs, anything else for text
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use chrono::{FixedOffset, Offset, Utc};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

/// Address printed on the storefront when the customer does not enter one.
pub const DEFAULT_DELIVERY_ADDRESS: &str = "Xorazm viloyati Xonqa Tumani Halq Banki yonida";

/// Default catalog document location.
pub const DEFAULT_CATALOG_PATH: &str = "data/db.json";

/// Tashkent time, UTC+5.
const UZBEKISTAN_UTC_OFFSET_SECS: i32 = 5 * 3600;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Location of the catalog JSON document
    pub catalog_path: PathBuf,
    /// Order notification settings
    pub orders: OrderConfig,
    /// Emit JSON logs instead of text
    pub json_logs: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate
    pub sentry_sample_rate: f32,
    /// Sentry transaction sample rate
    pub sentry_traces_sample_rate: f32,
}

/// Order notification and checkout configuration.
///
/// Implements `Debug` manually to redact the webhook URL, which usually
/// carries a bot token in its path.
#[derive(Clone)]
pub struct OrderConfig {
    /// Notification sink endpoint
    pub webhook_url: SecretString,
    /// Chat identifier included in every notification
    pub chat_id: String,
    /// Upper bound for one notification request
    pub webhook_timeout: Duration,
    /// How long a placed order is reported as "placed"
    pub placed_cooldown: Duration,
    /// Offset applied to order timestamps
    pub utc_offset: FixedOffset,
    /// Address used when the customer leaves the field blank
    pub default_delivery_address: String,
}

impl std::fmt::Debug for OrderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderConfig")
            .field("webhook_url", &"[REDACTED]")
            .field("chat_id", &self.chat_id)
            .field("webhook_timeout", &self.webhook_timeout)
            .field("placed_cooldown", &self.placed_cooldown)
            .field("utc_offset", &self.utc_offset)
            .field("default_delivery_address", &self.default_delivery_address)
            .finish()
    }
}

impl StorefrontConfig {
    /// Local configuration with every optional setting at its default.
    #[must_use]
    pub fn new(catalog_path: impl Into<PathBuf>, orders: OrderConfig) -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            catalog_path: catalog_path.into(),
            orders,
            json_logs: false,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env_or_default::<IpAddr>("STOREFRONT_HOST", "127.0.0.1")?;
        let port = parse_env_or_default::<u16>("STOREFRONT_PORT", "3000")?;
        let base_url = get_env_or_default("STOREFRONT_BASE_URL", "http://localhost:3000");
        let catalog_path = PathBuf::from(get_env_or_default("CATALOG_PATH", DEFAULT_CATALOG_PATH));
        let orders = OrderConfig::from_env()?;
        let json_logs = get_optional_env("LOG_FORMAT").is_some_and(|v| v.eq_ignore_ascii_case("json"));

        Ok(Self {
            host,
            port,
            base_url,
            catalog_path,
            orders,
            json_logs,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_env_or_default("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: parse_env_or_default("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the storefront is served over HTTPS (secure cookies).
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl OrderConfig {
    /// Order settings for `webhook_url` and `chat_id`, other values default.
    #[must_use]
    pub fn new(webhook_url: SecretString, chat_id: impl Into<String>) -> Self {
        Self {
            webhook_url,
            chat_id: chat_id.into(),
            webhook_timeout: Duration::from_secs(5),
            placed_cooldown: Duration::from_secs(5),
            utc_offset: FixedOffset::east_opt(UZBEKISTAN_UTC_OFFSET_SECS)
                .unwrap_or_else(|| Utc.fix()),
            default_delivery_address: DEFAULT_DELIVERY_ADDRESS.to_string(),
        }
    }

    fn from_env() -> Result<Self, ConfigError> {
        let webhook_url = get_required_secret("ORDER_WEBHOOK_URL")?;
        validate_webhook_url(&webhook_url, "ORDER_WEBHOOK_URL")?;

        let timeout_secs = parse_env_or_default::<u64>("ORDER_WEBHOOK_TIMEOUT_SECS", "5")?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "ORDER_WEBHOOK_TIMEOUT_SECS".to_string(),
                "must be at least 1".to_string(),
            ));
        }
        let cooldown_secs = parse_env_or_default::<u64>("ORDER_PLACED_COOLDOWN_SECS", "5")?;
        let offset_hours = parse_env_or_default::<i32>("ORDER_UTC_OFFSET_HOURS", "5")?;

        Ok(Self {
            webhook_url,
            chat_id: get_required_env("ORDER_CHAT_ID")?,
            webhook_timeout: Duration::from_secs(timeout_secs),
            placed_cooldown: Duration::from_secs(cooldown_secs),
            utc_offset: utc_offset(offset_hours, "ORDER_UTC_OFFSET_HOURS")?,
            default_delivery_address: get_env_or_default(
                "DEFAULT_DELIVERY_ADDRESS",
                DEFAULT_DELIVERY_ADDRESS,
            ),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get a required environment variable as a secret.
fn get_required_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    Ok(SecretString::from(value))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env_or_default<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// The webhook must be an absolute http(s) URL.
fn validate_webhook_url(url: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    // Parse errors never echo the URL: it may contain a token.
    let parsed = Url::parse(url.expose_secret()).map_err(|e| {
        ConfigError::InvalidEnvVar(var_name.to_string(), format!("not a valid URL ({e})"))
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            "must use http or https".to_string(),
        ));
    }
    Ok(())
}

fn utc_offset(hours: i32, var_name: &str) -> Result<FixedOffset, ConfigError> {
    hours
        .checked_mul(3600)
        .and_then(FixedOffset::east_opt)
        .ok_or_else(|| {
            ConfigError::InvalidEnvVar(var_name.to_string(), format!("{hours} is out of range"))
        })
}
