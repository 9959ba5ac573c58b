//! Configuration module for UniShark bot.
//!
//! Loads configuration from environment variables.

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_SITE_URL: &str = "https://unishark.site";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 7;

/// Errors raised while loading configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is missing")]
    Missing(&'static str),

    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    // Telegram
    /// Bot token. Doubles as the secret path segment of the webhook URL.
    pub bot_token: String,

    /// Bot username (without @) used to recognise `/start@username`.
    /// Optional - will be fetched via getMe if not set.
    pub bot_username: Option<String>,

    /// Public base URL. When set, `setWebhook` is called at startup.
    pub webhook_url: Option<Url>,

    /// Timeout for outbound Bot API calls.
    pub request_timeout: Duration,

    // HTTP server
    pub listen_addr: SocketAddr,

    /// Target of the button in the /start welcome message.
    pub site_url: Url,
}

impl Config {
    /// Load configuration from environment variables (and `.env`, if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bot_token = var("BOT_TOKEN")
            .or_else(|| var("TELEGRAM_BOT_TOKEN"))
            .ok_or(ConfigError::Missing("BOT_TOKEN"))?;

        // Parse bot username (strip @ if present)
        let bot_username = var("BOT_USERNAME")
            .map(|s| s.trim_start_matches('@').to_string())
            .filter(|s| !s.is_empty());

        let webhook_url = var("WEBHOOK_URL")
            .map(|raw| parse_url("WEBHOOK_URL", &raw))
            .transpose()?;

        let site_url = parse_url(
            "SITE_URL",
            &var("SITE_URL").unwrap_or_else(|| DEFAULT_SITE_URL.to_string()),
        )?;

        let host = match var("HOST") {
            Some(raw) => raw.parse::<IpAddr>().map_err(|e| ConfigError::Invalid {
                var: "HOST",
                reason: e.to_string(),
            })?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };

        let port = match var("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::Invalid {
                var: "PORT",
                reason: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        let timeout_secs = match var("REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw.parse::<u64>().map_err(|e| ConfigError::Invalid {
                var: "REQUEST_TIMEOUT_SECS",
                reason: e.to_string(),
            })?,
            None => DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        Ok(Self {
            bot_token,
            bot_username,
            webhook_url,
            request_timeout: Duration::from_secs(timeout_secs),
            listen_addr: SocketAddr::new(host, port),
            site_url,
        })
    }

    /// Full URL Telegram should push updates to, if a public base URL is configured.
    pub fn webhook_endpoint(&self) -> Option<Result<Url, ConfigError>> {
        let base = self.webhook_url.as_ref()?;
        let joined = format!("{}/{}", base.as_str().trim_end_matches('/'), self.bot_token);
        Some(parse_url("WEBHOOK_URL", &joined))
    }
}

fn parse_url(var: &'static str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|e| ConfigError::Invalid {
        var,
        reason: e.to_string(),
    })
}
