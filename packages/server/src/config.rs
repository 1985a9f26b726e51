use anyhow::{bail, Context, Result};
use dotenvy::dotenv;
use outfit_finder::{FinderConfig, SecretString};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Default chat model.
pub const DEFAULT_XAI_MODEL: &str = "grok-4";

/// Every variable the bot reads, for masked startup logging.
pub const ENV_VARS: &[&str] = &[
    "TELEGRAM_BOT_TOKEN",
    "XAI_API_KEY",
    "XAI_MODEL",
    "XAI_BASE_URL",
    "CATALOG_MODE",
    "BOT_MODE",
    "WEBHOOK_BASE_URL",
    "PORT",
    "CATALOG_PATH",
    "MAX_ATTEMPTS",
    "VALIDATION_CONCURRENCY",
    "HTTP_TIMEOUT_SECS",
    "FETCH_TITLES",
    "FALLBACK_ENABLED",
];

/// How updates reach the bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotMode {
    Polling,
    Webhook,
}

impl FromStr for BotMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "polling" => Ok(Self::Polling),
            "webhook" => Ok(Self::Webhook),
            other => bail!("BOT_MODE must be 'polling' or 'webhook', got '{}'", other),
        }
    }
}

/// Where suggestions come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogMode {
    /// Model with live web search and citations
    Search,
    /// Model without search
    Generative,
    /// Static catalog only, no model calls
    Local,
}

impl FromStr for CatalogMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "search" => Ok(Self::Search),
            "generative" => Ok(Self::Generative),
            "local" => Ok(Self::Local),
            other => bail!(
                "CATALOG_MODE must be 'search', 'generative' or 'local', got '{}'",
                other
            ),
        }
    }
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub telegram_bot_token: SecretString,
    pub xai_api_key: SecretString,
    pub xai_model: String,
    pub xai_base_url: String,
    pub catalog_mode: CatalogMode,
    pub bot_mode: BotMode,
    /// Public root the webhook is registered under (webhook mode)
    pub webhook_base_url: Option<String>,
    /// Listen port (webhook mode)
    pub port: Option<u16>,
    pub catalog_path: Option<PathBuf>,
    pub finder: FinderConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from any variable source. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let telegram_bot_token = get("TELEGRAM_BOT_TOKEN").context("TELEGRAM_BOT_TOKEN must be set")?;
        let xai_api_key = get("XAI_API_KEY").context("XAI_API_KEY must be set")?;

        let bot_mode = get("BOT_MODE")
            .map(|v| v.parse())
            .transpose()?
            .unwrap_or(BotMode::Polling);
        let catalog_mode = get("CATALOG_MODE")
            .map(|v| v.parse())
            .transpose()?
            .unwrap_or(CatalogMode::Search);

        let port = get("PORT")
            .map(|v| v.parse::<u16>())
            .transpose()
            .context("PORT must be a valid number")?;
        let webhook_base_url = get("WEBHOOK_BASE_URL");

        if bot_mode == BotMode::Webhook {
            if webhook_base_url.is_none() {
                bail!("WEBHOOK_BASE_URL must be set in webhook mode");
            }
            if port.is_none() {
                bail!("PORT must be set in webhook mode");
            }
        }

        let mut finder = FinderConfig::default();
        if let Some(v) = get("MAX_ATTEMPTS") {
            finder = finder.with_max_attempts(v.parse().context("MAX_ATTEMPTS must be a number")?);
        }
        if let Some(v) = get("VALIDATION_CONCURRENCY") {
            finder = finder
                .with_concurrency(v.parse().context("VALIDATION_CONCURRENCY must be a number")?);
        }
        if let Some(v) = get("HTTP_TIMEOUT_SECS") {
            let secs: u64 = v.parse().context("HTTP_TIMEOUT_SECS must be a number")?;
            finder = finder.with_http_timeout(Duration::from_secs(secs.max(1)));
        }
        if let Some(v) = get("FETCH_TITLES") {
            finder = finder.with_titles(parse_flag(&v).context("FETCH_TITLES must be true or false")?);
        }
        if let Some(v) = get("FALLBACK_ENABLED") {
            finder =
                finder.with_fallback(parse_flag(&v).context("FALLBACK_ENABLED must be true or false")?);
        }

        Ok(Self {
            telegram_bot_token: SecretString::new(telegram_bot_token),
            xai_api_key: SecretString::new(xai_api_key),
            xai_model: get("XAI_MODEL").unwrap_or_else(|| DEFAULT_XAI_MODEL.to_string()),
            xai_base_url: get("XAI_BASE_URL")
                .unwrap_or_else(|| xai_client::DEFAULT_BASE_URL.to_string()),
            catalog_mode,
            bot_mode,
            webhook_base_url,
            port,
            catalog_path: get("CATALOG_PATH").map(PathBuf::from),
            finder,
        })
    }

    /// Path the webhook is served on, `/webhook/<token>`.
    pub fn webhook_path(&self) -> String {
        format!("/webhook/{}", self.telegram_bot_token.expose())
    }

    /// Full URL registered with `setWebhook`.
    pub fn webhook_url(&self) -> Option<String> {
        self.webhook_base_url
            .as_ref()
            .map(|base| format!("{}{}", base.trim_end_matches('/'), self.webhook_path()))
    }
}

/// Value shown for one variable in the startup dump.
///
/// Only a short prefix is kept, since the dump includes the bot token and API
/// key.
pub fn masked_env_value(value: &str) -> String {
    let secret = SecretString::new(value);
    if secret.is_empty() {
        return "(empty)".to_string();
    }
    format!("{}  ({} chars)", secret.masked(), value.chars().count())
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
