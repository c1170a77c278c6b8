//! Bot configuration
//!
//! Everything the bot needs is read from the process environment once at
//! startup and then handed to the components by reference.

use std::{env, time::Duration};

use thiserror::Error;

pub const DEFAULT_ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";
pub const DEFAULT_TELEGRAM_API: &str = "https://api.telegram.org";
const DEFAULT_RETRY_PERIOD_SECS: u64 = 600;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

const REQUIRED_VARS: [&str; 3] = ["PRACTICUM_TOKEN", "TELEGRAM_TOKEN", "TELEGRAM_CHAT_ID"];

#[derive(Debug, Clone)]
pub struct Config {
    /// OAuth token for the homework API
    pub practicum_token: String,

    /// Telegram bot token
    pub telegram_token: String,

    /// Chat that receives every notification
    pub telegram_chat_id: String,

    /// Pause between two poll cycles
    pub retry_period: Duration,

    /// Homework status endpoint
    pub endpoint: String,

    /// Telegram Bot API base URL
    pub telegram_api_url: String,

    /// Timeout applied to every outbound request
    pub request_timeout: Duration,

    /// How far back the first poll looks
    pub lookback: Duration,
}

impl Config {
    /// Creates configuration from environment variables
    ///
    /// Required: PRACTICUM_TOKEN, TELEGRAM_TOKEN, TELEGRAM_CHAT_ID.
    /// Optional: RETRY_PERIOD (seconds, default 600), PRACTICUM_ENDPOINT,
    /// TELEGRAM_API_URL, REQUEST_TIMEOUT (seconds, default 30),
    /// POLL_LOOKBACK (seconds, default 0).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let missing: Vec<&'static str> = REQUIRED_VARS
            .into_iter()
            .filter(|key| read(*key).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }

        let required = |key: &'static str| read(key).ok_or(ConfigError::Missing(vec![key]));
        let seconds = |key: &'static str, default: u64| match read(key) {
            None => Ok(Duration::from_secs(default)),
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::InvalidNumber { key, value: raw }),
        };

        let config = Self {
            practicum_token: required("PRACTICUM_TOKEN")?,
            telegram_token: required("TELEGRAM_TOKEN")?,
            telegram_chat_id: required("TELEGRAM_CHAT_ID")?,
            retry_period: seconds("RETRY_PERIOD", DEFAULT_RETRY_PERIOD_SECS)?,
            endpoint: read("PRACTICUM_ENDPOINT").unwrap_or_else(|| DEFAULT_ENDPOINT.to_owned()),
            telegram_api_url: read("TELEGRAM_API_URL")
                .map(|url| url.trim_end_matches('/').to_owned())
                .unwrap_or_else(|| DEFAULT_TELEGRAM_API.to_owned()),
            request_timeout: seconds("REQUEST_TIMEOUT", DEFAULT_REQUEST_TIMEOUT_SECS)?,
            lookback: seconds("POLL_LOOKBACK", 0)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.retry_period.is_zero() {
            return Err(ConfigError::Invalid("RETRY_PERIOD must be greater than 0"));
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::Invalid("REQUEST_TIMEOUT must be greater than 0"));
        }
        for url in [&self.endpoint, &self.telegram_api_url] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::Invalid(
                    "PRACTICUM_ENDPOINT and TELEGRAM_API_URL must start with http:// or https://",
                ));
            }
        }
        Ok(())
    }

    /// First `from_date` to poll with, given the current unix time.
    pub fn start_cursor(&self, now: i64) -> i64 {
        let lookback = i64::try_from(self.lookback.as_secs()).unwrap_or(i64::MAX);
        now.saturating_sub(lookback).max(0)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("required environment variables are not set: {}", .0.join(", "))]
    Missing(Vec<&'static str>),
    #[error("{key} must be a whole number of seconds, got `{value}`")]
    InvalidNumber { key: &'static str, value: String },
    #[error("{0}")]
    Invalid(&'static str),
}
