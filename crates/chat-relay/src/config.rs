//! Relay configuration, read from the environment.
//!
//! | variable                      | default               |
//! |-------------------------------|-----------------------|
//! | `RELAY_ADDR`                  | `0.0.0.0:3000`        |
//! | `WEBHOOK_URL`                 | unset                 |
//! | `WEBHOOK_API_KEY`             | unset                 |
//! | `WEBHOOK_USER_AGENT`          | `Textify-Chatbot/1.0` |
//! | `WEBHOOK_TIMEOUT_MS`          | `30000`               |
//! | `WEBHOOK_RETRY_ATTEMPTS`      | `0`                   |
//! | `WEBHOOK_RETRY_DELAY_MS`      | `1000`                |
//! | `WEBHOOK_RETRY_MAX_DELAY_MS`  | `8000`                |
//!
//! An unset `WEBHOOK_URL` does not stop the server; each request then fails
//! with a configuration error.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::retry::RetryPolicy;

pub const DEFAULT_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_USER_AGENT: &str = "Textify-Chatbot/1.0";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

#[derive(Error, Debug, PartialEq)]
#[error("Invalid {var}={value:?}: {reason}")]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WebhookConfig {
    pub url: Option<String>,
    pub api_key: Option<String>,
    pub user_agent: String,
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            retry: RetryPolicy::disabled(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RelayConfig {
    pub addr: SocketAddr,
    pub webhook: WebhookConfig,
}

impl RelayConfig {
    /// Read from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read through `lookup`; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| {
            lookup(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = WebhookConfig::default();
        let default_retry = RetryPolicy::disabled();

        let addr = parse("RELAY_ADDR", get("RELAY_ADDR"), DEFAULT_ADDR.parse().ok())?;
        let timeout_ms = parse("WEBHOOK_TIMEOUT_MS", get("WEBHOOK_TIMEOUT_MS"), Some(DEFAULT_TIMEOUT_MS))?;
        let attempts = parse("WEBHOOK_RETRY_ATTEMPTS", get("WEBHOOK_RETRY_ATTEMPTS"), Some(default_retry.attempts))?;
        let delay_ms = parse(
            "WEBHOOK_RETRY_DELAY_MS",
            get("WEBHOOK_RETRY_DELAY_MS"),
            Some(default_retry.base_delay.as_millis() as u64),
        )?;
        let max_delay_ms = parse(
            "WEBHOOK_RETRY_MAX_DELAY_MS",
            get("WEBHOOK_RETRY_MAX_DELAY_MS"),
            Some(default_retry.max_delay.as_millis() as u64),
        )?;

        if timeout_ms == 0 {
            return Err(ConfigError {
                var: "WEBHOOK_TIMEOUT_MS",
                value: "0".to_string(),
                reason: "timeout must be greater than zero".to_string(),
            });
        }

        Ok(Self {
            addr,
            webhook: WebhookConfig {
                url: get("WEBHOOK_URL"),
                api_key: get("WEBHOOK_API_KEY"),
                user_agent: get("WEBHOOK_USER_AGENT").unwrap_or(defaults.user_agent),
                timeout: Duration::from_millis(timeout_ms),
                retry: RetryPolicy {
                    attempts,
                    base_delay: Duration::from_millis(delay_ms),
                    max_delay: Duration::from_millis(max_delay_ms.max(delay_ms)),
                },
            },
        })
    }
}

fn parse<T>(var: &'static str, raw: Option<String>, default: Option<T>) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(value) => value.parse().map_err(|e: T::Err| ConfigError {
            var,
            reason: e.to_string(),
            value,
        }),
        None => default.ok_or_else(|| ConfigError {
            var,
            value: String::new(),
            reason: "missing".to_string(),
        }),
    }
}
