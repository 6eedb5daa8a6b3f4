//! # Configuration Module
//!
//! This module defines configuration structures for the bot process,
//! including data-source recovery settings and the search deep-link template.
//! Everything is read from the environment at startup; nothing secret is
//! compiled into the binary.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::errors::ConfigError;

// Constants for bot configuration
pub const DEFAULT_SEARCH_URL_TEMPLATE: &str =
    "https://search.naver.com/search.naver?sm=top_hty&fbm=1&ie=utf8&query={query}";
pub const SEARCH_QUERY_PLACEHOLDER: &str = "{query}";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// How a callback payload is matched against the district labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CallbackMatch {
    /// Payload must equal a district label
    #[default]
    Exact,
    /// Payload only has to contain a district label
    Substring,
}

impl FromStr for CallbackMatch {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exact" => Ok(CallbackMatch::Exact),
            "substring" => Ok(CallbackMatch::Substring),
            other => Err(ConfigError::Invalid {
                key: "CALLBACK_MATCH",
                value: other.to_string(),
            }),
        }
    }
}

/// Recovery configuration for data-source lookups
#[derive(Debug, Clone)]
pub struct RecoveryConfig {
    /// Maximum number of retry attempts after the first try
    pub max_retries: u32,
    /// Base delay between retries in milliseconds
    pub base_retry_delay_ms: u64,
    /// Maximum delay between retries in milliseconds
    pub max_retry_delay_ms: u64,
    /// Timeout for a single query in seconds
    pub query_timeout_secs: u64,
    /// Circuit breaker failure threshold
    pub circuit_breaker_threshold: u32,
    /// Circuit breaker reset timeout in seconds
    pub circuit_breaker_reset_secs: u64,
}

impl RecoveryConfig {
    /// Backoff before retry number `attempt` (1-based) without jitter, in milliseconds
    pub fn backoff_ms(&self, attempt: u32) -> u64 {
        let exponent = attempt.saturating_sub(1).min(16);
        self.base_retry_delay_ms
            .saturating_mul(1u64 << exponent)
            .min(self.max_retry_delay_ms)
    }

    /// Longest a single district lookup can take: every attempt timing out
    /// plus the largest possible backoff between attempts
    pub fn worst_case_lookup(&self) -> Duration {
        let attempts = u64::from(self.max_retries) + 1;
        let mut total_ms = self.query_timeout_secs.saturating_mul(1000).saturating_mul(attempts);
        for attempt in 1..=self.max_retries {
            let backoff = self.backoff_ms(attempt);
            total_ms = total_ms.saturating_add((backoff + backoff / 10).min(self.max_retry_delay_ms));
        }
        Duration::from_millis(total_ms)
    }
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_retry_delay_ms: 200,
            max_retry_delay_ms: 2000,
            query_timeout_secs: 3,
            circuit_breaker_threshold: 5,
            circuit_breaker_reset_secs: 30,
        }
    }
}

/// Configuration structure for the bot process
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub bot_token: String,
    pub database_url: String,
    /// Deep-link template, `{query}` is replaced by the encoded store name
    pub search_url_template: String,
    pub callback_match: CallbackMatch,
    pub max_connections: u32,
    pub recovery: RecoveryConfig,
}

impl BotConfig {
    /// Build the configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup
    ///
    /// Split out from [`BotConfig::from_env`] so tests can feed a map instead
    /// of mutating the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| -> Result<String, ConfigError> {
            match lookup(key) {
                Some(value) if !value.trim().is_empty() => Ok(value),
                _ => Err(ConfigError::Missing(key)),
            }
        };

        let search_url_template = lookup("SEARCH_URL_TEMPLATE")
            .unwrap_or_else(|| DEFAULT_SEARCH_URL_TEMPLATE.to_string());
        if !search_url_template.contains(SEARCH_QUERY_PLACEHOLDER) {
            return Err(ConfigError::Invalid {
                key: "SEARCH_URL_TEMPLATE",
                value: search_url_template,
            });
        }

        let callback_match = match lookup("CALLBACK_MATCH") {
            Some(value) => value.parse()?,
            None => CallbackMatch::default(),
        };

        let defaults = RecoveryConfig::default();
        let query_timeout_secs: u64 =
            parse_or(&lookup, "QUERY_TIMEOUT_SECS", defaults.query_timeout_secs)?;
        if query_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "QUERY_TIMEOUT_SECS",
                value: query_timeout_secs.to_string(),
            });
        }

        let recovery = RecoveryConfig {
            max_retries: parse_or(&lookup, "QUERY_MAX_RETRIES", defaults.max_retries)?,
            query_timeout_secs,
            circuit_breaker_threshold: parse_or(
                &lookup,
                "CIRCUIT_BREAKER_THRESHOLD",
                defaults.circuit_breaker_threshold,
            )?,
            circuit_breaker_reset_secs: parse_or(
                &lookup,
                "CIRCUIT_BREAKER_RESET_SECS",
                defaults.circuit_breaker_reset_secs,
            )?,
            ..defaults
        };

        Ok(Self {
            bot_token: required("TELEGRAM_BOT_TOKEN")?,
            database_url: required("DATABASE_URL")?,
            search_url_template,
            callback_match,
            max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?,
            recovery,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = BotConfig::from_lookup(lookup_from(&[
            ("TELEGRAM_BOT_TOKEN", "token"),
            ("DATABASE_URL", "postgres://localhost/matjip"),
        ]))
        .unwrap();

        assert_eq!(config.search_url_template, DEFAULT_SEARCH_URL_TEMPLATE);
        assert_eq!(config.callback_match, CallbackMatch::Exact);
        assert_eq!(config.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert_eq!(config.recovery.query_timeout_secs, 3);
    }

    #[test]
    fn test_missing_token_is_an_error() {
        let err = BotConfig::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://x")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Missing("TELEGRAM_BOT_TOKEN")));
    }

    #[test]
    fn test_template_without_placeholder_is_rejected() {
        let err = BotConfig::from_lookup(lookup_from(&[
            ("TELEGRAM_BOT_TOKEN", "token"),
            ("DATABASE_URL", "postgres://x"),
            ("SEARCH_URL_TEMPLATE", "https://example.com/search"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "SEARCH_URL_TEMPLATE", .. }));
    }

    #[test]
    fn test_overrides_are_parsed() {
        let config = BotConfig::from_lookup(lookup_from(&[
            ("TELEGRAM_BOT_TOKEN", "token"),
            ("DATABASE_URL", "postgres://x"),
            ("CALLBACK_MATCH", "Substring"),
            ("QUERY_TIMEOUT_SECS", "12"),
            ("CIRCUIT_BREAKER_THRESHOLD", "3"),
        ]))
        .unwrap();

        assert_eq!(config.callback_match, CallbackMatch::Substring);
        assert_eq!(config.recovery.query_timeout_secs, 12);
        assert_eq!(config.recovery.circuit_breaker_threshold, 3);
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let err = BotConfig::from_lookup(lookup_from(&[
            ("TELEGRAM_BOT_TOKEN", "token"),
            ("DATABASE_URL", "postgres://x"),
            ("QUERY_TIMEOUT_SECS", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "QUERY_TIMEOUT_SECS", .. }));
    }

    #[test]
    fn test_worst_case_lookup() {
        let recovery = RecoveryConfig {
            max_retries: 2,
            base_retry_delay_ms: 100,
            max_retry_delay_ms: 1000,
            query_timeout_secs: 2,
            ..Default::default()
        };
        // 3 timeouts of 2s, then backoffs of at most 110ms and 220ms
        assert_eq!(recovery.worst_case_lookup(), Duration::from_millis(6330));
    }

    #[test]
    fn test_default_lookup_finishes_within_ten_seconds() {
        assert!(RecoveryConfig::default().worst_case_lookup() < Duration::from_secs(10));
    }

    #[test]
    fn test_unparsable_number_is_rejected() {
        let err = BotConfig::from_lookup(lookup_from(&[
            ("TELEGRAM_BOT_TOKEN", "token"),
            ("DATABASE_URL", "postgres://x"),
            ("QUERY_MAX_RETRIES", "many"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "QUERY_MAX_RETRIES", .. }));
    }
}
