//! Notifier configuration
//!
//! Settings for the out-of-band channel that announces freshly issued
//! one-time codes. The stock provider is a Telegram bot; the mock provider
//! is used in development and tests.

use serde::{Deserialize, Serialize};

/// Notifier configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NotifierConfig {
    /// Provider selector: "telegram" or "mock"
    pub provider: String,

    /// Telegram bot token (required for the telegram provider)
    #[serde(default)]
    pub telegram_bot_token: Option<String>,

    /// Request timeout in seconds
    pub timeout_seconds: u64,

    /// Maximum delivery attempts for transient failures
    pub max_retries: u32,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            provider: String::from("telegram"),
            telegram_bot_token: None,
            timeout_seconds: 10,
            max_retries: 3,
        }
    }
}

impl NotifierConfig {
    /// Create from environment variables
    ///
    /// Reads `NOTIFIER_PROVIDER`, `TELEGRAM_BOT_TOKEN`,
    /// `NOTIFIER_TIMEOUT_SECONDS` and `NOTIFIER_MAX_RETRIES`.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let provider = std::env::var("NOTIFIER_PROVIDER")
            .unwrap_or_else(|_| defaults.provider.clone())
            .to_lowercase();
        let telegram_bot_token = std::env::var("TELEGRAM_BOT_TOKEN").ok().filter(|t| !t.is_empty());
        let timeout_seconds = std::env::var("NOTIFIER_TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|t| *t > 0)
            .unwrap_or(defaults.timeout_seconds);
        let max_retries = std::env::var("NOTIFIER_MAX_RETRIES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.max_retries);

        Self {
            provider,
            telegram_bot_token,
            timeout_seconds,
            max_retries,
        }
    }

    /// Configuration for the mock provider
    pub fn mock() -> Self {
        Self {
            provider: String::from("mock"),
            ..Default::default()
        }
    }

    /// Check whether the configured provider can actually be constructed
    pub fn is_complete(&self) -> bool {
        match self.provider.as_str() {
            "telegram" => self.telegram_bot_token.is_some(),
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_telegram_requires_token() {
        let config = NotifierConfig::default();
        assert_eq!(config.provider, "telegram");
        assert!(!config.is_complete());
    }

    #[test]
    fn test_mock_is_always_complete() {
        let config = NotifierConfig::mock();
        assert!(config.is_complete());
    }
}
