//! Telegram notifier implementation
//!
//! Delivers one-time codes through the Telegram Bot API. The `address` a
//! user carries in `notify_address` is their Telegram chat id.
//!
//! Transient failures (timeouts, connection drops, 429, 5xx) are retried
//! with exponential backoff; permanent failures (other 4xx, rejected
//! payloads) are reported immediately. Either way the failure is advisory
//! to issuance: the caller already persisted the code.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info, warn};

use td_core::services::auth::NotifierService;
use td_shared::config::NotifierConfig;

use crate::InfrastructureError;

const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Telegram notifier configuration
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    /// Bot token issued by BotFather
    pub bot_token: String,
    /// Timeout for API requests in seconds
    pub request_timeout_secs: u64,
    /// Maximum attempts for transient failures
    pub max_retries: u32,
    /// Initial retry delay in milliseconds
    pub retry_delay_ms: u64,
}

impl TelegramConfig {
    /// Build from the shared notifier configuration
    pub fn from_notifier_config(config: &NotifierConfig) -> Result<Self, InfrastructureError> {
        let bot_token = config
            .telegram_bot_token
            .clone()
            .ok_or_else(|| InfrastructureError::Config("TELEGRAM_BOT_TOKEN not set".to_string()))?;

        Ok(Self {
            bot_token,
            request_timeout_secs: config.timeout_seconds,
            max_retries: config.max_retries,
            retry_delay_ms: 1000,
        })
    }

    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self, InfrastructureError> {
        Self::from_notifier_config(&NotifierConfig::from_env())
    }
}

/// Response envelope returned by the Bot API
#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    result: Option<SentMessage>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SentMessage {
    message_id: i64,
}

/// Telegram notifier implementation
pub struct TelegramNotifier {
    client: reqwest::Client,
    config: TelegramConfig,
}

impl TelegramNotifier {
    /// Create a new Telegram notifier
    pub fn new(config: TelegramConfig) -> Result<Self, InfrastructureError> {
        if config.bot_token.is_empty() {
            return Err(InfrastructureError::Config(
                "Telegram bot token must not be empty".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        info!("Telegram notifier initialized");

        Ok(Self { client, config })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self, InfrastructureError> {
        Self::new(TelegramConfig::from_env()?)
    }

    fn send_message_url(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            TELEGRAM_API_BASE, self.config.bot_token
        )
    }

    /// Whether a failed HTTP status is worth repeating
    fn is_retryable_status(status: reqwest::StatusCode) -> bool {
        status.as_u16() == 429 || status.is_server_error()
    }

    /// Send a message with retry logic
    async fn send_with_retry(
        &self,
        chat_id: &str,
        text: &str,
    ) -> Result<String, InfrastructureError> {
        let mut attempts = 0;
        let mut delay = Duration::from_millis(self.config.retry_delay_ms);

        loop {
            attempts += 1;

            debug!(
                attempt = attempts,
                max_attempts = self.config.max_retries,
                "Sending Telegram message"
            );

            let response = self
                .client
                .post(self.send_message_url())
                .json(&json!({ "chat_id": chat_id, "text": text }))
                .send()
                .await;

            match response {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        let body: ApiResponse = response.json().await?;
                        return match body.result {
                            Some(message) if body.ok => {
                                info!(
                                    message_id = message.message_id,
                                    "Telegram message accepted"
                                );
                                Ok(message.message_id.to_string())
                            }
                            _ => Err(InfrastructureError::Notifier(
                                body.description
                                    .unwrap_or_else(|| "Telegram rejected the message".to_string()),
                            )),
                        };
                    }

                    let description = response
                        .json::<ApiResponse>()
                        .await
                        .ok()
                        .and_then(|body| body.description)
                        .unwrap_or_else(|| format!("HTTP {}", status));

                    if !Self::is_retryable_status(status) {
                        return Err(InfrastructureError::Notifier(description));
                    }

                    warn!(
                        status = %status,
                        attempt = attempts,
                        "Transient Telegram failure"
                    );

                    if attempts >= self.config.max_retries {
                        return Err(InfrastructureError::Notifier(format!(
                            "Gave up after {} attempts: {}",
                            attempts, description
                        )));
                    }
                }
                Err(e) => {
                    // Timeouts and connection drops are transient, anything
                    // else comes back as-is.
                    if !(e.is_timeout() || e.is_connect()) {
                        return Err(InfrastructureError::Http(e));
                    }

                    warn!(
                        error = %e,
                        attempt = attempts,
                        "Telegram request did not complete"
                    );

                    if attempts >= self.config.max_retries {
                        return Err(InfrastructureError::Notifier(format!(
                            "Gave up after {} attempts: {}",
                            attempts, e
                        )));
                    }
                }
            }

            tokio::time::sleep(delay).await;
            delay *= 2;
        }
    }
}

#[async_trait]
impl NotifierService for TelegramNotifier {
    async fn send_message(&self, address: &str, text: &str) -> Result<String, String> {
        if address.is_empty() {
            return Err("Empty delivery address".to_string());
        }

        self.send_with_retry(address, text)
            .await
            .map_err(|e| e.to_string())
    }

    fn channel_name(&self) -> &str {
        "telegram"
    }

    fn is_available(&self) -> bool {
        !self.config.bot_token.is_empty()
    }
}
