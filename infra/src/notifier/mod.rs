//! Notifier module - out-of-band delivery of one-time codes
//!
//! Delivery is advisory. A failed send never rolls back the code that was
//! already persisted; callers surface the failure as a delivery status.

pub mod mock;
pub mod telegram;

pub use mock::MockNotifier;
pub use telegram::{TelegramConfig, TelegramNotifier};

use td_core::services::auth::NotifierService;
use td_shared::config::NotifierConfig;

/// Create a notifier based on configuration
///
/// Selects the provider named by `config.provider` and falls back to the
/// mock provider when the requested one cannot be constructed, so a
/// missing bot token degrades delivery instead of blocking startup.
pub fn create_notifier(config: &NotifierConfig) -> Box<dyn NotifierService> {
    match config.provider.as_str() {
        "mock" => {
            tracing::info!("Using mock notifier");
            Box::new(MockNotifier::new())
        }
        "telegram" => {
            match TelegramConfig::from_notifier_config(config).and_then(TelegramNotifier::new) {
                Ok(notifier) => Box::new(notifier),
                Err(e) => {
                    tracing::error!("Failed to initialize Telegram notifier: {}", e);
                    tracing::warn!("Falling back to mock notifier");
                    Box::new(MockNotifier::new())
                }
            }
        }
        other => {
            tracing::warn!(
                "Unknown notifier provider '{}', using mock implementation",
                other
            );
            Box::new(MockNotifier::new())
        }
    }
}
