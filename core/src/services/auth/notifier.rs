//! Trait for out-of-band code delivery integration

use async_trait::async_trait;

/// Trait for the out-of-band message transport
///
/// Delivery is advisory to the issuance flow: by the time a send is
/// attempted the code is already persisted and valid, so implementations
/// report failures as values rather than panicking or retrying forever.
#[async_trait]
pub trait NotifierService: Send + Sync {
    /// Send a message to a delivery address
    ///
    /// # Arguments
    /// * `address` - Provider-specific delivery address (a chat id for the
    ///   stock Telegram notifier)
    /// * `text` - Message body
    ///
    /// # Returns
    /// * `Ok(message_id)` - Provider's identifier for the accepted message
    /// * `Err(reason)` - Human-readable reason the send failed
    async fn send_message(&self, address: &str, text: &str) -> Result<String, String>;

    /// Name of the delivery channel, for logs and diagnostics
    fn channel_name(&self) -> &str;

    /// Whether the notifier is configured well enough to attempt sends
    fn is_available(&self) -> bool;
}
