//! Mock notifier implementation for development and testing
//!
//! Prints messages to the console instead of delivering them, generates
//! mock message ids, and counts sends so tests can assert on delivery
//! attempts without any external service.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use td_core::services::auth::NotifierService;

/// Mock notifier
#[derive(Clone)]
pub struct MockNotifier {
    /// Count of messages handed to this notifier
    message_count: Arc<AtomicU64>,
    /// Whether every send should fail
    simulate_failure: bool,
    /// Whether to print messages to the console
    console_output: bool,
}

impl MockNotifier {
    /// Create a new mock notifier that prints to the console
    pub fn new() -> Self {
        Self {
            message_count: Arc::new(AtomicU64::new(0)),
            simulate_failure: false,
            console_output: true,
        }
    }

    /// Create a mock notifier with explicit behaviour
    pub fn with_options(console_output: bool, simulate_failure: bool) -> Self {
        Self {
            message_count: Arc::new(AtomicU64::new(0)),
            simulate_failure,
            console_output,
        }
    }

    /// Number of messages handed to this notifier so far
    pub fn get_message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }

    /// Reset the message counter
    pub fn reset_counter(&self) {
        self.message_count.store(0, Ordering::SeqCst);
    }

    /// Toggle failure simulation
    pub fn set_simulate_failure(&mut self, simulate: bool) {
        self.simulate_failure = simulate;
    }
}

impl Default for MockNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotifierService for MockNotifier {
    async fn send_message(&self, address: &str, text: &str) -> Result<String, String> {
        if address.is_empty() {
            return Err("Empty delivery address".to_string());
        }

        // Simulate network delay
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;

        if self.simulate_failure {
            warn!("Mock notifier simulating delivery failure");
            return Err("Simulated delivery failure".to_string());
        }

        let message_id = format!("mock_{}", Uuid::new_v4());
        let count = self.message_count.fetch_add(1, Ordering::SeqCst) + 1;

        if self.console_output {
            println!("\n{}", "=".repeat(60));
            println!("MOCK NOTIFIER - MESSAGE #{}", count);
            println!("{}", "=".repeat(60));
            println!("To: {}", address);
            println!("Message ID: {}", message_id);
            println!("Content: {}", text);
            println!("{}\n", "=".repeat(60));
        }

        info!(
            message_id = %message_id,
            message_length = text.len(),
            "Message sent (mock)"
        );

        Ok(message_id)
    }

    fn channel_name(&self) -> &str {
        "mock"
    }

    fn is_available(&self) -> bool {
        !self.simulate_failure
    }
}
