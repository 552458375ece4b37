//! # Infrastructure Layer
//!
//! This crate implements the infrastructure layer for the TrustDial
//! backend. It provides the concrete implementations behind the repository
//! and notifier traits defined in `td_core`:
//!
//! - **Database**: MySQL repositories over SQLx, plus pool management and
//!   embedded migrations
//! - **Notifier**: Telegram Bot API delivery for one-time codes, and a
//!   mock provider for development and tests
//!
//! Storage failures are mapped into `DomainError::Internal` at the trait
//! boundary; everything below that boundary uses [`InfrastructureError`].

pub mod database;
pub mod notifier;

pub use database::connection::{DatabasePool, PoolStatistics};
pub use database::mysql::{
    MySqlAuditLogRepository, MySqlDirectoryRepository, MySqlUserRepository,
};
pub use notifier::{create_notifier, MockNotifier, TelegramNotifier};

/// Load environment variables from a `.env` file if one is present
///
/// Call once at process start, before reading any configuration. Missing
/// files are not an error; deployed environments set real variables.
pub fn load_environment() {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded environment from .env file"),
        Err(_) => tracing::debug!("No .env file found, using process environment"),
    }
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection or query error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Database migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Notifier delivery error
    #[error("Notifier error: {0}")]
    Notifier(String),
}
