//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical business areas:
//! - `auth` - OTP cutoff and session horizon configuration
//! - `database` - Database connection and pool configuration
//! - `environment` - Environment detection
//! - `notifier` - Out-of-band message delivery configuration

pub mod auth;
pub mod database;
pub mod environment;
pub mod notifier;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use auth::AuthConfig;
pub use database::DatabaseConfig;
pub use environment::Environment;
pub use notifier::NotifierConfig;

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Authentication configuration
    pub auth: AuthConfig,

    /// Notifier configuration
    #[serde(default)]
    pub notifier: NotifierConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            database: DatabaseConfig::default(),
            auth: AuthConfig::default(),
            notifier: NotifierConfig::default(),
        }
    }
}

impl AppConfig {
    /// Create configuration for development environment
    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig::new("mysql://localhost:3306/trustdial_dev"),
            auth: AuthConfig::default(),
            notifier: NotifierConfig::mock(),
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            environment: Environment::from_env(),
            database: DatabaseConfig::from_env(),
            auth: AuthConfig::from_env(),
            notifier: NotifierConfig::from_env(),
        }
    }
}
