//! Shared utilities and common types for the TrustDial server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types loaded from the environment
//! - Utility functions (phone number canonicalization, masking)

pub mod config;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{AppConfig, AuthConfig, DatabaseConfig, Environment, NotifierConfig};
pub use utils::phone;
