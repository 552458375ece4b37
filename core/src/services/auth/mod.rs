//! Authentication service module
//!
//! This module provides the account-facing authentication system:
//! - Daily-cutoff one-time codes bound to a single device per user
//! - Static-password login for administrators
//! - Client-held sessions validated by expiry alone
//! - Advisory out-of-band code delivery through a notifier

mod config;
mod cutoff;
mod device;
mod notifier;
mod otp;
mod service;

#[cfg(test)]
mod tests;

pub use config::AuthServiceConfig;
pub use cutoff::CutoffPolicy;
pub use notifier::NotifierService;
pub use otp::{OtpGenerator, OTP_LENGTH};
pub use service::AuthService;

// Export device binding helpers for public use
pub use device::{is_well_formed_device_id, mint_device_id, resolve_device_id};
