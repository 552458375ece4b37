//! Authentication configuration
//!
//! Settings for the daily-cutoff OTP scheme and session horizons. One-time
//! codes expire at a fixed wall-clock hour each day rather than after a
//! per-code TTL, so the cutoff hour and the deployment's UTC offset are
//! configuration, not code.

use serde::{Deserialize, Serialize};

/// Authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Local hour of day (0-23) at which outstanding OTPs expire
    pub cutoff_hour: u32,

    /// UTC offset of the deployment's wall clock, in whole hours
    pub utc_offset_hours: i32,

    /// Admin session horizon in days
    pub admin_session_days: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            cutoff_hour: 13,
            utc_offset_hours: 3,
            admin_session_days: 365,
        }
    }
}

impl AuthConfig {
    /// Create from environment variables
    ///
    /// Reads `OTP_CUTOFF_HOUR`, `OTP_UTC_OFFSET_HOURS` and
    /// `ADMIN_SESSION_DAYS`. Missing or out-of-range values fall back to
    /// the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let cutoff_hour = std::env::var("OTP_CUTOFF_HOUR")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|h| *h < 24)
            .unwrap_or(defaults.cutoff_hour);
        let utc_offset_hours = std::env::var("OTP_UTC_OFFSET_HOURS")
            .ok()
            .and_then(|v| v.parse::<i32>().ok())
            .filter(|o| (-12..=14).contains(o))
            .unwrap_or(defaults.utc_offset_hours);
        let admin_session_days = std::env::var("ADMIN_SESSION_DAYS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .filter(|d| *d > 0)
            .unwrap_or(defaults.admin_session_days);

        Self {
            cutoff_hour,
            utc_offset_hours,
            admin_session_days,
        }
    }

    /// Set the daily cutoff hour (0-23); out-of-range values are ignored
    pub fn with_cutoff_hour(mut self, hour: u32) -> Self {
        if hour < 24 {
            self.cutoff_hour = hour;
        }
        self
    }

    /// Set the deployment UTC offset in whole hours
    pub fn with_utc_offset_hours(mut self, offset: i32) -> Self {
        if (-12..=14).contains(&offset) {
            self.utc_offset_hours = offset;
        }
        self
    }

    /// Set the admin session horizon in days
    pub fn with_admin_session_days(mut self, days: i64) -> Self {
        if days > 0 {
            self.admin_session_days = days;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AuthConfig::default();
        assert_eq!(config.cutoff_hour, 13);
        assert_eq!(config.utc_offset_hours, 3);
        assert_eq!(config.admin_session_days, 365);
    }

    #[test]
    fn test_builder_rejects_out_of_range() {
        let config = AuthConfig::default()
            .with_cutoff_hour(25)
            .with_utc_offset_hours(-40)
            .with_admin_session_days(0);
        assert_eq!(config.cutoff_hour, 13);
        assert_eq!(config.utc_offset_hours, 3);
        assert_eq!(config.admin_session_days, 365);
    }

    #[test]
    fn test_builder_accepts_valid_values() {
        let config = AuthConfig::default()
            .with_cutoff_hour(0)
            .with_utc_offset_hours(-5)
            .with_admin_session_days(30);
        assert_eq!(config.cutoff_hour, 0);
        assert_eq!(config.utc_offset_hours, -5);
        assert_eq!(config.admin_session_days, 30);
    }
}
