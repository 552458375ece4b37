//! Configuration for the authentication service

use td_shared::config::AuthConfig;

/// Configuration for the authentication service
#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
    /// Local hour of day (0-23) at which outstanding one-time codes expire
    pub cutoff_hour: u32,
    /// UTC offset of the deployment's wall clock, in whole hours
    pub utc_offset_hours: i32,
    /// Admin session horizon in days
    pub admin_session_days: i64,
    /// How many times a lost issuance race is retried before giving up
    pub max_issue_retries: u32,
}

impl Default for AuthServiceConfig {
    fn default() -> Self {
        let auth = AuthConfig::default();
        Self {
            cutoff_hour: auth.cutoff_hour,
            utc_offset_hours: auth.utc_offset_hours,
            admin_session_days: auth.admin_session_days,
            max_issue_retries: 3,
        }
    }
}

impl From<&AuthConfig> for AuthServiceConfig {
    fn from(auth: &AuthConfig) -> Self {
        Self {
            cutoff_hour: auth.cutoff_hour,
            utc_offset_hours: auth.utc_offset_hours,
            admin_session_days: auth.admin_session_days,
            ..Self::default()
        }
    }
}
