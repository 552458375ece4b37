//! User entity representing an account in the TrustDial directory.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents the role of an account in the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// A privileged administrator using a static password
    Admin,
    /// An unprivileged user authenticating with daily one-time codes
    User,
}

/// The one-time-code state bound to a user account
///
/// The four fields are written together on issuance and describe a single
/// credential: the code itself, the daily-cutoff instant at which it stops
/// working, when it was requested, and the device it is usable from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserOtp {
    /// The numeric one-time code
    pub code: String,

    /// Instant at which the code expires (the next daily cutoff at issuance)
    pub expires_at: DateTime<Utc>,

    /// When the code was requested
    pub requested_at: DateTime<Utc>,

    /// Device identifier the code is bound to
    pub device_id: String,
}

impl UserOtp {
    /// Checks whether the code is expired at the given instant
    ///
    /// A code is valid through its exact expiry instant and expired only
    /// strictly after it.
    pub fn is_expired(&self, at: DateTime<Utc>) -> bool {
        at > self.expires_at
    }

    /// Checks whether the code is bound to the given device identifier
    pub fn is_bound_to(&self, device_id: &str) -> bool {
        self.device_id == device_id
    }
}

/// User entity representing a registered account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the account
    pub id: Uuid,

    /// Login name, unique across the directory
    pub username: String,

    /// Role of the account (Admin or User)
    pub role: UserRole,

    /// Static password, present only on admin accounts
    pub static_password: Option<String>,

    /// Out-of-band delivery address for one-time codes (a Telegram chat id
    /// for the stock notifier); absent means issuance skips delivery
    pub notify_address: Option<String>,

    /// Current one-time-code state, if any has been issued
    pub otp: Option<UserOtp>,

    /// Timestamp when the account was created
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Creates a new User instance
    pub fn new(username: impl Into<String>, role: UserRole) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            role,
            static_password: None,
            notify_address: None,
            otp: None,
            created_at: Utc::now(),
        }
    }

    /// Sets the static password (admin accounts)
    pub fn with_static_password(mut self, password: impl Into<String>) -> Self {
        self.static_password = Some(password.into());
        self
    }

    /// Sets the out-of-band delivery address
    pub fn with_notify_address(mut self, address: impl Into<String>) -> Self {
        self.notify_address = Some(address.into());
        self
    }

    /// Checks if the account is an administrator
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Checks if the account is an unprivileged user
    pub fn is_user(&self) -> bool {
        self.role == UserRole::User
    }

    /// Checks whether a non-expired one-time code is on file at the given
    /// instant
    pub fn has_active_otp(&self, at: DateTime<Utc>) -> bool {
        self.otp.as_ref().map(|otp| !otp.is_expired(at)).unwrap_or(false)
    }

    /// Replaces the one-time-code state
    pub fn set_otp(&mut self, otp: UserOtp) {
        self.otp = Some(otp);
    }

    /// Clears the one-time-code state
    pub fn clear_otp(&mut self) {
        self.otp = None;
    }
}
