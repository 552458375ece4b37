//! Session value object, the client-held credential.
//!
//! A session is never persisted server-side and carries no revocation
//! state: it is validated by expiry alone, and discarding it is logout.
//! For user accounts the expiry equals the bound one-time code's expiry,
//! so the session dies exactly when the code would have.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::UserRole;

/// An authenticated identity held by the calling client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Identifier of the authenticated account
    pub user_id: Uuid,

    /// Login name of the authenticated account
    pub username: String,

    /// Role the session acts under
    pub role: UserRole,

    /// Instant the session stops being valid
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Creates a new Session
    pub fn new(
        user_id: Uuid,
        username: impl Into<String>,
        role: UserRole,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            username: username.into(),
            role,
            expires_at,
        }
    }

    /// Checks validity at the given instant
    ///
    /// A session is active strictly before its expiry; an expired session
    /// is treated identically to being logged out.
    pub fn is_active_at(&self, at: DateTime<Utc>) -> bool {
        at < self.expires_at
    }

    /// Checks validity now
    pub fn is_active(&self) -> bool {
        self.is_active_at(Utc::now())
    }

    /// Checks if the session carries administrator privileges
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Time remaining until expiry (negative once expired)
    pub fn remaining(&self) -> Duration {
        self.expires_at - Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_active_strictly_before_expiry() {
        let expires_at = Utc::now() + Duration::hours(2);
        let session = Session::new(Uuid::new_v4(), "alice", UserRole::User, expires_at);

        assert!(session.is_active_at(expires_at - Duration::seconds(1)));
        assert!(!session.is_active_at(expires_at));
        assert!(!session.is_active_at(expires_at + Duration::seconds(1)));
    }

    #[test]
    fn test_admin_predicate() {
        let admin = Session::new(Uuid::new_v4(), "root", UserRole::Admin, Utc::now());
        let user = Session::new(Uuid::new_v4(), "bob", UserRole::User, Utc::now());

        assert!(admin.is_admin());
        assert!(!user.is_admin());
    }

    #[test]
    fn test_remaining_turns_negative_after_expiry() {
        let expired = Session::new(
            Uuid::new_v4(),
            "carol",
            UserRole::User,
            Utc::now() - Duration::minutes(5),
        );
        assert!(expired.remaining() < Duration::zero());
        assert!(!expired.is_active());
    }
}
