//! Mock implementation of UserRepository for testing

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::user::{User, UserOtp};
use crate::errors::DomainError;

use super::r#trait::UserRepository;

/// Mock user repository for testing
///
/// Backed by a `HashMap` behind an async `RwLock`. The conditional
/// `update_otp` performs its check-then-write under a single write guard,
/// which gives it the same atomicity the SQL adapter gets from a
/// conditional `UPDATE`.
pub struct MockUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl MockUserRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Seed the repository with a user, bypassing duplicate checks
    pub async fn insert(&self, user: User) {
        let mut users = self.users.write().await;
        users.insert(user.id, user);
    }
}

impl Default for MockUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.username == user.username) {
            return Err(DomainError::Validation {
                message: "Username already registered".to_string(),
            });
        }

        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_otp(
        &self,
        user_id: Uuid,
        otp: Option<&UserOtp>,
        expected_requested_at: Option<DateTime<Utc>>,
    ) -> Result<bool, DomainError> {
        let mut users = self.users.write().await;

        let user = users.get_mut(&user_id).ok_or_else(|| DomainError::NotFound {
            resource: "User".to_string(),
        })?;

        // Check and write under one guard so racing issuers see at most
        // one commit.
        let stored_requested_at = user.otp.as_ref().map(|o| o.requested_at);
        if stored_requested_at != expected_requested_at {
            return Ok(false);
        }

        user.otp = otp.cloned();
        Ok(true)
    }
}
