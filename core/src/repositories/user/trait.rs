//! User repository trait defining the interface for account persistence.
//!
//! This module defines the repository pattern interface for User entities,
//! following Domain-Driven Design principles. The trait is async-first and
//! uses Result types for proper error handling.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::user::{User, UserOtp};
use crate::errors::DomainError;

/// Repository trait for User entity persistence operations
///
/// This trait defines the contract for data access operations related to
/// accounts. Implementations handle the actual storage operations while
/// maintaining the abstraction boundary between domain and infrastructure
/// layers. The one conditional operation, [`update_otp`][Self::update_otp],
/// is what serializes concurrent code issuance for the same account.
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use td_core::domain::entities::{User, UserRole};
/// use td_core::repositories::{MockUserRepository, UserRepository};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let repo = Arc::new(MockUserRepository::new());
/// let created = repo.create(User::new("alice", UserRole::User)).await?;
///
/// let found = repo.find_by_username("alice").await?;
/// assert_eq!(found.map(|u| u.id), Some(created.id));
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by their login name
    ///
    /// # Arguments
    /// * `username` - The login name, matched exactly
    ///
    /// # Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - No user with the given name
    /// * `Err(DomainError)` - Storage or other error occurred
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;

    /// Find a user by their unique identifier
    ///
    /// # Arguments
    /// * `id` - The UUID of the user
    ///
    /// # Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - No user with the given ID
    /// * `Err(DomainError)` - Storage or other error occurred
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;

    /// Create a new user in the repository
    ///
    /// Used by provisioning and test setup; the authentication flow itself
    /// never creates accounts.
    ///
    /// # Arguments
    /// * `user` - The User entity to persist
    ///
    /// # Returns
    /// * `Ok(User)` - The created user
    /// * `Err(DomainError)` - Creation failed (e.g. duplicate username)
    async fn create(&self, user: User) -> Result<User, DomainError>;

    /// Conditionally replace the one-time-code state of a user
    ///
    /// The write commits only if the stored `requested_at` still equals
    /// `expected_requested_at` (`None` matches an account that has never
    /// held a code, or whose state was cleared). Two tasks racing to issue
    /// a code for the same account therefore commit at most one write; the
    /// loser observes `Ok(false)`, re-reads, and re-evaluates.
    ///
    /// # Arguments
    /// * `user_id` - The account to update
    /// * `otp` - The new code state, or `None` to clear it
    /// * `expected_requested_at` - The `requested_at` value observed when
    ///   the caller last read the account
    ///
    /// # Returns
    /// * `Ok(true)` - The conditional write committed
    /// * `Ok(false)` - The stored state no longer matched; nothing written
    /// * `Err(DomainError)` - Storage error, or the account does not exist
    ///
    /// # Example
    /// ```no_run
    /// # use uuid::Uuid;
    /// # use td_core::domain::entities::UserOtp;
    /// # use td_core::repositories::UserRepository;
    /// # async fn example(
    /// #     repo: &impl UserRepository,
    /// #     user_id: Uuid,
    /// #     otp: UserOtp,
    /// # ) -> Result<(), Box<dyn std::error::Error>> {
    /// if !repo.update_otp(user_id, Some(&otp), None).await? {
    ///     // another task issued a code first; re-read and re-evaluate
    /// }
    /// # Ok(())
    /// # }
    /// ```
    async fn update_otp(
        &self,
        user_id: Uuid,
        otp: Option<&UserOtp>,
        expected_requested_at: Option<DateTime<Utc>>,
    ) -> Result<bool, DomainError>;
}
