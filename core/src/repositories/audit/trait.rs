//! Audit log repository trait defining the interface for audit persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::audit::AuditLogEntry;
use crate::errors::DomainError;

/// Repository trait for append-only audit log persistence
///
/// Entries are appended after their triggering mutation has committed;
/// the store's insert order is the only ordering guarantee between
/// entries.
#[async_trait]
pub trait AuditLogRepository: Send + Sync {
    /// Append a new audit log entry
    ///
    /// # Arguments
    /// * `entry` - The entry to persist
    ///
    /// # Returns
    /// * `Ok(())` on successful append
    /// * `Err(DomainError)` if the operation fails
    async fn append(&self, entry: &AuditLogEntry) -> Result<(), DomainError>;

    /// Fetch the most recent entries, newest first
    ///
    /// # Arguments
    /// * `limit` - Maximum number of entries to return
    async fn recent(&self, limit: usize) -> Result<Vec<AuditLogEntry>, DomainError>;

    /// Fetch the most recent entries for one acting user, newest first
    ///
    /// # Arguments
    /// * `user_id` - The acting user to filter by
    /// * `limit` - Maximum number of entries to return
    async fn find_by_user(
        &self,
        user_id: Uuid,
        limit: usize,
    ) -> Result<Vec<AuditLogEntry>, DomainError>;
}
