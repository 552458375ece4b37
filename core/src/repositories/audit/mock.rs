//! Mock implementation of AuditLogRepository for testing

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::audit::AuditLogEntry;
use crate::errors::DomainError;

use super::r#trait::AuditLogRepository;

/// Mock audit log repository for testing
///
/// Keeps entries in insertion order in a Vec; `recent` walks it backwards.
pub struct MockAuditLogRepository {
    entries: Arc<RwLock<Vec<AuditLogEntry>>>,
}

impl MockAuditLogRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Total number of entries appended so far
    pub async fn len(&self) -> usize {
        let entries = self.entries.read().await;
        entries.len()
    }

    /// Whether no entries have been appended
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for MockAuditLogRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuditLogRepository for MockAuditLogRepository {
    async fn append(&self, entry: &AuditLogEntry) -> Result<(), DomainError> {
        let mut entries = self.entries.write().await;
        entries.push(entry.clone());
        Ok(())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<AuditLogEntry>, DomainError> {
        let entries = self.entries.read().await;
        Ok(entries.iter().rev().take(limit).cloned().collect())
    }

    async fn find_by_user(
        &self,
        user_id: Uuid,
        limit: usize,
    ) -> Result<Vec<AuditLogEntry>, DomainError> {
        let entries = self.entries.read().await;
        Ok(entries
            .iter()
            .rev()
            .filter(|e| e.user_id == user_id)
            .take(limit)
            .cloned()
            .collect())
    }
}
