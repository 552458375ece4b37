//! MySQL implementation of the AuditLogRepository trait.
//!
//! Audit entries are append-only; nothing in this module updates or
//! deletes rows.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use td_core::domain::entities::{AuditAction, AuditLogEntry};
use td_core::errors::DomainError;
use td_core::repositories::AuditLogRepository;

/// MySQL implementation of AuditLogRepository
pub struct MySqlAuditLogRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlAuditLogRepository {
    /// Create a new MySQL audit log repository
    ///
    /// # Arguments
    /// * `pool` - MySQL connection pool from SQLx
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert database row to AuditLogEntry entity
    fn row_to_entry(row: &sqlx::mysql::MySqlRow) -> Result<AuditLogEntry, DomainError> {
        let id: String = row.try_get("id").map_err(|e| DomainError::Internal {
            message: format!("Failed to get id: {}", e),
        })?;

        let user_id: String = row.try_get("user_id").map_err(|e| DomainError::Internal {
            message: format!("Failed to get user_id: {}", e),
        })?;

        let action_str: String = row.try_get("action").map_err(|e| DomainError::Internal {
            message: format!("Failed to get action: {}", e),
        })?;

        let action = AuditAction::from_str(&action_str).ok_or_else(|| DomainError::Internal {
            message: format!("Unknown audit action: {}", action_str),
        })?;

        Ok(AuditLogEntry {
            id: Uuid::parse_str(&id).map_err(|e| DomainError::Internal {
                message: format!("Invalid UUID: {}", e),
            })?,
            user_id: Uuid::parse_str(&user_id).map_err(|e| DomainError::Internal {
                message: format!("Invalid user UUID: {}", e),
            })?,
            action,
            details: row.try_get("details").map_err(|e| DomainError::Internal {
                message: format!("Failed to get details: {}", e),
            })?,
            timestamp: row
                .try_get::<DateTime<Utc>, _>("timestamp")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get timestamp: {}", e),
                })?,
        })
    }
}

#[async_trait]
impl AuditLogRepository for MySqlAuditLogRepository {
    async fn append(&self, entry: &AuditLogEntry) -> Result<(), DomainError> {
        let query = r#"
            INSERT INTO audit_log (id, user_id, action, details, timestamp)
            VALUES (?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(entry.id.to_string())
            .bind(entry.user_id.to_string())
            .bind(entry.action.as_str())
            .bind(&entry.details)
            .bind(entry.timestamp)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to append audit entry: {}", e),
            })?;

        Ok(())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<AuditLogEntry>, DomainError> {
        let query = r#"
            SELECT id, user_id, action, details, timestamp
            FROM audit_log
            ORDER BY timestamp DESC
            LIMIT ?
        "#;

        let rows = sqlx::query(query)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to list audit entries: {}", e),
            })?;

        rows.iter().map(Self::row_to_entry).collect()
    }

    async fn find_by_user(
        &self,
        user_id: Uuid,
        limit: usize,
    ) -> Result<Vec<AuditLogEntry>, DomainError> {
        let query = r#"
            SELECT id, user_id, action, details, timestamp
            FROM audit_log
            WHERE user_id = ?
            ORDER BY timestamp DESC
            LIMIT ?
        "#;

        let rows = sqlx::query(query)
            .bind(user_id.to_string())
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to find audit entries by user: {}", e),
            })?;

        rows.iter().map(Self::row_to_entry).collect()
    }
}
