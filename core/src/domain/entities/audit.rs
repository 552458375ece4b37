//! Audit log entity for recording directory mutations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Action codes for directory audit entries
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    /// A phone record was created
    NumberAdded,
    /// A comment was added to a record
    CommentAdded,
    /// A comment was deleted from a record
    CommentDeleted,
    /// An administrator adjusted a record's rating directly
    RatingAdjusted,
}

impl AuditAction {
    /// Convert to string representation for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NumberAdded => "NUMBER_ADDED",
            Self::CommentAdded => "COMMENT_ADDED",
            Self::CommentDeleted => "COMMENT_DELETED",
            Self::RatingAdjusted => "RATING_ADJUSTED",
        }
    }

    /// Parse from string representation
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "NUMBER_ADDED" => Some(Self::NumberAdded),
            "COMMENT_ADDED" => Some(Self::CommentAdded),
            "COMMENT_DELETED" => Some(Self::CommentDeleted),
            "RATING_ADJUSTED" => Some(Self::RatingAdjusted),
            _ => None,
        }
    }
}

/// Represents one append-only audit log entry
///
/// An entry is created as a side effect of every ledger mutation, after the
/// mutation has committed. The details line names the signed delta, the
/// target number, and for comments an excerpt of the text, so the admin
/// view can present history without joining other tables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuditLogEntry {
    /// Unique identifier for the log entry
    pub id: Uuid,

    /// The acting user
    pub user_id: Uuid,

    /// Action code
    pub action: AuditAction,

    /// Human-readable description of the mutation
    pub details: String,

    /// Timestamp when the entry was recorded
    pub timestamp: DateTime<Utc>,
}

impl AuditLogEntry {
    /// Create a new audit log entry
    pub fn new(action: AuditAction, user_id: Uuid, details: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            action,
            details: details.into(),
            timestamp: Utc::now(),
        }
    }
}
