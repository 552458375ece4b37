//! Audit service for recording directory mutations.
//!
//! Every ledger mutation produces exactly one audit entry, appended after
//! the mutation has committed. An append failure at that point is logged
//! and swallowed: the mutation is already visible, and failing the
//! operation would invite the caller to retry a change that already
//! happened.

use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::audit::{AuditAction, AuditLogEntry};
use crate::domain::entities::Comment;
use crate::errors::DomainResult;
use crate::repositories::AuditLogRepository;

/// Longest comment excerpt carried into an audit entry, in characters
const EXCERPT_LENGTH: usize = 80;

/// Service composing and appending audit entries for directory mutations
pub struct AuditService<R>
where
    R: AuditLogRepository,
{
    repository: Arc<R>,
}

impl<R> AuditService<R>
where
    R: AuditLogRepository,
{
    /// Create a new audit service
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Record the creation of a phone record
    pub async fn record_number_added(
        &self,
        actor: Uuid,
        phone_number: &str,
        rating_seed: i32,
        with_initial_comment: bool,
    ) {
        let details = if with_initial_comment {
            format!(
                "Added number {} with seed rating {:+} and an initial comment",
                phone_number, rating_seed
            )
        } else {
            format!("Added number {} with seed rating {:+}", phone_number, rating_seed)
        };
        self.append(AuditLogEntry::new(AuditAction::NumberAdded, actor, details))
            .await;
    }

    /// Record a comment added through the ledger
    pub async fn record_comment_added(&self, actor: Uuid, phone_number: &str, comment: &Comment) {
        let details = format!(
            "Added {} comment ({:+}) for {}: \"{}\"",
            polarity_word(comment.is_positive),
            comment.delta(),
            phone_number,
            excerpt(&comment.text),
        );
        self.append(AuditLogEntry::new(AuditAction::CommentAdded, actor, details))
            .await;
    }

    /// Record a comment deleted through the ledger
    ///
    /// The signed delta named in the entry is the reversal applied to the
    /// record, not the deleted comment's own sign.
    pub async fn record_comment_deleted(&self, actor: Uuid, phone_number: &str, comment: &Comment) {
        let details = format!(
            "Deleted {} comment ({:+}) for {}: \"{}\"",
            polarity_word(comment.is_positive),
            comment.inverse_delta(),
            phone_number,
            excerpt(&comment.text),
        );
        self.append(AuditLogEntry::new(
            AuditAction::CommentDeleted,
            actor,
            details,
        ))
        .await;
    }

    /// Record a manual rating adjustment
    pub async fn record_rating_adjusted(
        &self,
        actor: Uuid,
        phone_number: &str,
        delta: i32,
        new_rating: i32,
    ) {
        let details = format!(
            "Adjusted rating of {} by {:+} to {}",
            phone_number, delta, new_rating
        );
        self.append(AuditLogEntry::new(
            AuditAction::RatingAdjusted,
            actor,
            details,
        ))
        .await;
    }

    /// The most recent entries, newest first
    ///
    /// Exposing this to admin sessions only is the calling layer's policy.
    pub async fn recent_entries(&self, limit: usize) -> DomainResult<Vec<AuditLogEntry>> {
        self.repository.recent(limit).await
    }

    /// The most recent entries by one acting user, newest first
    pub async fn entries_for_user(
        &self,
        user_id: Uuid,
        limit: usize,
    ) -> DomainResult<Vec<AuditLogEntry>> {
        self.repository.find_by_user(user_id, limit).await
    }

    /// Append an entry, logging instead of failing
    async fn append(&self, entry: AuditLogEntry) {
        if let Err(e) = self.repository.append(&entry).await {
            tracing::warn!(
                action = entry.action.as_str(),
                user_id = %entry.user_id,
                error = %e,
                event = "audit_append_failed",
                "Failed to append audit entry; the mutation itself stands"
            );
        }
    }
}

fn polarity_word(is_positive: bool) -> &'static str {
    if is_positive {
        "positive"
    } else {
        "negative"
    }
}

fn excerpt(text: &str) -> String {
    if text.chars().count() <= EXCERPT_LENGTH {
        return text.to_string();
    }
    let cut: String = text.chars().take(EXCERPT_LENGTH).collect();
    format!("{}...", cut)
}
