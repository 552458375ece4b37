//! Tests for the audit service

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::audit::{AuditAction, AuditLogEntry};
use crate::domain::entities::Comment;
use crate::errors::DomainError;
use crate::repositories::{AuditLogRepository, MockAuditLogRepository};
use crate::services::audit::AuditService;

#[tokio::test]
async fn test_number_added_entry_names_delta_and_number() {
    let repo = Arc::new(MockAuditLogRepository::new());
    let service = AuditService::new(Arc::clone(&repo));
    let actor = Uuid::new_v4();

    service.record_number_added(actor, "79991234567", -1, false).await;

    let entries = repo.recent(1).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].action, AuditAction::NumberAdded);
    assert_eq!(entries[0].user_id, actor);
    assert!(entries[0].details.contains("79991234567"));
    assert!(entries[0].details.contains("-1"));
    assert!(!entries[0].details.contains("initial comment"));
}

#[tokio::test]
async fn test_number_added_mentions_initial_comment() {
    let repo = Arc::new(MockAuditLogRepository::new());
    let service = AuditService::new(Arc::clone(&repo));

    service
        .record_number_added(Uuid::new_v4(), "79991234567", 1, true)
        .await;

    let entries = repo.recent(1).await.unwrap();
    assert!(entries[0].details.contains("+1"));
    assert!(entries[0].details.contains("initial comment"));
}

#[tokio::test]
async fn test_comment_added_entry_carries_excerpt() {
    let repo = Arc::new(MockAuditLogRepository::new());
    let service = AuditService::new(Arc::clone(&repo));
    let actor = Uuid::new_v4();

    let comment = Comment::new(Uuid::new_v4(), actor, "Pretends to be the tax office", false);
    service
        .record_comment_added(actor, "79991234567", &comment)
        .await;

    let entries = repo.recent(1).await.unwrap();
    assert_eq!(entries[0].action, AuditAction::CommentAdded);
    assert!(entries[0].details.contains("negative"));
    assert!(entries[0].details.contains("-1"));
    assert!(entries[0].details.contains("Pretends to be the tax office"));
}

#[tokio::test]
async fn test_long_comment_text_is_truncated() {
    let repo = Arc::new(MockAuditLogRepository::new());
    let service = AuditService::new(Arc::clone(&repo));
    let actor = Uuid::new_v4();

    let long_text = "x".repeat(200);
    let comment = Comment::new(Uuid::new_v4(), actor, long_text, true);
    service
        .record_comment_added(actor, "79991234567", &comment)
        .await;

    let entries = repo.recent(1).await.unwrap();
    assert!(entries[0].details.contains("..."));
    assert!(entries[0].details.len() < 200);
}

#[tokio::test]
async fn test_comment_deleted_entry_names_the_reversal() {
    let repo = Arc::new(MockAuditLogRepository::new());
    let service = AuditService::new(Arc::clone(&repo));
    let actor = Uuid::new_v4();

    // Deleting a positive comment applies -1.
    let comment = Comment::new(Uuid::new_v4(), actor, "Great support line", true);
    service
        .record_comment_deleted(actor, "79991234567", &comment)
        .await;

    let entries = repo.recent(1).await.unwrap();
    assert_eq!(entries[0].action, AuditAction::CommentDeleted);
    assert!(entries[0].details.contains("positive"));
    assert!(entries[0].details.contains("-1"));
}

#[tokio::test]
async fn test_rating_adjusted_entry() {
    let repo = Arc::new(MockAuditLogRepository::new());
    let service = AuditService::new(Arc::clone(&repo));

    service
        .record_rating_adjusted(Uuid::new_v4(), "79991234567", 1, 0)
        .await;

    let entries = repo.recent(1).await.unwrap();
    assert_eq!(entries[0].action, AuditAction::RatingAdjusted);
    assert!(entries[0].details.contains("+1"));
    assert!(entries[0].details.contains("to 0"));
}

#[tokio::test]
async fn test_entries_for_user_pass_through() {
    let repo = Arc::new(MockAuditLogRepository::new());
    let service = AuditService::new(Arc::clone(&repo));
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();

    service.record_number_added(alice, "79991234567", 0, false).await;
    service.record_number_added(bob, "74950000000", 0, false).await;

    let for_alice = service.entries_for_user(alice, 10).await.unwrap();
    assert_eq!(for_alice.len(), 1);
    assert_eq!(for_alice[0].user_id, alice);
}

/// Repository whose appends always fail
struct BrokenAuditLogRepository;

#[async_trait]
impl AuditLogRepository for BrokenAuditLogRepository {
    async fn append(&self, _entry: &AuditLogEntry) -> Result<(), DomainError> {
        Err(DomainError::Internal {
            message: "audit store offline".to_string(),
        })
    }

    async fn recent(&self, _limit: usize) -> Result<Vec<AuditLogEntry>, DomainError> {
        Ok(Vec::new())
    }

    async fn find_by_user(
        &self,
        _user_id: Uuid,
        _limit: usize,
    ) -> Result<Vec<AuditLogEntry>, DomainError> {
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn test_append_failure_does_not_surface() {
    let service = AuditService::new(Arc::new(BrokenAuditLogRepository));

    // Returns normally; the failure is only logged.
    service
        .record_number_added(Uuid::new_v4(), "79991234567", 0, false)
        .await;
}
