//! Unit tests for mock audit log repository

use uuid::Uuid;

use crate::domain::entities::audit::{AuditAction, AuditLogEntry};
use crate::repositories::audit::{AuditLogRepository, MockAuditLogRepository};

#[tokio::test]
async fn test_append_and_recent_ordering() {
    let repo = MockAuditLogRepository::new();
    let user_id = Uuid::new_v4();

    for i in 0..3 {
        let entry = AuditLogEntry::new(
            AuditAction::CommentAdded,
            user_id,
            format!("entry {}", i),
        );
        repo.append(&entry).await.unwrap();
    }

    let recent = repo.recent(10).await.unwrap();
    let details: Vec<&str> = recent.iter().map(|e| e.details.as_str()).collect();
    assert_eq!(details, vec!["entry 2", "entry 1", "entry 0"]);
}

#[tokio::test]
async fn test_recent_respects_limit() {
    let repo = MockAuditLogRepository::new();
    let user_id = Uuid::new_v4();

    for i in 0..5 {
        let entry = AuditLogEntry::new(AuditAction::NumberAdded, user_id, format!("entry {}", i));
        repo.append(&entry).await.unwrap();
    }

    let recent = repo.recent(2).await.unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].details, "entry 4");
}

#[tokio::test]
async fn test_find_by_user_filters_actor() {
    let repo = MockAuditLogRepository::new();
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();

    repo.append(&AuditLogEntry::new(AuditAction::CommentAdded, alice, "by alice"))
        .await
        .unwrap();
    repo.append(&AuditLogEntry::new(AuditAction::CommentDeleted, bob, "by bob"))
        .await
        .unwrap();
    repo.append(&AuditLogEntry::new(AuditAction::RatingAdjusted, alice, "also alice"))
        .await
        .unwrap();

    let for_alice = repo.find_by_user(alice, 10).await.unwrap();
    assert_eq!(for_alice.len(), 2);
    assert!(for_alice.iter().all(|e| e.user_id == alice));
    assert_eq!(for_alice[0].details, "also alice");

    let for_bob = repo.find_by_user(bob, 10).await.unwrap();
    assert_eq!(for_bob.len(), 1);
}

#[tokio::test]
async fn test_len_tracks_appends() {
    let repo = MockAuditLogRepository::new();
    assert!(repo.is_empty().await);

    let entry = AuditLogEntry::new(AuditAction::NumberAdded, Uuid::new_v4(), "first");
    repo.append(&entry).await.unwrap();

    assert_eq!(repo.len().await, 1);
}
