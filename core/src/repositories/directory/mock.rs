//! Mock implementation of DirectoryRepository for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::{Comment, PhoneRecord};
use crate::errors::DomainError;

use super::r#trait::{CommentDeletion, DirectoryRepository};

/// Combined store state
///
/// Records and comments live under one lock so that a conditional rating
/// check and the comment mutation it guards happen in a single critical
/// section, mirroring the SQL adapter's transaction.
#[derive(Default)]
struct State {
    records: HashMap<Uuid, PhoneRecord>,
    comments: HashMap<Uuid, Comment>,
}

/// Mock directory repository for testing
pub struct MockDirectoryRepository {
    state: Arc<RwLock<State>>,
}

impl MockDirectoryRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(State::default())),
        }
    }

    /// Number of comments currently stored, across all records
    pub async fn comment_count(&self) -> usize {
        let state = self.state.read().await;
        state.comments.len()
    }
}

impl Default for MockDirectoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DirectoryRepository for MockDirectoryRepository {
    async fn find_record(&self, id: Uuid) -> Result<Option<PhoneRecord>, DomainError> {
        let state = self.state.read().await;
        Ok(state.records.get(&id).cloned())
    }

    async fn find_records_by_number(
        &self,
        phone_number: &str,
    ) -> Result<Vec<PhoneRecord>, DomainError> {
        let state = self.state.read().await;
        let mut records: Vec<PhoneRecord> = state
            .records
            .values()
            .filter(|r| r.phone_number == phone_number)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.date_added.cmp(&a.date_added));
        Ok(records)
    }

    async fn list_records(&self) -> Result<Vec<PhoneRecord>, DomainError> {
        let state = self.state.read().await;
        let mut records: Vec<PhoneRecord> = state.records.values().cloned().collect();
        records.sort_by(|a, b| b.date_added.cmp(&a.date_added));
        Ok(records)
    }

    async fn insert_record(
        &self,
        record: PhoneRecord,
        initial_comment: Option<Comment>,
    ) -> Result<PhoneRecord, DomainError> {
        let mut state = self.state.write().await;

        state.records.insert(record.id, record.clone());
        if let Some(comment) = initial_comment {
            state.comments.insert(comment.id, comment);
        }
        Ok(record)
    }

    async fn update_rating(
        &self,
        id: Uuid,
        expected_rating: i32,
        new_rating: i32,
        new_is_dangerous: bool,
    ) -> Result<bool, DomainError> {
        let mut state = self.state.write().await;

        let record = state.records.get_mut(&id).ok_or_else(|| DomainError::NotFound {
            resource: "PhoneRecord".to_string(),
        })?;

        if record.rating != expected_rating {
            return Ok(false);
        }

        record.rating = new_rating;
        record.is_dangerous = new_is_dangerous;
        Ok(true)
    }

    async fn insert_comment(
        &self,
        comment: Comment,
        expected_rating: i32,
        new_rating: i32,
        new_is_dangerous: bool,
    ) -> Result<bool, DomainError> {
        let mut state = self.state.write().await;

        let record = state
            .records
            .get_mut(&comment.phone_id)
            .ok_or_else(|| DomainError::NotFound {
                resource: "PhoneRecord".to_string(),
            })?;

        if record.rating != expected_rating {
            return Ok(false);
        }

        record.rating = new_rating;
        record.is_dangerous = new_is_dangerous;
        state.comments.insert(comment.id, comment);
        Ok(true)
    }

    async fn find_comment(&self, id: Uuid) -> Result<Option<Comment>, DomainError> {
        let state = self.state.read().await;
        Ok(state.comments.get(&id).cloned())
    }

    async fn delete_comment(
        &self,
        comment_id: Uuid,
        phone_id: Uuid,
        expected_rating: i32,
        new_rating: i32,
        new_is_dangerous: bool,
    ) -> Result<CommentDeletion, DomainError> {
        let mut state = self.state.write().await;

        let belongs = state
            .comments
            .get(&comment_id)
            .map(|c| c.phone_id == phone_id)
            .unwrap_or(false);
        if !belongs {
            return Ok(CommentDeletion::CommentMissing);
        }

        let record = state
            .records
            .get_mut(&phone_id)
            .ok_or_else(|| DomainError::NotFound {
                resource: "PhoneRecord".to_string(),
            })?;

        if record.rating != expected_rating {
            return Ok(CommentDeletion::RatingConflict);
        }

        record.rating = new_rating;
        record.is_dangerous = new_is_dangerous;
        state.comments.remove(&comment_id);
        Ok(CommentDeletion::Applied)
    }

    async fn list_comments(&self, phone_id: Uuid) -> Result<Vec<Comment>, DomainError> {
        let state = self.state.read().await;
        let mut comments: Vec<Comment> = state
            .comments
            .values()
            .filter(|c| c.phone_id == phone_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.date_added.cmp(&b.date_added));
        Ok(comments)
    }
}
