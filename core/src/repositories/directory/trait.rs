//! Directory repository trait defining the interface for phone record and
//! comment persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::{Comment, PhoneRecord};
use crate::errors::DomainError;

/// Outcome of a conditional comment deletion
///
/// Deletion touches two things at once (the comment row and the record's
/// rating), and either side can be invalidated by a concurrent writer. The
/// caller needs to tell the cases apart: a rating conflict is retryable, a
/// missing comment is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentDeletion {
    /// Comment removed and rating updated in one atomic unit
    Applied,
    /// The record's rating no longer matched the expected value; nothing
    /// was changed
    RatingConflict,
    /// No such comment under the given record; nothing was changed
    CommentMissing,
}

/// Repository trait for phone record and comment persistence operations
///
/// The conditional mutations (`update_rating`, `insert_comment`,
/// `delete_comment`) implement compare-and-swap on the record's rating:
/// each takes the rating the caller read, plus the new rating and danger
/// flag to write, and commits only if the stored rating still equals the
/// expected value. A comment insert or delete commits in the same atomic
/// unit as its rating write, so no interleaving can observe one without
/// the other.
#[async_trait]
pub trait DirectoryRepository: Send + Sync {
    /// Find a phone record by its unique identifier
    ///
    /// # Returns
    /// * `Ok(Some(PhoneRecord))` - Record found
    /// * `Ok(None)` - No record with the given ID
    /// * `Err(DomainError)` - Storage error occurred
    async fn find_record(&self, id: Uuid) -> Result<Option<PhoneRecord>, DomainError>;

    /// Find all records for a canonical phone number
    ///
    /// Duplicate submissions of the same number each create their own
    /// record, so this may return more than one entry. Ordered newest
    /// first.
    async fn find_records_by_number(
        &self,
        phone_number: &str,
    ) -> Result<Vec<PhoneRecord>, DomainError>;

    /// List all records in the directory, newest first
    async fn list_records(&self) -> Result<Vec<PhoneRecord>, DomainError>;

    /// Insert a new phone record, optionally with its first comment
    ///
    /// When `initial_comment` is present the comment row is persisted in
    /// the same atomic unit as the record; no interleaving can observe the
    /// record without its seed comment.
    ///
    /// # Arguments
    /// * `record` - The record to persist
    /// * `initial_comment` - Comment to persist alongside it, if any
    async fn insert_record(
        &self,
        record: PhoneRecord,
        initial_comment: Option<Comment>,
    ) -> Result<PhoneRecord, DomainError>;

    /// Conditionally write a record's rating and danger flag
    ///
    /// # Arguments
    /// * `id` - The record to update
    /// * `expected_rating` - The rating the caller observed
    /// * `new_rating` - The rating to write
    /// * `new_is_dangerous` - The danger flag to write
    ///
    /// # Returns
    /// * `Ok(true)` - The conditional write committed
    /// * `Ok(false)` - The stored rating no longer matched; nothing written
    /// * `Err(DomainError)` - Storage error, or the record does not exist
    async fn update_rating(
        &self,
        id: Uuid,
        expected_rating: i32,
        new_rating: i32,
        new_is_dangerous: bool,
    ) -> Result<bool, DomainError>;

    /// Conditionally insert a comment and write its record's new rating
    ///
    /// The comment insert and the rating write commit together or not at
    /// all.
    ///
    /// # Arguments
    /// * `comment` - The comment to persist (its `phone_id` names the record)
    /// * `expected_rating` - The rating the caller observed on that record
    /// * `new_rating` - The rating to write
    /// * `new_is_dangerous` - The danger flag to write
    ///
    /// # Returns
    /// * `Ok(true)` - Comment inserted and rating updated
    /// * `Ok(false)` - The stored rating no longer matched; nothing written
    /// * `Err(DomainError)` - Storage error, or the record does not exist
    async fn insert_comment(
        &self,
        comment: Comment,
        expected_rating: i32,
        new_rating: i32,
        new_is_dangerous: bool,
    ) -> Result<bool, DomainError>;

    /// Find a comment by its unique identifier
    async fn find_comment(&self, id: Uuid) -> Result<Option<Comment>, DomainError>;

    /// Conditionally delete a comment and write its record's new rating
    ///
    /// The comment delete and the rating write commit together or not at
    /// all. A comment that vanished between the caller's read and this
    /// call (a concurrent delete) is reported as `CommentMissing`, not as
    /// a conflict, because retrying cannot make it reappear.
    ///
    /// # Arguments
    /// * `comment_id` - The comment to delete
    /// * `phone_id` - The record it must belong to
    /// * `expected_rating` - The rating the caller observed on that record
    /// * `new_rating` - The rating to write
    /// * `new_is_dangerous` - The danger flag to write
    async fn delete_comment(
        &self,
        comment_id: Uuid,
        phone_id: Uuid,
        expected_rating: i32,
        new_rating: i32,
        new_is_dangerous: bool,
    ) -> Result<CommentDeletion, DomainError>;

    /// List the comments under a record, oldest first
    async fn list_comments(&self, phone_id: Uuid) -> Result<Vec<Comment>, DomainError>;
}
