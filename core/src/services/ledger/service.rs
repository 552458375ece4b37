//! Main ledger service implementation

use std::sync::Arc;
use uuid::Uuid;

use td_shared::utils::phone::{
    canonicalize_phone_number, is_valid_phone_number, mask_phone_number,
};

use crate::domain::entities::{Comment, NewPhoneRecord, PhoneRecord, Polarity};
use crate::errors::{DomainError, DomainResult, LedgerError};
use crate::repositories::{AuditLogRepository, CommentDeletion, DirectoryRepository};
use crate::services::audit::AuditService;

use super::config::LedgerConfig;

/// Reputation ledger over phone records
///
/// A record's rating is the single source of truth: every mutation applies
/// a signed delta to the value the caller read, through a conditional
/// repository operation that commits only if the rating is still the one
/// that was read. A lost race is retried from the read step, up to
/// `LedgerConfig::max_conflict_retries` times, before surfacing
/// [`LedgerError::StoreConflict`]. The danger flag is recomputed from the
/// new rating on every write and never taken from input.
pub struct LedgerService<D, A>
where
    D: DirectoryRepository,
    A: AuditLogRepository,
{
    /// Record and comment store
    directory: Arc<D>,
    /// Audit trail for committed mutations
    audit: AuditService<A>,
    /// Service configuration
    config: LedgerConfig,
}

impl<D, A> LedgerService<D, A>
where
    D: DirectoryRepository,
    A: AuditLogRepository,
{
    /// Create a new ledger service
    ///
    /// # Arguments
    ///
    /// * `directory` - Record and comment store implementation
    /// * `audit_log` - Audit log store implementation
    /// * `config` - Service configuration
    pub fn new(directory: Arc<D>, audit_log: Arc<A>, config: LedgerConfig) -> Self {
        Self {
            directory,
            audit: AuditService::new(audit_log),
            config,
        }
    }

    /// The audit view over this ledger's trail
    pub fn audit(&self) -> &AuditService<A> {
        &self.audit
    }

    /// Add a signed comment to a phone record
    ///
    /// This method:
    /// 1. Rejects empty or whitespace-only text
    /// 2. Reads the record and computes `rating + (is_positive ? +1 : -1)`
    /// 3. Inserts the comment and writes the new rating in one atomic
    ///    unit, conditional on the rating still being the one read
    /// 4. Retries the read-compute-apply cycle on a lost race
    /// 5. Appends one audit entry after the mutation commits
    ///
    /// # Arguments
    ///
    /// * `phone_id` - The record to comment on
    /// * `text` - Comment body
    /// * `is_positive` - Sign of the comment
    /// * `actor` - The authenticated user adding the comment
    ///
    /// # Returns
    ///
    /// * `Ok(Comment)` - The created comment, with the id needed to delete
    ///   it later
    /// * `Err(DomainError)` - Validation failed, the record is unknown, or
    ///   the retry budget ran out
    pub async fn add_comment(
        &self,
        phone_id: Uuid,
        text: &str,
        is_positive: bool,
        actor: Uuid,
    ) -> DomainResult<Comment> {
        validate_comment_text(text)?;
        let polarity = Polarity::from_flag(is_positive);

        for attempt in 0..=self.config.max_conflict_retries {
            let record = self.load_record(phone_id).await?;

            let new_rating = record.rating + polarity.delta();
            let comment = Comment::new(phone_id, actor, text, is_positive);

            let committed = self
                .directory
                .insert_comment(
                    comment.clone(),
                    record.rating,
                    new_rating,
                    PhoneRecord::danger_flag(new_rating),
                )
                .await?;

            if committed {
                tracing::info!(
                    phone = %mask_phone_number(&record.phone_number),
                    delta = polarity.delta(),
                    rating = new_rating,
                    event = "comment_added",
                    "Comment added to phone record"
                );
                self.audit
                    .record_comment_added(actor, &record.phone_number, &comment)
                    .await;
                return Ok(comment);
            }

            tracing::debug!(
                phone_id = %phone_id,
                attempt = attempt,
                event = "ledger_conflict",
                "Rating moved under a comment insert; re-reading"
            );
        }

        Err(LedgerError::StoreConflict.into())
    }

    /// Delete a comment from a phone record
    ///
    /// The reversal applied to the rating is derived from the stored
    /// comment's own sign, never from re-summing comments. The delete and
    /// the rating write commit in one atomic unit; if another task deletes
    /// the comment first, the loser sees `CommentNotFound`.
    ///
    /// # Arguments
    ///
    /// * `phone_id` - The record the comment belongs to
    /// * `comment_id` - The comment to delete
    /// * `actor` - The authenticated user deleting the comment
    pub async fn delete_comment(
        &self,
        phone_id: Uuid,
        comment_id: Uuid,
        actor: Uuid,
    ) -> DomainResult<()> {
        for attempt in 0..=self.config.max_conflict_retries {
            // Re-read both sides each attempt: the comment may be gone by
            // now, and the rating may have moved.
            let comment = self
                .directory
                .find_comment(comment_id)
                .await?
                .filter(|c| c.phone_id == phone_id)
                .ok_or(LedgerError::CommentNotFound)?;
            let record = self.load_record(phone_id).await?;

            let new_rating = record.rating + comment.inverse_delta();

            let outcome = self
                .directory
                .delete_comment(
                    comment_id,
                    phone_id,
                    record.rating,
                    new_rating,
                    PhoneRecord::danger_flag(new_rating),
                )
                .await?;

            match outcome {
                CommentDeletion::Applied => {
                    tracing::info!(
                        phone = %mask_phone_number(&record.phone_number),
                        delta = comment.inverse_delta(),
                        rating = new_rating,
                        event = "comment_deleted",
                        "Comment deleted from phone record"
                    );
                    self.audit
                        .record_comment_deleted(actor, &record.phone_number, &comment)
                        .await;
                    return Ok(());
                }
                CommentDeletion::CommentMissing => {
                    return Err(LedgerError::CommentNotFound.into());
                }
                CommentDeletion::RatingConflict => {
                    tracing::debug!(
                        phone_id = %phone_id,
                        attempt = attempt,
                        event = "ledger_conflict",
                        "Rating moved under a comment delete; re-reading"
                    );
                }
            }
        }

        Err(LedgerError::StoreConflict.into())
    }

    /// Adjust a record's rating by one in either direction
    ///
    /// Administrator-only by policy; enforcing the caller's role is the
    /// calling layer's responsibility.
    ///
    /// # Arguments
    ///
    /// * `phone_id` - The record to adjust
    /// * `polarity` - Direction of the adjustment
    /// * `actor` - The authenticated administrator
    ///
    /// # Returns
    ///
    /// * `Ok(PhoneRecord)` - The record as written
    pub async fn adjust_rating(
        &self,
        phone_id: Uuid,
        polarity: Polarity,
        actor: Uuid,
    ) -> DomainResult<PhoneRecord> {
        for attempt in 0..=self.config.max_conflict_retries {
            let mut record = self.load_record(phone_id).await?;
            let expected = record.rating;
            record.apply_delta(polarity.delta());

            let committed = self
                .directory
                .update_rating(phone_id, expected, record.rating, record.is_dangerous)
                .await?;

            if committed {
                tracing::info!(
                    phone = %mask_phone_number(&record.phone_number),
                    delta = polarity.delta(),
                    rating = record.rating,
                    event = "rating_adjusted",
                    "Rating adjusted on phone record"
                );
                self.audit
                    .record_rating_adjusted(
                        actor,
                        &record.phone_number,
                        polarity.delta(),
                        record.rating,
                    )
                    .await;
                return Ok(record);
            }

            tracing::debug!(
                phone_id = %phone_id,
                attempt = attempt,
                event = "ledger_conflict",
                "Rating moved under an adjustment; re-reading"
            );
        }

        Err(LedgerError::StoreConflict.into())
    }

    /// Report a phone number into the directory
    ///
    /// This method:
    /// 1. Canonicalizes the number; a number with no digits is rejected
    /// 2. Validates the seed danger flag against the seed rating
    /// 3. Builds the optional first comment, its sign taken from the seed
    ///    rating (the seed already counts it, so it adds no extra delta)
    /// 4. Persists the record and comment in one atomic unit
    /// 5. Appends one audit entry for the creation
    ///
    /// Duplicate reports of the same number are kept as separate records.
    ///
    /// # Arguments
    ///
    /// * `submission` - The reported number, seed rating and flag, and
    ///   optional first comment
    /// * `actor` - The authenticated user reporting the number
    pub async fn add_phone_record(
        &self,
        submission: NewPhoneRecord,
        actor: Uuid,
    ) -> DomainResult<PhoneRecord> {
        // Step 1: Canonicalize
        let canonical = canonicalize_phone_number(&submission.phone_number);
        if canonical.is_empty() {
            return Err(DomainError::Validation {
                message: format!(
                    "Phone number contains no digits: {}",
                    submission.phone_number
                ),
            });
        }
        if !is_valid_phone_number(&canonical) {
            tracing::warn!(
                phone = %mask_phone_number(&canonical),
                digits = canonical.len(),
                event = "unusual_number_length",
                "Reported number has an implausible length; storing as submitted"
            );
        }

        // Step 2: The caller's flag must agree with the seed rating
        if !submission.seed_is_consistent() {
            return Err(LedgerError::InconsistentSeed.into());
        }

        // Step 3: Optional first comment
        let record = PhoneRecord::new(canonical, submission.rating_seed);
        let initial_comment = match submission.initial_comment.as_deref() {
            Some(text) => {
                validate_comment_text(text)?;
                Some(Comment::new(
                    record.id,
                    actor,
                    text,
                    submission.rating_seed > 0,
                ))
            }
            None => None,
        };
        let with_initial_comment = initial_comment.is_some();

        // Step 4: Atomic insert
        let record = self.directory.insert_record(record, initial_comment).await?;

        tracing::info!(
            phone = %mask_phone_number(&record.phone_number),
            rating = record.rating,
            is_dangerous = record.is_dangerous,
            event = "number_added",
            "Phone number reported into the directory"
        );

        // Step 5: Audit
        self.audit
            .record_number_added(actor, &record.phone_number, record.rating, with_initial_comment)
            .await;

        Ok(record)
    }

    /// Fetch a record by id
    pub async fn get_record(&self, phone_id: Uuid) -> DomainResult<PhoneRecord> {
        self.load_record(phone_id).await
    }

    /// The whole directory, newest first
    pub async fn list_records(&self) -> DomainResult<Vec<PhoneRecord>> {
        self.directory.list_records().await
    }

    /// All records reported for a number, newest first
    ///
    /// The query is canonicalized the same way submissions are, so any
    /// formatting of the same digits finds the same records. Input with no
    /// digits finds nothing.
    pub async fn find_records_by_number(
        &self,
        phone_number: &str,
    ) -> DomainResult<Vec<PhoneRecord>> {
        let canonical = canonicalize_phone_number(phone_number);
        if canonical.is_empty() {
            return Ok(Vec::new());
        }
        self.directory.find_records_by_number(&canonical).await
    }

    /// The comments under a record, oldest first
    pub async fn list_comments(&self, phone_id: Uuid) -> DomainResult<Vec<Comment>> {
        // Resolve the record first so an unknown id is an error, not an
        // empty list.
        self.load_record(phone_id).await?;
        self.directory.list_comments(phone_id).await
    }

    async fn load_record(&self, phone_id: Uuid) -> DomainResult<PhoneRecord> {
        self.directory
            .find_record(phone_id)
            .await?
            .ok_or_else(|| LedgerError::RecordNotFound.into())
    }
}

fn validate_comment_text(text: &str) -> DomainResult<()> {
    if text.trim().is_empty() {
        return Err(DomainError::Validation {
            message: "Comment text must not be empty".to_string(),
        });
    }
    Ok(())
}
