//! Comment entity, the evidence attached to a phone record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::phone_record::Polarity;

/// A signed comment on a phone record
///
/// Comments are immutable once created; the only lifecycle transitions are
/// creation through the ledger and deletion through the ledger, each of
/// which moves the owning record's rating by the comment's sign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Unique identifier for the comment
    pub id: Uuid,

    /// Owning phone record
    pub phone_id: Uuid,

    /// Author of the comment
    pub user_id: Uuid,

    /// Free-form comment text, never empty
    pub text: String,

    /// Sign of the comment (true counts +1, false counts -1)
    pub is_positive: bool,

    /// Timestamp when the comment was created
    pub date_added: DateTime<Utc>,
}

impl Comment {
    /// Creates a new Comment instance
    pub fn new(phone_id: Uuid, user_id: Uuid, text: impl Into<String>, is_positive: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            phone_id,
            user_id,
            text: text.into(),
            is_positive,
            date_added: Utc::now(),
        }
    }

    /// The polarity of the comment
    pub fn polarity(&self) -> Polarity {
        Polarity::from_flag(self.is_positive)
    }

    /// The signed delta this comment contributed to its record's rating
    pub fn delta(&self) -> i32 {
        self.polarity().delta()
    }

    /// The signed delta that removing this comment applies
    pub fn inverse_delta(&self) -> i32 {
        -self.delta()
    }
}
