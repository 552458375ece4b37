//! Phone record entity, the unit of the shared directory.
//!
//! A record's `rating` is the single source of truth for its reputation:
//! every comment and every manual adjustment is applied to it as a signed
//! delta, and `is_dangerous` is a cached projection of `rating < 0` that is
//! recomputed on every write, never set independently.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sign of a rating change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    /// Counts +1 toward the rating
    Positive,
    /// Counts -1 toward the rating
    Negative,
}

impl Polarity {
    /// The signed delta this polarity applies to a rating
    pub fn delta(&self) -> i32 {
        match self {
            Polarity::Positive => 1,
            Polarity::Negative => -1,
        }
    }

    /// Build from a boolean sign flag
    pub fn from_flag(is_positive: bool) -> Self {
        if is_positive {
            Polarity::Positive
        } else {
            Polarity::Negative
        }
    }

    /// Whether this polarity counts positively
    pub fn is_positive(&self) -> bool {
        matches!(self, Polarity::Positive)
    }
}

/// Phone record entity representing one reported number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneRecord {
    /// Unique identifier for the record
    pub id: Uuid,

    /// Canonical digit string of the reported number
    pub phone_number: String,

    /// Aggregate reputation score; may be negative
    pub rating: i32,

    /// Derived danger flag, always exactly `rating < 0`
    pub is_dangerous: bool,

    /// Timestamp when the number was first reported
    pub date_added: DateTime<Utc>,
}

impl PhoneRecord {
    /// Creates a new PhoneRecord with a seed rating
    ///
    /// The danger flag is derived from the rating, not taken as input.
    pub fn new(phone_number: impl Into<String>, rating: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            phone_number: phone_number.into(),
            rating,
            is_dangerous: Self::danger_flag(rating),
            date_added: Utc::now(),
        }
    }

    /// The danger flag a given rating projects to
    pub fn danger_flag(rating: i32) -> bool {
        rating < 0
    }

    /// Applies a signed delta to the rating, keeping the danger flag
    /// consistent
    pub fn apply_delta(&mut self, delta: i32) {
        self.rating += delta;
        self.is_dangerous = Self::danger_flag(self.rating);
    }
}

/// A directory submission: the inputs to phone record creation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPhoneRecord {
    /// The reported number, in any formatting; canonicalized on creation
    pub phone_number: String,

    /// Seed rating for the record
    pub rating_seed: i32,

    /// Seed danger flag; must equal `rating_seed < 0`
    pub is_dangerous_seed: bool,

    /// Optional first comment, created atomically with the record; its sign
    /// is already reflected in the seed rating
    pub initial_comment: Option<String>,
}

impl NewPhoneRecord {
    /// Creates a new submission
    pub fn new(phone_number: impl Into<String>, rating_seed: i32, is_dangerous_seed: bool) -> Self {
        Self {
            phone_number: phone_number.into(),
            rating_seed,
            is_dangerous_seed,
            initial_comment: None,
        }
    }

    /// Attaches an initial comment to the submission
    pub fn with_initial_comment(mut self, text: impl Into<String>) -> Self {
        self.initial_comment = Some(text.into());
        self
    }

    /// Checks that the seed danger flag matches the seed rating
    pub fn seed_is_consistent(&self) -> bool {
        self.is_dangerous_seed == PhoneRecord::danger_flag(self.rating_seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_derives_danger_flag() {
        let safe = PhoneRecord::new("79991234567", 0);
        assert!(!safe.is_dangerous);

        let positive = PhoneRecord::new("79991234567", 3);
        assert!(!positive.is_dangerous);

        let dangerous = PhoneRecord::new("79991234567", -1);
        assert!(dangerous.is_dangerous);
    }

    #[test]
    fn test_zero_rating_is_not_dangerous() {
        assert!(!PhoneRecord::danger_flag(0));
        assert!(!PhoneRecord::danger_flag(1));
        assert!(PhoneRecord::danger_flag(-1));
    }

    #[test]
    fn test_apply_delta_transitions() {
        let mut record = PhoneRecord::new("79991234567", -1);
        assert!(record.is_dangerous);

        record.apply_delta(1);
        assert_eq!(record.rating, 0);
        assert!(!record.is_dangerous);

        record.apply_delta(-1);
        record.apply_delta(-1);
        assert_eq!(record.rating, -2);
        assert!(record.is_dangerous);
    }

    #[test]
    fn test_polarity_deltas() {
        assert_eq!(Polarity::Positive.delta(), 1);
        assert_eq!(Polarity::Negative.delta(), -1);
        assert_eq!(Polarity::from_flag(true), Polarity::Positive);
        assert_eq!(Polarity::from_flag(false), Polarity::Negative);
        assert!(Polarity::Positive.is_positive());
        assert!(!Polarity::Negative.is_positive());
    }

    #[test]
    fn test_seed_consistency() {
        assert!(NewPhoneRecord::new("79991234567", -1, true).seed_is_consistent());
        assert!(NewPhoneRecord::new("79991234567", 1, false).seed_is_consistent());
        assert!(NewPhoneRecord::new("79991234567", 0, false).seed_is_consistent());
        assert!(!NewPhoneRecord::new("79991234567", 0, true).seed_is_consistent());
        assert!(!NewPhoneRecord::new("79991234567", -2, false).seed_is_consistent());
    }

    #[test]
    fn test_submission_with_initial_comment() {
        let submission = NewPhoneRecord::new("79991234567", 1, false)
            .with_initial_comment("Answered politely, legitimate courier");
        assert_eq!(
            submission.initial_comment.as_deref(),
            Some("Answered politely, legitimate courier")
        );
    }
}
