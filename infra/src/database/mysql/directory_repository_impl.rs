//! MySQL implementation of the DirectoryRepository trait.
//!
//! Phone records and their comments are kept consistent by running each
//! comment mutation in a transaction together with a conditional rating
//! `UPDATE`. A conditional update that affects zero rows means another
//! writer moved the rating first; the transaction rolls back and the
//! caller's retry loop re-reads.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use td_core::domain::entities::{Comment, PhoneRecord};
use td_core::errors::DomainError;
use td_core::repositories::{CommentDeletion, DirectoryRepository};

/// MySQL implementation of DirectoryRepository
pub struct MySqlDirectoryRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlDirectoryRepository {
    /// Create a new MySQL directory repository
    ///
    /// # Arguments
    /// * `pool` - MySQL connection pool from SQLx
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert database row to PhoneRecord entity
    fn row_to_record(row: &sqlx::mysql::MySqlRow) -> Result<PhoneRecord, DomainError> {
        let id: String = row.try_get("id").map_err(|e| DomainError::Internal {
            message: format!("Failed to get id: {}", e),
        })?;

        Ok(PhoneRecord {
            id: Uuid::parse_str(&id).map_err(|e| DomainError::Internal {
                message: format!("Invalid UUID: {}", e),
            })?,
            phone_number: row
                .try_get("phone_number")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get phone_number: {}", e),
                })?,
            rating: row.try_get("rating").map_err(|e| DomainError::Internal {
                message: format!("Failed to get rating: {}", e),
            })?,
            is_dangerous: row
                .try_get("is_dangerous")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get is_dangerous: {}", e),
                })?,
            date_added: row
                .try_get::<DateTime<Utc>, _>("date_added")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get date_added: {}", e),
                })?,
        })
    }

    /// Convert database row to Comment entity
    fn row_to_comment(row: &sqlx::mysql::MySqlRow) -> Result<Comment, DomainError> {
        let id: String = row.try_get("id").map_err(|e| DomainError::Internal {
            message: format!("Failed to get id: {}", e),
        })?;
        let phone_id: String = row.try_get("phone_id").map_err(|e| DomainError::Internal {
            message: format!("Failed to get phone_id: {}", e),
        })?;
        let user_id: String = row.try_get("user_id").map_err(|e| DomainError::Internal {
            message: format!("Failed to get user_id: {}", e),
        })?;

        Ok(Comment {
            id: Uuid::parse_str(&id).map_err(|e| DomainError::Internal {
                message: format!("Invalid UUID: {}", e),
            })?,
            phone_id: Uuid::parse_str(&phone_id).map_err(|e| DomainError::Internal {
                message: format!("Invalid UUID: {}", e),
            })?,
            user_id: Uuid::parse_str(&user_id).map_err(|e| DomainError::Internal {
                message: format!("Invalid UUID: {}", e),
            })?,
            text: row.try_get("text").map_err(|e| DomainError::Internal {
                message: format!("Failed to get text: {}", e),
            })?,
            is_positive: row
                .try_get("is_positive")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get is_positive: {}", e),
                })?,
            date_added: row
                .try_get::<DateTime<Utc>, _>("date_added")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get date_added: {}", e),
                })?,
        })
    }

    async fn record_exists(&self, id: Uuid) -> Result<bool, DomainError> {
        let row = sqlx::query(
            "SELECT EXISTS(SELECT 1 FROM phone_records WHERE id = ?) AS record_exists",
        )
        .bind(id.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::Internal {
            message: format!("Failed to check record existence: {}", e),
        })?;

        let exists: i8 = row
            .try_get("record_exists")
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to get existence result: {}", e),
            })?;

        Ok(exists == 1)
    }
}

const INSERT_COMMENT_SQL: &str = r#"
    INSERT INTO comments (id, phone_id, user_id, text, is_positive, date_added)
    VALUES (?, ?, ?, ?, ?, ?)
"#;

const CONDITIONAL_RATING_SQL: &str = r#"
    UPDATE phone_records
    SET rating = ?, is_dangerous = ?
    WHERE id = ? AND rating = ?
"#;

#[async_trait]
impl DirectoryRepository for MySqlDirectoryRepository {
    async fn find_record(&self, id: Uuid) -> Result<Option<PhoneRecord>, DomainError> {
        let query = r#"
            SELECT id, phone_number, rating, is_dangerous, date_added
            FROM phone_records
            WHERE id = ?
            LIMIT 1
        "#;

        let result = sqlx::query(query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Database query failed: {}", e),
            })?;

        match result {
            Some(row) => Ok(Some(Self::row_to_record(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_records_by_number(
        &self,
        phone_number: &str,
    ) -> Result<Vec<PhoneRecord>, DomainError> {
        let query = r#"
            SELECT id, phone_number, rating, is_dangerous, date_added
            FROM phone_records
            WHERE phone_number = ?
            ORDER BY date_added DESC
        "#;

        let rows = sqlx::query(query)
            .bind(phone_number)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Database query failed: {}", e),
            })?;

        rows.iter().map(Self::row_to_record).collect()
    }

    async fn list_records(&self) -> Result<Vec<PhoneRecord>, DomainError> {
        let query = r#"
            SELECT id, phone_number, rating, is_dangerous, date_added
            FROM phone_records
            ORDER BY date_added DESC
        "#;

        let rows = sqlx::query(query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Database query failed: {}", e),
            })?;

        rows.iter().map(Self::row_to_record).collect()
    }

    async fn insert_record(
        &self,
        record: PhoneRecord,
        initial_comment: Option<Comment>,
    ) -> Result<PhoneRecord, DomainError> {
        let mut tx = self.pool.begin().await.map_err(|e| DomainError::Internal {
            message: format!("Failed to begin transaction: {}", e),
        })?;

        sqlx::query(
            r#"
            INSERT INTO phone_records (id, phone_number, rating, is_dangerous, date_added)
            VALUES (?, ?, ?, ?, ?)
        "#,
        )
        .bind(record.id.to_string())
        .bind(&record.phone_number)
        .bind(record.rating)
        .bind(record.is_dangerous)
        .bind(record.date_added)
        .execute(&mut *tx)
        .await
        .map_err(|e| DomainError::Internal {
            message: format!("Failed to insert phone record: {}", e),
        })?;

        if let Some(comment) = &initial_comment {
            sqlx::query(INSERT_COMMENT_SQL)
                .bind(comment.id.to_string())
                .bind(comment.phone_id.to_string())
                .bind(comment.user_id.to_string())
                .bind(&comment.text)
                .bind(comment.is_positive)
                .bind(comment.date_added)
                .execute(&mut *tx)
                .await
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to insert initial comment: {}", e),
                })?;
        }

        tx.commit().await.map_err(|e| DomainError::Internal {
            message: format!("Failed to commit transaction: {}", e),
        })?;

        Ok(record)
    }

    async fn update_rating(
        &self,
        id: Uuid,
        expected_rating: i32,
        new_rating: i32,
        new_is_dangerous: bool,
    ) -> Result<bool, DomainError> {
        let result = sqlx::query(CONDITIONAL_RATING_SQL)
            .bind(new_rating)
            .bind(new_is_dangerous)
            .bind(id.to_string())
            .bind(expected_rating)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to update rating: {}", e),
            })?;

        if result.rows_affected() == 0 {
            // Distinguish a missing record from a lost race
            if !self.record_exists(id).await? {
                return Err(DomainError::NotFound {
                    resource: "PhoneRecord".to_string(),
                });
            }
            return Ok(false);
        }

        Ok(true)
    }

    async fn insert_comment(
        &self,
        comment: Comment,
        expected_rating: i32,
        new_rating: i32,
        new_is_dangerous: bool,
    ) -> Result<bool, DomainError> {
        let mut tx = self.pool.begin().await.map_err(|e| DomainError::Internal {
            message: format!("Failed to begin transaction: {}", e),
        })?;

        let updated = sqlx::query(CONDITIONAL_RATING_SQL)
            .bind(new_rating)
            .bind(new_is_dangerous)
            .bind(comment.phone_id.to_string())
            .bind(expected_rating)
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to update rating: {}", e),
            })?;

        if updated.rows_affected() == 0 {
            tx.rollback().await.map_err(|e| DomainError::Internal {
                message: format!("Failed to roll back transaction: {}", e),
            })?;
            if !self.record_exists(comment.phone_id).await? {
                return Err(DomainError::NotFound {
                    resource: "PhoneRecord".to_string(),
                });
            }
            return Ok(false);
        }

        sqlx::query(INSERT_COMMENT_SQL)
            .bind(comment.id.to_string())
            .bind(comment.phone_id.to_string())
            .bind(comment.user_id.to_string())
            .bind(&comment.text)
            .bind(comment.is_positive)
            .bind(comment.date_added)
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to insert comment: {}", e),
            })?;

        tx.commit().await.map_err(|e| DomainError::Internal {
            message: format!("Failed to commit transaction: {}", e),
        })?;

        Ok(true)
    }

    async fn find_comment(&self, id: Uuid) -> Result<Option<Comment>, DomainError> {
        let query = r#"
            SELECT id, phone_id, user_id, text, is_positive, date_added
            FROM comments
            WHERE id = ?
            LIMIT 1
        "#;

        let result = sqlx::query(query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Database query failed: {}", e),
            })?;

        match result {
            Some(row) => Ok(Some(Self::row_to_comment(&row)?)),
            None => Ok(None),
        }
    }

    async fn delete_comment(
        &self,
        comment_id: Uuid,
        phone_id: Uuid,
        expected_rating: i32,
        new_rating: i32,
        new_is_dangerous: bool,
    ) -> Result<CommentDeletion, DomainError> {
        let mut tx = self.pool.begin().await.map_err(|e| DomainError::Internal {
            message: format!("Failed to begin transaction: {}", e),
        })?;

        let deleted = sqlx::query("DELETE FROM comments WHERE id = ? AND phone_id = ?")
            .bind(comment_id.to_string())
            .bind(phone_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to delete comment: {}", e),
            })?;

        if deleted.rows_affected() == 0 {
            tx.rollback().await.map_err(|e| DomainError::Internal {
                message: format!("Failed to roll back transaction: {}", e),
            })?;
            return Ok(CommentDeletion::CommentMissing);
        }

        let updated = sqlx::query(CONDITIONAL_RATING_SQL)
            .bind(new_rating)
            .bind(new_is_dangerous)
            .bind(phone_id.to_string())
            .bind(expected_rating)
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to update rating: {}", e),
            })?;

        if updated.rows_affected() == 0 {
            tx.rollback().await.map_err(|e| DomainError::Internal {
                message: format!("Failed to roll back transaction: {}", e),
            })?;
            if !self.record_exists(phone_id).await? {
                return Err(DomainError::NotFound {
                    resource: "PhoneRecord".to_string(),
                });
            }
            return Ok(CommentDeletion::RatingConflict);
        }

        tx.commit().await.map_err(|e| DomainError::Internal {
            message: format!("Failed to commit transaction: {}", e),
        })?;

        Ok(CommentDeletion::Applied)
    }

    async fn list_comments(&self, phone_id: Uuid) -> Result<Vec<Comment>, DomainError> {
        let query = r#"
            SELECT id, phone_id, user_id, text, is_positive, date_added
            FROM comments
            WHERE phone_id = ?
            ORDER BY date_added ASC
        "#;

        let rows = sqlx::query(query)
            .bind(phone_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Database query failed: {}", e),
            })?;

        rows.iter().map(Self::row_to_comment).collect()
    }
}
