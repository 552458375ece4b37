//! MySQL implementation of the UserRepository trait.
//!
//! This module provides the concrete implementation of account persistence
//! using MySQL with SQLx. The four one-time-code columns are written
//! together by a single conditional `UPDATE` keyed on the previously
//! observed `otp_requested_at`, which serializes racing issuers without
//! explicit locks.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use td_core::domain::entities::user::{User, UserOtp, UserRole};
use td_core::errors::DomainError;
use td_core::repositories::UserRepository;

/// MySQL implementation of UserRepository
pub struct MySqlUserRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlUserRepository {
    /// Create a new MySQL user repository
    ///
    /// # Arguments
    /// * `pool` - MySQL connection pool from SQLx
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn role_to_str(role: UserRole) -> &'static str {
        match role {
            UserRole::Admin => "admin",
            UserRole::User => "user",
        }
    }

    fn role_from_str(s: &str) -> Result<UserRole, DomainError> {
        match s {
            "admin" => Ok(UserRole::Admin),
            "user" => Ok(UserRole::User),
            other => Err(DomainError::Internal {
                message: format!("Unknown role: {}", other),
            }),
        }
    }

    /// Convert database row to User entity
    ///
    /// The one-time-code state is reassembled from its four columns; a row
    /// with only some of them set is corrupt and reported as an internal
    /// error rather than guessed at.
    fn row_to_user(row: &sqlx::mysql::MySqlRow) -> Result<User, DomainError> {
        let id: String = row.try_get("id").map_err(|e| DomainError::Internal {
            message: format!("Failed to get id: {}", e),
        })?;

        let role_str: String = row.try_get("role").map_err(|e| DomainError::Internal {
            message: format!("Failed to get role: {}", e),
        })?;

        let otp_code: Option<String> =
            row.try_get("otp_code").map_err(|e| DomainError::Internal {
                message: format!("Failed to get otp_code: {}", e),
            })?;

        let otp = match otp_code {
            Some(code) => {
                let expires_at: Option<DateTime<Utc>> =
                    row.try_get("otp_expires_at")
                        .map_err(|e| DomainError::Internal {
                            message: format!("Failed to get otp_expires_at: {}", e),
                        })?;
                let requested_at: Option<DateTime<Utc>> =
                    row.try_get("otp_requested_at")
                        .map_err(|e| DomainError::Internal {
                            message: format!("Failed to get otp_requested_at: {}", e),
                        })?;
                let device_id: Option<String> =
                    row.try_get("otp_device_id")
                        .map_err(|e| DomainError::Internal {
                            message: format!("Failed to get otp_device_id: {}", e),
                        })?;

                match (expires_at, requested_at, device_id) {
                    (Some(expires_at), Some(requested_at), Some(device_id)) => Some(UserOtp {
                        code,
                        expires_at,
                        requested_at,
                        device_id,
                    }),
                    _ => {
                        return Err(DomainError::Internal {
                            message: format!("Inconsistent one-time-code columns for user {}", id),
                        })
                    }
                }
            }
            None => None,
        };

        Ok(User {
            id: Uuid::parse_str(&id).map_err(|e| DomainError::Internal {
                message: format!("Invalid UUID: {}", e),
            })?,
            username: row.try_get("username").map_err(|e| DomainError::Internal {
                message: format!("Failed to get username: {}", e),
            })?,
            role: Self::role_from_str(&role_str)?,
            static_password: row
                .try_get("static_password")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get static_password: {}", e),
                })?,
            notify_address: row
                .try_get("notify_address")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get notify_address: {}", e),
                })?,
            otp,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get created_at: {}", e),
                })?,
        })
    }

    async fn exists_by_id(&self, id: Uuid) -> Result<bool, DomainError> {
        let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM users WHERE id = ?) AS user_exists")
            .bind(id.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to check user existence: {}", e),
            })?;

        let exists: i8 = row.try_get("user_exists").map_err(|e| DomainError::Internal {
            message: format!("Failed to get existence result: {}", e),
        })?;

        Ok(exists == 1)
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let query = r#"
            SELECT id, username, role, static_password,
                   otp_code, otp_expires_at, otp_requested_at, otp_device_id,
                   notify_address, created_at
            FROM users
            WHERE username = ?
            LIMIT 1
        "#;

        let result = sqlx::query(query)
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Database query failed: {}", e),
            })?;

        match result {
            Some(row) => Ok(Some(Self::row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let query = r#"
            SELECT id, username, role, static_password,
                   otp_code, otp_expires_at, otp_requested_at, otp_device_id,
                   notify_address, created_at
            FROM users
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
            Some(row) => Ok(Some(Self::row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        // Reject duplicate usernames up front for the readable error; the
        // unique key on username backstops any race.
        if self.find_by_username(&user.username).await?.is_some() {
            return Err(DomainError::Validation {
                message: "Username already registered".to_string(),
            });
        }

        let query = r#"
            INSERT INTO users (
                id, username, role, static_password,
                otp_code, otp_expires_at, otp_requested_at, otp_device_id,
                notify_address, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(user.id.to_string())
            .bind(&user.username)
            .bind(Self::role_to_str(user.role))
            .bind(&user.static_password)
            .bind(user.otp.as_ref().map(|o| o.code.as_str()))
            .bind(user.otp.as_ref().map(|o| o.expires_at))
            .bind(user.otp.as_ref().map(|o| o.requested_at))
            .bind(user.otp.as_ref().map(|o| o.device_id.as_str()))
            .bind(&user.notify_address)
            .bind(user.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to create user: {}", e),
            })?;

        Ok(user)
    }

    async fn update_otp(
        &self,
        user_id: Uuid,
        otp: Option<&UserOtp>,
        expected_requested_at: Option<DateTime<Utc>>,
    ) -> Result<bool, DomainError> {
        // NULL-safe comparison: an account that has never held a code
        // matches an expectation of NULL.
        let query = r#"
            UPDATE users
            SET otp_code = ?, otp_expires_at = ?, otp_requested_at = ?, otp_device_id = ?
            WHERE id = ? AND otp_requested_at <=> ?
        "#;

        let result = sqlx::query(query)
            .bind(otp.map(|o| o.code.as_str()))
            .bind(otp.map(|o| o.expires_at))
            .bind(otp.map(|o| o.requested_at))
            .bind(otp.map(|o| o.device_id.as_str()))
            .bind(user_id.to_string())
            .bind(expected_requested_at)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to update one-time code: {}", e),
            })?;

        if result.rows_affected() == 0 {
            // Distinguish a missing account from a lost race
            if !self.exists_by_id(user_id).await? {
                return Err(DomainError::NotFound {
                    resource: "User".to_string(),
                });
            }
            return Ok(false);
        }

        Ok(true)
    }
}
