//! Domain entities representing core business objects.

pub mod audit;
pub mod comment;
pub mod phone_record;
pub mod user;

// Re-export commonly used types
pub use audit::{AuditAction, AuditLogEntry};
pub use comment::Comment;
pub use phone_record::{NewPhoneRecord, PhoneRecord, Polarity};
pub use user::{User, UserOtp, UserRole};
