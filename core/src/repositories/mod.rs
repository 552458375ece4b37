//! Repository interfaces (ports) and their in-memory test doubles.

pub mod audit;
pub mod directory;
pub mod user;

pub use audit::{AuditLogRepository, MockAuditLogRepository};
pub use directory::{CommentDeletion, DirectoryRepository, MockDirectoryRepository};
pub use user::{MockUserRepository, UserRepository};
