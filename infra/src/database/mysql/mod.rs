//! MySQL-specific database implementations
//!
//! This module contains MySQL implementations of the repository traits
//! from `td_core`, using SQLx for database operations. Conditional writes
//! are expressed as `UPDATE … WHERE` clauses whose `rows_affected()` count
//! tells a committed write apart from a lost race.

pub mod audit_repository_impl;
pub mod directory_repository_impl;
pub mod user_repository_impl;

// Re-export the MySQL implementations
pub use audit_repository_impl::MySqlAuditLogRepository;
pub use directory_repository_impl::MySqlDirectoryRepository;
pub use user_repository_impl::MySqlUserRepository;
