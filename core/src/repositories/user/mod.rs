//! User repository module.
//!
//! Provides the `UserRepository` trait for account lookup and OTP state
//! persistence, plus an in-memory mock used by service tests.

mod r#trait;
pub use r#trait::UserRepository;

mod mock;
pub use mock::MockUserRepository;

#[cfg(test)]
mod tests;
