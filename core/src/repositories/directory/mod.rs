//! Directory repository module.
//!
//! Provides the `DirectoryRepository` trait over phone records and their
//! comments. The conditional operations are the storage half of the
//! optimistic-concurrency discipline the ledger service builds on: every
//! rating write names the rating value the caller observed, and commits
//! only if it still holds.

mod r#trait;
pub use r#trait::{CommentDeletion, DirectoryRepository};

mod mock;
pub use mock::MockDirectoryRepository;

#[cfg(test)]
mod tests;
