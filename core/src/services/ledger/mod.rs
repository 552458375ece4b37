//! Ledger service module
//!
//! This module provides the reputation ledger over phone records:
//! - Signed comments whose sign moves the record's rating by one
//! - Manual rating adjustments for administrators
//! - Record creation with seed rating and optional first comment
//! - The danger flag kept equal to `rating < 0` after every write
//!
//! Every mutation runs as an optimistic compare-and-swap on the record's
//! rating with bounded retry, and appends one audit entry after it
//! commits.

mod config;
mod service;

#[cfg(test)]
mod tests;

pub use config::LedgerConfig;
pub use service::LedgerService;
