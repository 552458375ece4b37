//! Audit service module for recording directory mutations.

mod service;

pub use service::AuditService;

#[cfg(test)]
mod tests;
