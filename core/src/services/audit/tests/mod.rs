//! Tests for the audit service

#[cfg(test)]
mod service_tests;
