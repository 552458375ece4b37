//! Tests for the audit log repository module

mod mock_tests;
