//! Tests for the directory repository module
