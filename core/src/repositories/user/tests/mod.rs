//! Tests for the user repository module
