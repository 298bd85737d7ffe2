//! Property-based tests for tag handling and identifiers.
