//! Property-based tests for the simplification pass.
