//! Property-based tests for inversion round trips.
