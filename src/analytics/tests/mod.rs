//! Unit tests for closure statistics.
