//! Unit tests for the case and cluster catalog.
