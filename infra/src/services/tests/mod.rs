//! Unit and integration tests for infrastructure services
