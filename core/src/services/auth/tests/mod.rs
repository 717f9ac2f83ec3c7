//! Unit tests for the authentication service
