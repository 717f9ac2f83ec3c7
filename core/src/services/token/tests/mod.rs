//! Unit tests for the token codec and lifecycle service

mod service_tests;
