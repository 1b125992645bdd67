//! Integration tests for the audit pipeline
//!
//! These tests use wiremock to stand in for the Search Console, Webmasters
//! and Indexing APIs and drive a full run through the coordinator.

mod audit_tests;
