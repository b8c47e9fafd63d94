//! Integration tests for crawl-bench
//!
//! These tests use wiremock to stand in for the network and run every
//! strategy end-to-end against it. The mock server lives on its own
//! multi-threaded runtime so the blocking runners can be called directly from
//! the test thread.

mod benchmark_tests;
mod link_tests;
mod strategy_tests;
mod support;
