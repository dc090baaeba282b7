//! Test helpers for the OCI API

use super::{Client, RetryPolicy};

/// Client against a mock server that does not back off between retries
pub fn create_test_client(url: &str) -> Client {
    let policy = RetryPolicy {
        max_retries: 1,
        initial_backoff_ms: 1,
        max_backoff_ms: 1,
        timeout_seconds: 5,
    };
    Client::with_policy(url, Some("test-token"), policy).unwrap()
}
