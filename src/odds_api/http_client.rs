//! HTTP client creation and configuration utilities

use reqwest::Client;
use std::time::Duration;

/// Creates the reqwest client used for odds API calls.
///
/// No request timeout is applied unless `timeout_seconds` is given; callers
/// needing bounded latency set `http_timeout_seconds` in the config.
pub fn create_http_client(timeout_seconds: Option<u64>) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .pool_max_idle_per_host(crate::constants::HTTP_POOL_MAX_IDLE_PER_HOST)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")));

    if let Some(seconds) = timeout_seconds {
        builder = builder.timeout(Duration::from_secs(seconds));
    }

    builder.build()
}

/// Creates an HTTP client for testing with a short timeout
#[cfg(test)]
pub fn create_test_http_client() -> Client {
    create_http_client(Some(5)).expect("Failed to create test HTTP client")
}
