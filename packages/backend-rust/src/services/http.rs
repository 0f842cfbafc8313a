//! Shared plumbing for the upstream HTTP clients: env helpers and a retry
//! loop with exponential backoff.

use std::time::Duration;

use thiserror::Error;
use tokio::time::sleep;
use tracing::warn;

pub const MAX_RETRIES: usize = 3;
pub const BASE_BACKOFF_MS: u64 = 200;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        status: reqwest::StatusCode,
        body: String,
    },
}

pub fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

pub fn env_u64(key: &str) -> Option<u64> {
    env_string(key)?.parse().ok()
}

pub fn build_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

pub fn is_retryable(status: reqwest::StatusCode) -> bool {
    status == reqwest::StatusCode::TOO_MANY_REQUESTS
        || status == reqwest::StatusCode::REQUEST_TIMEOUT
        || status.is_server_error()
}

fn backoff(retry: usize) -> Duration {
    Duration::from_millis(BASE_BACKOFF_MS * (1 << retry))
}

/// Send the request built by `make`, retrying transport errors and
/// retryable statuses. Returns the first successful response.
pub async fn send_with_retry<F>(service: &'static str, make: F) -> Result<reqwest::Response, HttpError>
where
    F: Fn() -> reqwest::RequestBuilder,
{
    let mut last_error: Option<HttpError> = None;

    for retry in 0..=MAX_RETRIES {
        match make().send().await {
            Ok(resp) => {
                let status = resp.status();
                if status.is_success() {
                    return Ok(resp);
                }
                let body = resp.text().await.unwrap_or_default();
                let err = HttpError::HttpStatus { status, body };
                if retry < MAX_RETRIES && is_retryable(status) {
                    warn!(service, retry, ?status, "upstream request failed, retrying");
                    sleep(backoff(retry)).await;
                    last_error = Some(err);
                    continue;
                }
                return Err(err);
            }
            Err(e) => {
                let err = HttpError::Request(e);
                if retry < MAX_RETRIES {
                    warn!(service, retry, error = %err, "upstream request error, retrying");
                    sleep(backoff(retry)).await;
                    last_error = Some(err);
                    continue;
                }
                return Err(err);
            }
        }
    }

    Err(last_error.unwrap_or(HttpError::HttpStatus {
        status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
        body: String::new(),
    }))
}
