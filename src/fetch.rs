//! HTTP transport with exponential backoff retry logic.
//!
//! Both network stages of the pipeline (the API search and the article
//! download) go through the same small transport abstraction:
//!
//! - [`HttpFetch`]: core trait, "GET a URL, give me the body as text"
//! - [`HttpClient`]: reqwest-backed implementation with a timeout and
//!   a `name/version` User-Agent
//! - [`RetryFetch`]: decorator that adds retry logic to any [`HttpFetch`]
//!
//! Tests swap in fake [`HttpFetch`] implementations, so no live network
//! is involved anywhere in the suite.
//!
//! # Retry Strategy
//!
//! - Maximum 3 retry attempts
//! - Exponential backoff starting at 1 second
//! - Maximum delay capped at 30 seconds
//! - Random jitter (0-250ms) added to prevent thundering herd
//! - Only transient failures are retried (transport errors, 5xx, 429);
//!   see [`Error::is_retryable`]

use crate::error::Error;
use rand::{Rng, rng};
use std::fmt;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, error, instrument, warn};

/// Default retry budget for both network calls.
pub const MAX_RETRIES: usize = 3;

/// Trait for fetching a URL's body as text.
///
/// Implementors perform one GET request and return the response body.
/// This abstraction allows decorators (like retry logic) and test fakes.
pub trait HttpFetch {
    /// GET `url` and return the response body as text.
    ///
    /// A non-success HTTP status is an error ([`Error::Status`]), not a
    /// body to parse.
    async fn get_text(&self, url: &str) -> Result<String, Error>;
}

/// reqwest-backed [`HttpFetch`] implementation.
///
/// Configured once with a per-request timeout and a `readable_news/<version>`
/// User-Agent, then shared by both pipeline stages.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    /// Build a client with the given per-request timeout.
    pub fn new(timeout: Duration) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl HttpFetch for HttpClient {
    #[instrument(level = "info", skip_all, fields(%url))]
    async fn get_text(&self, url: &str) -> Result<String, Error> {
        let t0 = Instant::now();
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(%status, elapsed_ms = t0.elapsed().as_millis() as u128, "Non-success HTTP status");
            return Err(Error::Status {
                url: url.to_string(),
                status,
            });
        }
        let body = response.text().await?;
        debug!(
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u128,
            "Fetched URL"
        );
        Ok(body)
    }
}

/// Wrapper that adds exponential backoff retry logic to any [`HttpFetch`]
/// implementation.
///
/// # Backoff Strategy
///
/// The delay between retries follows this formula:
/// ```text
/// delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..250ms)
/// ```
pub struct RetryFetch<T> {
    /// The underlying transport to wrap.
    inner: T,
    /// Maximum number of retry attempts before giving up.
    max_retries: usize,
    /// Initial delay between retries (doubles with each attempt).
    base_delay: Duration,
    /// Maximum delay cap to prevent excessive waiting.
    max_delay: Duration,
}

impl<T> RetryFetch<T>
where
    T: HttpFetch,
{
    /// Create a new retry wrapper around an existing [`HttpFetch`]
    /// implementation.
    pub fn new(inner: T, max_retries: usize, base_delay: Duration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: Duration::from_secs(30),
        }
    }
}

impl<T> fmt::Debug for RetryFetch<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryFetch")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

impl<T> HttpFetch for RetryFetch<T>
where
    T: HttpFetch,
{
    #[instrument(level = "info", skip_all, fields(%url))]
    async fn get_text(&self, url: &str) -> Result<String, Error> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            let attempt_t0 = Instant::now();
            match self.inner.get_text(url).await {
                Ok(body) => {
                    return Ok(body);
                }
                Err(e) => {
                    attempt += 1;
                    let attempt_dt = attempt_t0.elapsed();
                    let total_dt = total_t0.elapsed();

                    if !e.is_retryable() {
                        warn!(
                            attempt,
                            elapsed_ms_attempt = attempt_dt.as_millis() as u128,
                            error = %e,
                            "get_text() failed with a non-retryable error"
                        );
                        return Err(e);
                    }

                    if attempt > self.max_retries {
                        error!(
                            attempt,
                            max = self.max_retries,
                            elapsed_ms_attempt = attempt_dt.as_millis() as u128,
                            elapsed_ms_total = total_dt.as_millis() as u128,
                            error = %e,
                            "get_text() exhausted retries"
                        );
                        return Err(e);
                    }

                    // backoff calc
                    let mut delay = self.base_delay.saturating_mul(1 << (attempt - 1));
                    if delay > self.max_delay {
                        delay = self.max_delay;
                    }
                    let jitter_ms: u64 = rng().random_range(0..=250);
                    let delay = delay + Duration::from_millis(jitter_ms);

                    warn!(
                        attempt,
                        max = self.max_retries,
                        elapsed_ms_attempt = attempt_dt.as_millis() as u128,
                        elapsed_ms_total = total_dt.as_millis() as u128,
                        ?delay,
                        error = %e,
                        "get_text() attempt failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Returns pre-scripted outcomes in order, ignoring the URL.
    struct Scripted {
        outcomes: Mutex<VecDeque<Result<String, Error>>>,
    }

    impl Scripted {
        fn new(outcomes: Vec<Result<String, Error>>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes.into()),
            }
        }

        fn remaining(&self) -> usize {
            self.outcomes.lock().unwrap().len()
        }
    }

    impl HttpFetch for Scripted {
        async fn get_text(&self, _url: &str) -> Result<String, Error> {
            self.outcomes
                .lock()
                .unwrap()
                .pop_front()
                .expect("script exhausted")
        }
    }

    fn server_error() -> Error {
        Error::Status {
            url: "http://a".to_string(),
            status: StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    #[tokio::test]
    async fn test_retries_transient_failures_until_success() {
        let scripted = Scripted::new(vec![
            Err(server_error()),
            Err(server_error()),
            Ok("body".to_string()),
        ]);
        let fetch = RetryFetch::new(scripted, 3, Duration::from_millis(1));

        let body = fetch.get_text("http://a").await.unwrap();
        assert_eq!(body, "body");
        assert_eq!(fetch.inner.remaining(), 0);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let scripted = Scripted::new(vec![
            Err(server_error()),
            Err(server_error()),
            Err(server_error()),
        ]);
        let fetch = RetryFetch::new(scripted, 2, Duration::from_millis(1));

        let err = fetch.get_text("http://a").await.unwrap_err();
        assert!(matches!(err, Error::Status { .. }));
        assert_eq!(fetch.inner.remaining(), 0);
    }

    #[tokio::test]
    async fn test_non_retryable_error_fails_fast() {
        let unauthorized = Error::Status {
            url: "http://a".to_string(),
            status: StatusCode::UNAUTHORIZED,
        };
        let scripted = Scripted::new(vec![Err(unauthorized), Ok("never".to_string())]);
        let fetch = RetryFetch::new(scripted, 3, Duration::from_millis(1));

        let err = fetch.get_text("http://a").await.unwrap_err();
        match err {
            Error::Status { status, .. } => assert_eq!(status, StatusCode::UNAUTHORIZED),
            other => panic!("unexpected error: {other}"),
        }
        // The scripted success was never consumed.
        assert_eq!(fetch.inner.remaining(), 1);
    }
}
