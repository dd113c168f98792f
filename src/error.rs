//! Error types for the search-and-extract pipeline.
//!
//! Every stage returns a typed [`Error`] so failures propagate with `?` up to
//! one top-level handler in `main`, which logs the error and exits non-zero.

use reqwest::StatusCode;
use thiserror::Error;

/// The error type for all pipeline stages.
#[derive(Error, Debug)]
pub enum Error {
    /// Transport-level failure (DNS, connect, timeout, body read).
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success HTTP status.
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: StatusCode },

    /// The news API returned a well-formed body with `status != "ok"`.
    #[error("news API rejected the request: {message}")]
    Api {
        code: Option<String>,
        message: String,
    },

    /// The search response body was not the expected JSON shape.
    #[error("failed to decode search response: {0}")]
    Json(#[from] serde_json::Error),

    /// The requested result index does not exist in the search response.
    #[error("search returned {count} article(s); cannot pick index {index}")]
    PickOutOfRange { index: usize, count: usize },

    /// Neither extraction layer found any article text.
    #[error("no readable content found at {url}")]
    NoContent { url: String },

    /// Writing to the output sink failed.
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for transport failures and 5xx/429 statuses; everything else
    /// fails fast.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(_) => true,
            Error::Status { status, .. } => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            _ => false,
        }
    }
}
