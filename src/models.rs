//! Data models for search responses and extracted articles.
//!
//! This module defines the structures that flow through the pipeline:
//! - [`SearchResponse`] / [`SearchResult`]: the news API's JSON envelope
//! - [`SourceRef`]: the publisher reference embedded in each result
//! - [`ArticleText`]: the readable text produced by extraction
//!
//! The wire structs use camelCase field names to match the JSON the API
//! sends, hence the `#[allow(non_snake_case)]` attributes.

use serde::Deserialize;

/// The envelope returned by the news API's `everything` endpoint.
///
/// The API reports errors in-band: a 200 response can still carry
/// `status: "error"` with a `code` and `message`. Callers must check
/// `status` before trusting `articles`.
#[allow(non_snake_case)]
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    /// `"ok"` on success, `"error"` otherwise.
    pub status: String,
    /// Machine-readable error code, present when `status` is `"error"`.
    #[serde(default)]
    pub code: Option<String>,
    /// Human-readable error message, present when `status` is `"error"`.
    #[serde(default)]
    pub message: Option<String>,
    /// Total matches known to the API (may exceed `articles.len()`).
    #[serde(default)]
    pub totalResults: Option<u64>,
    /// The page of results returned by this request.
    #[serde(default)]
    pub articles: Vec<SearchResult>,
}

/// One entry from the search response.
///
/// Only `url` is required; everything else is best-effort metadata used
/// for logging.
#[allow(non_snake_case)]
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResult {
    /// Where the article lives. Consumed by the article fetcher.
    pub url: String,
    /// The article headline, if the API knew it.
    #[serde(default)]
    pub title: Option<String>,
    /// Publication timestamp in RFC 3339 format.
    #[serde(default)]
    pub publishedAt: Option<String>,
    /// The publishing outlet.
    #[serde(default)]
    pub source: Option<SourceRef>,
}

/// The publisher reference embedded in a search result.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceRef {
    pub id: Option<String>,
    pub name: Option<String>,
}

/// Readable article text produced by the content extractor.
#[derive(Debug)]
pub struct ArticleText {
    /// Title recovered during extraction, if any.
    pub title: Option<String>,
    /// The plain-text article body.
    pub text: String,
    /// Which extraction layer produced the text (`"readability"` or
    /// `"selector"`), for logging.
    pub layer: &'static str,
}
