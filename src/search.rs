//! Query construction and search client for the news API.
//!
//! The search side of the pipeline has two halves:
//!
//! 1. **Query builder**: pure string construction. Keywords are quoted,
//!    OR-joined, and percent-encoded; the full URL is deterministic for a
//!    fixed set of inputs.
//! 2. **Search client**: one GET against `/v2/everything`, JSON decoding,
//!    and validation of the API's in-band `status` field.
//!
//! Result selection lives here too: [`select_article`] turns a missing
//! index into a typed error instead of a panic.

use crate::cli::SortBy;
use crate::error::Error;
use crate::fetch::HttpFetch;
use crate::models::{SearchResponse, SearchResult};
use crate::utils::truncate_for_log;
use chrono::NaiveDate;
use tracing::{info, instrument, warn};

/// Quote each keyword, OR-join them, and percent-encode the result.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(
///     build_query(&["green economy".to_string()]),
///     "%22green%20economy%22"
/// );
/// ```
pub fn build_query(keywords: &[String]) -> String {
    let joined = keywords
        .iter()
        .map(|kw| format!("\"{kw}\""))
        .collect::<Vec<_>>()
        .join(" OR ");
    urlencoding::encode(&joined).into_owned()
}

/// Build the full search request URL.
///
/// Pure string construction: no randomness, no clock reads. The `from`
/// date, when present, is computed by the caller so repeated calls with
/// the same arguments yield byte-identical URLs.
pub fn build_search_url(
    base: &str,
    keywords: &[String],
    language: &str,
    sort_by: SortBy,
    from_date: Option<NaiveDate>,
    api_key: &str,
) -> String {
    let mut url = format!(
        "{}/v2/everything?q={}",
        base.trim_end_matches('/'),
        build_query(keywords)
    );
    if let Some(date) = from_date {
        url.push_str(&format!("&from={date}"));
    }
    url.push_str(&format!(
        "&language={language}&sortBy={}&apiKey={api_key}",
        sort_by.as_query_value()
    ));
    url
}

/// Decode and validate a search response body.
///
/// The API reports failures in-band: `status != "ok"` becomes
/// [`Error::Api`] carrying the API's own code and message.
pub fn parse_search_response(body: &str) -> Result<SearchResponse, Error> {
    let response: SearchResponse = serde_json::from_str(body).inspect_err(|e| {
        warn!(error = %e, body_preview = %truncate_for_log(body, 300), "Search response was not valid JSON");
    })?;
    if response.status != "ok" {
        return Err(Error::Api {
            code: response.code,
            message: response
                .message
                .unwrap_or_else(|| "no message in error response".to_string()),
        });
    }
    Ok(response)
}

/// Execute the search request and return the validated response.
#[instrument(level = "info", skip_all)]
pub async fn search<F: HttpFetch>(fetch: &F, url: &str) -> Result<SearchResponse, Error> {
    let body = fetch.get_text(url).await?;
    let response = parse_search_response(&body)?;
    info!(
        total_results = ?response.totalResults,
        returned = response.articles.len(),
        "Search completed"
    );
    Ok(response)
}

/// Pick one result from the response by index.
///
/// Fewer than `index + 1` results is [`Error::PickOutOfRange`], never a
/// panic.
pub fn select_article(response: &SearchResponse, index: usize) -> Result<&SearchResult, Error> {
    response.articles.get(index).ok_or(Error::PickOutOfRange {
        index,
        count: response.articles.len(),
    })
}
