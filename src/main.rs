//! # readable_news
//!
//! Search a news API for articles on a topic, download one result, and
//! print its readable text.
//!
//! ## Usage
//!
//! ```sh
//! NEWS_API_KEY=... readable_news -q "green economy"
//! ```
//!
//! ## Architecture
//!
//! The application is a single forward-only pipeline:
//! 1. **Query building**: construct the search URL from the CLI arguments
//! 2. **Search**: one GET against the news API's `everything` endpoint
//! 3. **Selection**: pick one result by index (`--pick`, default 1)
//! 4. **Fetch**: download the selected article's HTML
//! 5. **Extraction**: readability heuristic with a CSS-selector fallback
//! 6. **Output**: write the plain text to stdout
//!
//! Both network calls share one retrying HTTP client. Any stage failure
//! propagates to the top-level handler, which logs it and exits non-zero.

use chrono::{Days, Local};
use clap::Parser;
use std::io::Write;
use std::time::Duration;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod error;
mod extract;
mod fetch;
mod models;
mod search;
mod utils;

use cli::Cli;
use error::Error;
use fetch::{HttpClient, HttpFetch, MAX_RETRIES, RetryFetch};

/// Run the search-fetch-extract pipeline and write the article text to `out`.
async fn run<F, W>(fetch: &F, args: &Cli, out: &mut W) -> Result<(), Error>
where
    F: HttpFetch,
    W: Write,
{
    let from_date = args
        .from_days_ago
        .map(|days| Local::now().date_naive() - Days::new(days));

    let search_url = search::build_search_url(
        &args.api_base,
        &args.query,
        &args.language,
        args.sort_by,
        from_date,
        &args.api_key,
    );
    info!(
        query = ?args.query,
        language = %args.language,
        sort_by = ?args.sort_by,
        ?from_date,
        "Searching for articles"
    );

    let response = search::search(fetch, &search_url).await?;
    let picked = search::select_article(&response, args.pick)?;
    info!(
        index = args.pick,
        url = %picked.url,
        title = ?picked.title,
        source = ?picked.source,
        published_at = ?picked.publishedAt,
        "Selected search result"
    );

    let html = fetch.get_text(&picked.url).await?;
    debug!(url = %picked.url, bytes = html.len(), "Fetched article HTML");

    let article = extract::extract_article(&html, &picked.url)?;

    out.write_all(article.text.as_bytes())?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}

#[tokio::main]
async fn main() {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    let args = Cli::parse();
    debug!(?args.query, ?args.pick, "Parsed CLI arguments");

    let http = match HttpClient::new(Duration::from_secs(args.timeout_secs)) {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "Failed to build HTTP client");
            std::process::exit(1);
        }
    };
    let fetch = RetryFetch::new(http, MAX_RETRIES, Duration::from_secs(1));

    let mut stdout = std::io::stdout();
    if let Err(e) = run(&fetch, &args, &mut stdout).await {
        error!(error = %e, "readable_news failed");
        std::process::exit(1);
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use std::collections::HashMap;

    /// Serves canned bodies (or canned failures) by exact URL.
    struct FakeFetch {
        pages: HashMap<String, String>,
        failures: HashMap<String, StatusCode>,
    }

    impl FakeFetch {
        fn new() -> Self {
            Self {
                pages: HashMap::new(),
                failures: HashMap::new(),
            }
        }
    }

    impl HttpFetch for FakeFetch {
        async fn get_text(&self, url: &str) -> Result<String, Error> {
            if let Some(status) = self.failures.get(url) {
                return Err(Error::Status {
                    url: url.to_string(),
                    status: *status,
                });
            }
            self.pages.get(url).cloned().ok_or_else(|| Error::Status {
                url: url.to_string(),
                status: StatusCode::NOT_FOUND,
            })
        }
    }

    fn test_args() -> Cli {
        Cli::parse_from(["readable_news", "--api-key", "test-key"])
    }

    fn search_url_for(args: &Cli) -> String {
        search::build_search_url(
            &args.api_base,
            &args.query,
            &args.language,
            args.sort_by,
            None,
            &args.api_key,
        )
    }

    #[tokio::test]
    async fn test_pipeline_prints_text_of_second_result() {
        let args = test_args();
        let mut fetch = FakeFetch::new();
        fetch.pages.insert(
            search_url_for(&args),
            r#"{"status":"ok","totalResults":2,"articles":[{"url":"http://a"},{"url":"http://b"}]}"#
                .to_string(),
        );
        fetch.pages.insert(
            "http://b".to_string(),
            "<html><body><article><p>Hello world</p></article></body></html>".to_string(),
        );

        let mut out = Vec::new();
        run(&fetch, &args, &mut out).await.unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Hello world"));
    }

    #[tokio::test]
    async fn test_pipeline_surfaces_search_server_error() {
        let args = test_args();
        let mut fetch = FakeFetch::new();
        fetch
            .failures
            .insert(search_url_for(&args), StatusCode::INTERNAL_SERVER_ERROR);

        let mut out = Vec::new();
        let err = run(&fetch, &args, &mut out).await.unwrap_err();
        match err {
            Error::Status { status, .. } => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR)
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_pipeline_rejects_pick_beyond_result_count() {
        let args = test_args();
        let mut fetch = FakeFetch::new();
        fetch.pages.insert(
            search_url_for(&args),
            r#"{"status":"ok","totalResults":1,"articles":[{"url":"http://a"}]}"#.to_string(),
        );

        let mut out = Vec::new();
        let err = run(&fetch, &args, &mut out).await.unwrap_err();
        match err {
            Error::PickOutOfRange { index, count } => {
                assert_eq!(index, 1);
                assert_eq!(count, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_pipeline_surfaces_api_key_error() {
        let args = test_args();
        let mut fetch = FakeFetch::new();
        fetch.pages.insert(
            search_url_for(&args),
            r#"{"status":"error","code":"apiKeyInvalid","message":"Your API key is invalid"}"#
                .to_string(),
        );

        let mut out = Vec::new();
        let err = run(&fetch, &args, &mut out).await.unwrap_err();
        assert!(matches!(err, Error::Api { .. }));
    }
}
