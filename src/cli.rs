//! Command-line interface definitions for readable_news.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! All arguments can be provided via command-line flags; the API key can also
//! come from the environment.

use clap::{Parser, ValueEnum};

/// Result ordering accepted by the news API's `sortBy` parameter.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum SortBy {
    /// Newest articles first.
    PublishedAt,
    /// Best match for the query first.
    Relevancy,
    /// Most-referenced sources first.
    Popularity,
}

impl SortBy {
    /// The camelCase value the API expects in the query string.
    pub fn as_query_value(self) -> &'static str {
        match self {
            SortBy::PublishedAt => "publishedAt",
            SortBy::Relevancy => "relevancy",
            SortBy::Popularity => "popularity",
        }
    }
}

/// Command-line arguments for readable_news.
///
/// # Examples
///
/// ```sh
/// # Print the readable text of the second newest "green economy" article
/// readable_news --api-key YOUR_KEY
///
/// # Combine several keywords (OR'd together) and read the first result
/// readable_news -q "green bonds" -q "sustainable finance" --pick 0
///
/// # Only consider articles from the last week
/// readable_news --from-days-ago 7
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Search keyword or phrase; repeat the flag to OR several together
    #[arg(short, long = "query", default_value = "green economy")]
    pub query: Vec<String>,

    /// ISO 639-1 language code for the search
    #[arg(short, long, default_value = "en")]
    pub language: String,

    /// How the API should order results
    #[arg(short, long, value_enum, default_value = "published-at")]
    pub sort_by: SortBy,

    /// Only include articles published at most this many days ago
    #[arg(long)]
    pub from_days_ago: Option<u64>,

    /// Which search result to read, 0-based
    #[arg(short, long, default_value_t = 1)]
    pub pick: usize,

    /// News API key
    #[arg(short = 'k', long, env = "NEWS_API_KEY")]
    pub api_key: String,

    /// Base URL of the news search API
    #[arg(long, default_value = "https://newsapi.org")]
    pub api_base: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 15)]
    pub timeout_secs: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["readable_news", "--api-key", "test-key"]);

        assert_eq!(cli.query, vec!["green economy".to_string()]);
        assert_eq!(cli.language, "en");
        assert_eq!(cli.sort_by, SortBy::PublishedAt);
        assert_eq!(cli.pick, 1);
        assert_eq!(cli.api_base, "https://newsapi.org");
        assert_eq!(cli.timeout_secs, 15);
        assert!(cli.from_days_ago.is_none());
    }

    #[test]
    fn test_cli_repeated_query_flags() {
        let cli = Cli::parse_from([
            "readable_news",
            "-k",
            "test-key",
            "-q",
            "green bonds",
            "-q",
            "sustainable finance",
        ]);

        assert_eq!(
            cli.query,
            vec!["green bonds".to_string(), "sustainable finance".to_string()]
        );
    }

    #[test]
    fn test_cli_sort_and_pick() {
        let cli = Cli::parse_from([
            "readable_news",
            "-k",
            "test-key",
            "--sort-by",
            "relevancy",
            "--pick",
            "0",
        ]);

        assert_eq!(cli.sort_by, SortBy::Relevancy);
        assert_eq!(cli.pick, 0);
    }

    #[test]
    fn test_sort_by_query_values() {
        assert_eq!(SortBy::PublishedAt.as_query_value(), "publishedAt");
        assert_eq!(SortBy::Relevancy.as_query_value(), "relevancy");
        assert_eq!(SortBy::Popularity.as_query_value(), "popularity");
    }
}
