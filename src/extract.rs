//! Article text extraction from raw HTML.
//!
//! Extraction is layered, cheapest-acceptable-result-wins:
//!
//! 1. **Readability**: `dom_smoothie` builds a DOM anchored at the article
//!    URL and runs the Mozilla Readability heuristic over it. This handles
//!    most real article pages.
//! 2. **Selector fallback**: when readability errors out or finds nothing,
//!    a plain CSS-selector pass collects paragraph text from `article p`,
//!    or `body p` when the page has no `<article>` element.
//!
//! Only when both layers come up empty does the pipeline fail, with
//! [`Error::NoContent`].

use crate::error::Error;
use crate::models::ArticleText;
use dom_smoothie::Readability;
use scraper::{Html, Selector};
use tracing::{debug, info, instrument, warn};

/// Extract readable plain text from `html`, resolving relative links
/// against `url`.
#[instrument(level = "info", skip_all, fields(%url))]
pub fn extract_article(html: &str, url: &str) -> Result<ArticleText, Error> {
    if let Some(article) = readability_layer(html, url) {
        info!(
            chars = article.text.len(),
            layer = article.layer,
            title = ?article.title,
            "Extracted article text"
        );
        return Ok(article);
    }
    if let Some(article) = selector_layer(html) {
        info!(
            chars = article.text.len(),
            layer = article.layer,
            title = ?article.title,
            "Extracted article text"
        );
        return Ok(article);
    }
    warn!("No extraction layer produced text");
    Err(Error::NoContent {
        url: url.to_string(),
    })
}

/// Run the Readability heuristic. `None` means "try the next layer".
fn readability_layer(html: &str, url: &str) -> Option<ArticleText> {
    let mut reader = match Readability::new(html.to_string(), Some(url), None) {
        Ok(reader) => reader,
        Err(e) => {
            debug!(error = ?e, "Readability init failed");
            return None;
        }
    };
    let parsed = match reader.parse() {
        Ok(parsed) => parsed,
        Err(e) => {
            debug!(error = ?e, "Readability parse failed");
            return None;
        }
    };
    let text: String = parsed.text_content.into();
    let text = text.trim();
    if text.is_empty() {
        debug!("Readability produced no text");
        return None;
    }
    let title = parsed.title.trim().to_string();
    Some(ArticleText {
        title: (!title.is_empty()).then_some(title),
        text: text.to_string(),
        layer: "readability",
    })
}

/// Collect paragraph text with CSS selectors. `None` when nothing matched.
fn selector_layer(html: &str) -> Option<ArticleText> {
    let document = Html::parse_document(html);
    let article_selector = Selector::parse("article p").ok()?;
    let body_selector = Selector::parse("body p").ok()?;
    let title_selector = Selector::parse("h1, title").ok()?;

    let mut content = String::new();
    let in_article: Vec<_> = document.select(&article_selector).collect();
    let paragraphs = if in_article.is_empty() {
        document.select(&body_selector).collect()
    } else {
        in_article
    };
    for element in paragraphs {
        let text = element.text().collect::<Vec<_>>().join(" ");
        let text = text.trim();
        if !text.is_empty() {
            content.push_str(text);
            content.push('\n');
        }
    }

    let content = content.trim_end().to_string();
    if content.is_empty() {
        return None;
    }

    let title = document
        .select(&title_selector)
        .next()
        .map(|el| el.text().collect::<Vec<_>>().join(" ").trim().to_string())
        .filter(|t| !t.is_empty());

    Some(ArticleText {
        title,
        text: content,
        layer: "selector",
    })
}
