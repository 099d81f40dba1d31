//! Readability-style article extraction over a rendered page's HTML

use anyhow::{Context, Result, anyhow};
use std::io::Cursor;

use super::text::{html_to_text, normalize_text};

/// Title and cleaned body text of a readable article
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadableArticle {
    pub title: String,
    pub text: String,
}

/// Run readability on `html` and flatten its article fragment to text
///
/// CPU-bound; callers on the runtime should use [`extract_readable_blocking`].
pub fn extract_readable(html: &str, page_url: &str, max_chars: usize) -> Result<ReadableArticle> {
    let url = url::Url::parse(page_url).with_context(|| format!("Invalid page URL: {page_url}"))?;
    let mut cursor = Cursor::new(html.as_bytes());
    let product = ::readability::extractor::extract(&mut cursor, &url)
        .map_err(|e| anyhow!("Readability extraction failed: {e}"))?;

    Ok(ReadableArticle {
        title: product.title.trim().to_string(),
        text: normalize_text(&html_to_text(&product.content), max_chars),
    })
}

/// [`extract_readable`] on the blocking thread pool
pub async fn extract_readable_blocking(html: String, page_url: String, max_chars: usize) -> Result<ReadableArticle> {
    tokio::task::spawn_blocking(move || extract_readable(&html, &page_url, max_chars))
        .await
        .context("Readability task panicked")?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_url_is_an_error() {
        assert!(extract_readable("<html></html>", "not a url", 100).is_err());
    }

    #[test]
    fn article_text_is_flattened() {
        let para = "Ownership rules are checked at compile time by the borrow checker. ".repeat(8);
        let html = format!(
            "<html><head><title>Borrowing</title></head><body>\
             <nav><a href='/'>Home</a></nav>\
             <article><h1>Borrowing</h1><p>{para}</p><p>{para}</p>\
             <script>track()</script></article></body></html>"
        );
        let article = extract_readable(&html, "https://docs.example.com/borrowing", 10_000).unwrap();
        assert!(article.text.contains("borrow checker"));
        assert!(!article.text.contains("track()"));
    }
}
