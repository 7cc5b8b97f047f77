//! Page fetching and visible-text extraction

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use scraper::{Html, Selector};
use thiserror::Error;

const USER_AGENT: &str = "Mozilla/5.0";

// Constant selector, parse cannot fail
static TEXT_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("p, h1, h2, h3, li").expect("valid selector"));

/// Failures fetching a reference page
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Error fetching URL: request timed out")]
    Timeout,

    #[error("Error fetching URL: {0}")]
    Http(String),

    #[error("Error fetching URL: {status} for url: {url}")]
    Status { status: u16, url: String },
}

impl From<reqwest::Error> for ScrapeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ScrapeError::Timeout
        } else {
            ScrapeError::Http(err.to_string())
        }
    }
}

/// Source of plain page text for a URL
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_text(&self, url: &str) -> Result<String, ScrapeError>;
}

/// Fetches pages over HTTP with a browser-like user agent
pub struct HttpFetcher {
    http: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, ScrapeError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { http })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String, ScrapeError> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let body = response.text().await?;
        Ok(extract_text(&body))
    }
}

/// Visible text of paragraph, heading and list-item elements, one per line.
///
/// Whitespace inside an element collapses to single spaces; elements with no
/// text are skipped.
pub fn extract_text(html: &str) -> String {
    let document = Html::parse_document(html);
    document
        .select(&TEXT_SELECTOR)
        .map(|element| {
            element
                .text()
                .flat_map(str::split_whitespace)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
