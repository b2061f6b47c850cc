use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, Url};
use scraper::Html;
use std::time::Duration;
use tracing::debug;

use crate::error::Result;
use crate::pipeline::TextExtractor;

/// Hard limit for the whole page fetch; there is no retry.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

// Text under these elements never renders
const HIDDEN_ELEMENTS: [&str; 3] = ["script", "style", "template"];

pub struct WebExtractor {
    client: Client,
}

impl WebExtractor {
    pub fn new() -> Result<Self> {
        let client = ClientBuilder::new().timeout(FETCH_TIMEOUT).build()?;
        Ok(Self { client })
    }

    /// GET the page body. The status code is deliberately ignored: error
    /// pages are parsed like any other document.
    pub async fn fetch_html(&self, url: &Url) -> Result<String> {
        let response = self.client.get(url.clone()).send().await?;
        debug!(status = %response.status(), "Fetched {url}");
        let html = response.text().await?;
        Ok(html)
    }
}

#[async_trait]
impl TextExtractor for WebExtractor {
    async fn extract(&self, url: &Url) -> Result<String> {
        let html = self.fetch_html(url).await?;
        Ok(extract_visible_text(&html))
    }
}

/// Collects every visible text node, trimmed, one per line.
pub fn extract_visible_text(html: &str) -> String {
    let document = Html::parse_document(html);

    document
        .root_element()
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let hidden = node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|el| HIDDEN_ELEMENTS.contains(&el.name()))
            });
            if hidden {
                return None;
            }
            let trimmed = text.trim();
            (!trimmed.is_empty()).then_some(trimmed)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
