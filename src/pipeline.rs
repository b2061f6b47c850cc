use async_trait::async_trait;
use reqwest::Url;
use tracing::{debug, info};

use crate::error::Result;
use crate::source::Source;
use crate::validate::validate;

/// The single unit of text handed to the summarizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub page_content: String,
}

impl Document {
    pub fn new(page_content: impl Into<String>) -> Self {
        Self {
            page_content: page_content.into(),
        }
    }

    pub fn word_count(&self) -> usize {
        self.page_content.split_whitespace().count()
    }
}

/// Anything that turns a URL into plain text.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, url: &Url) -> Result<String>;
}

#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, api_key: &str, document: &Document) -> Result<String>;
}

/// Outcome of a successful run, with enough context for the JSON API.
#[derive(Debug, Clone)]
pub struct Summary {
    pub source: Source,
    pub text: String,
    pub word_count: usize,
}

pub struct Pipeline {
    captions: Box<dyn TextExtractor>,
    web: Box<dyn TextExtractor>,
    summarizer: Box<dyn Summarizer>,
}

impl Pipeline {
    pub fn new(
        captions: Box<dyn TextExtractor>,
        web: Box<dyn TextExtractor>,
        summarizer: Box<dyn Summarizer>,
    ) -> Self {
        Self {
            captions,
            web,
            summarizer,
        }
    }

    /// validate → classify → extract → summarize
    pub async fn run(&self, api_key: &str, url: &str) -> Result<Summary> {
        let parsed = validate(api_key, url)?;
        let source = Source::classify(url);
        info!(%source, url = %parsed, "Extracting content");

        let text = match source {
            Source::YouTube => self.captions.extract(&parsed).await?,
            Source::Web => self.web.extract(&parsed).await?,
        };
        debug!(chars = text.len(), "Extraction finished");

        let document = Document::new(text);
        let word_count = document.word_count();

        info!(word_count, "Requesting summary");
        let summary = self.summarizer.summarize(api_key, &document).await?;

        Ok(Summary {
            source,
            text: summary,
            word_count,
        })
    }
}
