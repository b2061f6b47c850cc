use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rust_web_summarizer::error::{AppError, Result};
use rust_web_summarizer::pipeline::{Document, Summarizer};

#[derive(Clone, Default)]
pub struct MockSummarizer {
    pub summary: String,
    /// (api key, document text) per call
    pub calls: Arc<Mutex<Vec<(String, String)>>>,
    pub fail_with: Option<String>,
}

impl MockSummarizer {
    pub fn new(summary: &str) -> Self {
        Self {
            summary: summary.to_string(),
            ..Default::default()
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Default::default()
        }
    }
}

#[async_trait]
impl Summarizer for MockSummarizer {
    async fn summarize(&self, api_key: &str, document: &Document) -> Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push((api_key.to_string(), document.page_content.clone()));
        if let Some(ref msg) = self.fail_with {
            return Err(AppError::LlmError(msg.clone()));
        }
        Ok(self.summary.clone())
    }
}
