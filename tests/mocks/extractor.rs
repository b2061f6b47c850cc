use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::Url;
use rust_web_summarizer::error::{AppError, Result};
use rust_web_summarizer::pipeline::TextExtractor;

#[derive(Clone, Default)]
pub struct MockExtractor {
    pub text: String,
    pub calls: Arc<Mutex<Vec<String>>>,
    pub fail_with: Option<String>,
}

impl MockExtractor {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
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
impl TextExtractor for MockExtractor {
    async fn extract(&self, url: &Url) -> Result<String> {
        self.calls.lock().unwrap().push(url.to_string());
        if let Some(ref msg) = self.fail_with {
            return Err(AppError::FetchError(msg.clone()));
        }
        Ok(self.text.clone())
    }
}
