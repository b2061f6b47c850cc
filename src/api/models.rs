use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

use crate::source::Source;

/// One submission, from either the HTML form or the JSON API.
#[derive(Deserialize)]
pub struct SummarizeRequest {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Serialize)]
pub struct SummarizeResponse {
    pub url: String,
    pub source: Source,
    pub summary: String,
    pub word_count: usize,
    pub summarized_at: DateTime<Utc>,
}
