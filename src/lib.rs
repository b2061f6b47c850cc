pub mod api;
pub mod captions;
pub mod config;
pub mod error;
pub mod llm;
pub mod pipeline;
pub mod scraper;
pub mod source;
pub mod validate;

use std::sync::Arc;
use tokio::sync::Mutex;

use config::Config;
use pipeline::Pipeline;

/// Application state that will be shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub pipeline: Arc<Pipeline>,
    /// Held for the duration of a submission.
    pub submissions: Arc<Mutex<()>>,
}

impl AppState {
    /// Wires the YouTube, web and Groq collaborators from `config`.
    pub fn new(config: Config) -> error::Result<Self> {
        let pipeline = Pipeline::new(
            Box::new(captions::CaptionExtractor::new(
                config.youtube_base.clone(),
                config.caption_lang.clone(),
            )),
            Box::new(crate::scraper::WebExtractor::new()?),
            Box::new(llm::GroqSummarizer::new(config.llm_api_base.clone())),
        );
        Ok(Self::with_pipeline(config, pipeline))
    }

    pub fn with_pipeline(config: Config, pipeline: Pipeline) -> Self {
        Self {
            config: Arc::new(config),
            pipeline: Arc::new(pipeline),
            submissions: Arc::new(Mutex::new(())),
        }
    }
}
