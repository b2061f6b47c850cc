use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use crate::error::{AppError, Result};

pub const DEFAULT_API_BASE: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_YOUTUBE_BASE: &str = "https://www.youtube.com";
pub const DEFAULT_CAPTION_LANG: &str = "en";

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: SocketAddr,
    pub llm_api_base: String,
    pub youtube_base: String,
    pub caption_lang: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source, falling back to
    /// defaults for anything unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = lookup("PORT").unwrap_or_else(|| "3000".to_string());
        let port = port.parse::<u16>().map_err(|e| AppError::ConfigError(format!("Invalid port: {}", e)))?;
        let ip = IpAddr::from_str(&host).map_err(|e| AppError::ConfigError(format!("Invalid host address: {}", e)))?;

        let base = |key: &str, default: &str| {
            lookup(key)
                .unwrap_or_else(|| default.to_string())
                .trim_end_matches('/')
                .to_string()
        };

        Ok(Config {
            server_addr: SocketAddr::new(ip, port),
            llm_api_base: base("LLM_API_BASE", DEFAULT_API_BASE),
            youtube_base: base("YOUTUBE_BASE_URL", DEFAULT_YOUTUBE_BASE),
            caption_lang: lookup("CAPTION_LANG").unwrap_or_else(|| DEFAULT_CAPTION_LANG.to_string()),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            llm_api_base: DEFAULT_API_BASE.to_string(),
            youtube_base: DEFAULT_YOUTUBE_BASE.to_string(),
            caption_lang: DEFAULT_CAPTION_LANG.to_string(),
        }
    }
}
