use serde::Serialize;

/// Where the text for a submission comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    YouTube,
    Web,
}

impl Source {
    /// Routes on the raw URL string; anything that doesn't mention a
    /// YouTube host is treated as a webpage.
    pub fn classify(url: &str) -> Self {
        if url.contains("youtube.com") || url.contains("youtu.be") {
            Source::YouTube
        } else {
            Source::Web
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::YouTube => write!(f, "youtube"),
            Source::Web => write!(f, "web"),
        }
    }
}
