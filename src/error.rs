use axum::{
    response::{IntoResponse, Response},
    Json,
    http::StatusCode,
};
use serde::Serialize;

#[derive(Serialize)]
pub struct ErrorResponse {
    error: String,
    kind: &'static str,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Please enter both API key and URL.")]
    MissingInput,

    #[error("Invalid URL.")]
    InvalidUrl,

    #[error("Failed to fetch data: {0}")]
    FetchError(String),

    #[error("Failed to retrieve captions: {0}")]
    CaptionError(String),

    #[error("Error parsing content: {0}")]
    ParseError(String),

    #[error("LLM processing error: {0}")]
    LlmError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Failed to render page: {0}")]
    RenderError(String),
}

impl AppError {
    /// Variant name, shown next to the message on the results page.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::MissingInput => "MissingInput",
            AppError::InvalidUrl => "InvalidUrl",
            AppError::FetchError(_) => "FetchError",
            AppError::CaptionError(_) => "CaptionError",
            AppError::ParseError(_) => "ParseError",
            AppError::LlmError(_) => "LlmError",
            AppError::ConfigError(_) => "ConfigError",
            AppError::RenderError(_) => "RenderError",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingInput | AppError::InvalidUrl | AppError::FetchError(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::CaptionError(_) | AppError::ParseError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::LlmError(_) => StatusCode::BAD_GATEWAY,
            AppError::ConfigError(_) | AppError::RenderError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Formats an error followed by each of its sources, separated by `": "`.
///
/// reqwest only prints the outermost layer in `Display`, which hides the
/// actual cause (connection refused, DNS failure, timeout).
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_msg = cause.to_string();
        if !message.contains(&cause_msg) {
            message.push_str(": ");
            message.push_str(&cause_msg);
        }
        source = cause.source();
    }
    message
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse {
            error: self.to_string(),
            kind: self.kind(),
        });

        (status, body).into_response()
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::FetchError(error_chain(&err))
    }
}

impl From<askama::Error> for AppError {
    fn from(err: askama::Error) -> Self {
        AppError::RenderError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
