use askama::Template;

use crate::error::AppError;

#[derive(Template, Default)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub url: String,
    pub summary: Option<String>,
    pub error: Option<ErrorView>,
}

pub struct ErrorView {
    pub kind: String,
    pub message: String,
}

impl From<&AppError> for ErrorView {
    fn from(err: &AppError) -> Self {
        Self {
            kind: err.kind().to_string(),
            message: err.to_string(),
        }
    }
}

impl IndexTemplate {
    pub fn success(url: &str, summary: String) -> Self {
        Self {
            url: url.to_string(),
            summary: Some(summary),
            error: None,
        }
    }

    pub fn failure(url: &str, err: &AppError) -> Self {
        Self {
            url: url.to_string(),
            summary: None,
            error: Some(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_form() {
        let html = IndexTemplate::default().render().unwrap();
        assert!(html.contains(r#"type="password""#));
        assert!(html.contains("Summarize</button>"));
        assert!(!html.contains(r#"id="summary""#));
        assert!(!html.contains(r#"id="error""#));
    }

    #[test]
    fn test_summary_is_escaped() {
        let html = IndexTemplate::success("example", "- <b>point".into())
            .render()
            .unwrap();
        assert!(html.contains("- &lt;b&gt;point"));
        assert!(html.contains(r#"value="example""#));
    }

    #[test]
    fn test_error_shows_kind_and_message() {
        let html = IndexTemplate::failure("bad", &AppError::InvalidUrl).render().unwrap();
        assert!(html.contains("<strong>InvalidUrl</strong>: Invalid URL."));
    }
}
