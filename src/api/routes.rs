use askama::Template;
use axum::{
    routing::{get, post},
    Router,
    extract::{Form, Json, State, rejection::JsonRejection},
    response::{Html, IntoResponse},
};
use tower_http::cors::{CorsLayer, Any};
use tower_http::trace::TraceLayer;
use chrono::Utc;
use tracing::{info, warn};

use crate::error::Result;
use crate::api::models::{SummarizeRequest, SummarizeResponse};
use crate::api::page::IndexTemplate;
use crate::api::response;
use crate::pipeline::Summary;
use crate::AppState;

pub fn create_router(app_state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/summarize", post(api_summarize_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    Router::new()
        .route("/", get(index_handler))
        .route("/summarize", post(form_summarize_handler))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

async fn index_handler() -> Result<Html<String>> {
    Ok(Html(IndexTemplate::default().render()?))
}

async fn form_summarize_handler(
    State(state): State<AppState>,
    Form(req): Form<SummarizeRequest>,
) -> Result<Html<String>> {
    let page = match run_submission(&state, &req).await {
        Ok(summary) => IndexTemplate::success(&req.url, summary.text),
        Err(err) => IndexTemplate::failure(&req.url, &err),
    };
    Ok(Html(page.render()?))
}

async fn api_summarize_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<SummarizeRequest>, JsonRejection>,
) -> impl IntoResponse {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            warn!("Rejected JSON body: {}", rejection.body_text());
            return response::error::<SummarizeResponse>(
                rejection.status(),
                "InvalidRequest",
                rejection.body_text(),
            );
        }
    };

    match run_submission(&state, &req).await {
        Ok(summary) => response::success(SummarizeResponse {
            url: req.url.trim().to_string(),
            source: summary.source,
            summary: summary.text,
            word_count: summary.word_count,
            summarized_at: Utc::now(),
        }),
        Err(err) => response::error(err.status_code(), err.kind(), err.to_string()),
    }
}

/// Runs one submission while holding the state's submission lock, so
/// requests are handled strictly one after another.
async fn run_submission(state: &AppState, req: &SummarizeRequest) -> Result<Summary> {
    let _guard = state.submissions.lock().await;
    let start_time = std::time::Instant::now();

    let result = state.pipeline.run(&req.api_key, &req.url).await;

    match &result {
        Ok(summary) => info!(
            source = %summary.source,
            model = crate::llm::MODEL,
            elapsed = ?start_time.elapsed(),
            "Summarized {}", req.url
        ),
        Err(err) => warn!(kind = err.kind(), elapsed = ?start_time.elapsed(), "Submission failed: {err}"),
    }

    result
}
