//! axum router and request handlers.

use std::error::Error;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use super::render;
use crate::types::Story;
use crate::{HuginnError, NewsCache};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Top stories are unavailable")]
    Unavailable(#[source] HuginnError),

    #[error("Top stories have not been loaded yet")]
    NotLoaded,

    #[error("Cached top stories are inconsistent")]
    Integrity(#[source] HuginnError),
}

impl From<HuginnError> for ServerError {
    fn from(err: HuginnError) -> Self {
        match err {
            HuginnError::NotLoaded => ServerError::NotLoaded,
            HuginnError::DataIntegrity(_) => ServerError::Integrity(err),
            other => ServerError::Unavailable(other),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        error!("{}: {:?}", self, self.source());

        let status = match self {
            ServerError::Unavailable(_) => StatusCode::BAD_GATEWAY,
            ServerError::NotLoaded => StatusCode::SERVICE_UNAVAILABLE,
            ServerError::Integrity(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let payload = Json(json!({"message": self.to_string()}));

        (status, payload).into_response()
    }
}

/// Build the router: `/` (HTML), `/api/top` (JSON), `/health`.
pub fn router(cache: Arc<NewsCache>) -> Router {
    Router::new()
        .route("/", get(news))
        .route("/api/top", get(top))
        .route("/health", get(health))
        .with_state(cache)
}

/// Refresh if needed, then read. A failed refresh falls back to the
/// previous snapshot when there is one.
async fn current_stories(cache: &NewsCache) -> Result<Vec<Story>, ServerError> {
    match cache.fetch().await {
        Ok(()) => Ok(cache.project().await?),
        Err(fetch_err) => match cache.project().await {
            Ok(stories) => {
                warn!(error = %fetch_err, "serving stale top stories");
                Ok(stories)
            }
            Err(HuginnError::NotLoaded) => Err(ServerError::Unavailable(fetch_err)),
            Err(other) => Err(other.into()),
        },
    }
}

async fn news(State(cache): State<Arc<NewsCache>>) -> Result<Html<String>, ServerError> {
    let stories = current_stories(&cache).await?;
    Ok(Html(render::news_page(&stories)))
}

async fn top(State(cache): State<Arc<NewsCache>>) -> Result<Json<Vec<Story>>, ServerError> {
    Ok(Json(current_stories(&cache).await?))
}

async fn health(State(cache): State<Arc<NewsCache>>) -> impl IntoResponse {
    let status = cache.status().await;
    Json(json!({
        "status": if status.is_loaded() { "healthy" } else { "starting" },
        "cache": status,
        "build": crate::build_info(),
    }))
}
