use std::net::SocketAddr;

use axum::Router;
use axum::extract::{Path, State};
use axum::http::{Method, StatusCode, header};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::Error;
use crate::github::GithubClient;
use crate::stories::{PagedStory, StoryContent, StoryListEntry};
use crate::topics::Topic;
use crate::{search, stories, topics};

#[derive(Clone)]
pub struct AppState {
    pub github: GithubClient,
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .route("/", get(all_stories))
        .route("/paged", get(all_paged_stories))
        .route("/topic", get(list_topics))
        .route("/topic/:slug", get(topic_stories))
        .route("/topic/:slug/:story_id", get(story_content))
        .route("/search/:keyword", get(search_stories))
        .route("/healthz", get(|| async { "ok\n" }))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

pub async fn run(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|err| anyhow::anyhow!("bind {addr}: {err}"))?;
    tracing::info!(%addr, "listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn all_stories(
    State(state): State<AppState>,
) -> Result<Json<Vec<StoryListEntry>>, ApiError> {
    Ok(Json(stories::list_all_stories(&state.github).await?))
}

async fn all_paged_stories(
    State(state): State<AppState>,
) -> Result<Json<Vec<PagedStory>>, ApiError> {
    Ok(Json(stories::list_all_paged(&state.github).await?))
}

async fn list_topics() -> Json<&'static [Topic]> {
    Json(topics::all())
}

async fn topic_stories(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Vec<StoryListEntry>>, ApiError> {
    Ok(Json(stories::list_topic_stories(&state.github, &slug).await?))
}

async fn story_content(
    State(state): State<AppState>,
    Path((slug, story_id)): Path<(String, String)>,
) -> Result<Json<StoryContent>, ApiError> {
    Ok(Json(
        stories::fetch_story(&state.github, &slug, &story_id).await?,
    ))
}

async fn search_stories(
    State(state): State<AppState>,
    Path(keyword): Path<String>,
) -> Result<Json<Vec<search::SearchResult>>, ApiError> {
    Ok(Json(search::search_stories(&state.github, &keyword).await?))
}

async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not Found")
}

/// Maps service failures onto plain-text HTTP responses: not-found variants
/// become 404, everything else 500 with the error text in the body.
struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_not_found() {
            StatusCode::NOT_FOUND
        } else {
            tracing::error!(error = %self.0, "request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        };
        (status, self.0.to_string()).into_response()
    }
}
