mod errors;
mod params;

use axum::extract::{Query, State};
use axum::http::{HeaderMap, header};
use axum::routing::get;
use axum::{Json, Router};
use tracing::info;

use errors::ApiError;
use params::{SearchParams, validate_bearer};

use crate::github::GitHubClient;
use crate::github::types::SearchRequest;
use crate::query;
use crate::search::{self, EnrichedResponse};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    github: GitHubClient,
}

pub fn router(github: GitHubClient) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/repos", get(search_repositories))
        .with_state(AppState { github })
}

async fn health() -> &'static str {
    "ok"
}

/// GET /repos?q=...&per_page=...&page=...
///
/// Validates the caller, the query and pagination before any upstream call, then
/// returns the matching repositories with their languages reduced to the one requested.
async fn search_repositories(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<SearchParams>,
) -> Result<Json<EnrichedResponse>, ApiError> {
    validate_bearer(
        headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok()),
    )?;

    let language = query::validate(&params.q)?;
    let (per_page, page) = params.pagination()?;

    info!(query = %params.q, %language, per_page, page, "GET /repos");

    let req = SearchRequest {
        query: params.q.clone(),
        per_page,
        page,
    };
    let response = search::search(&state.github, &req, language).await?;
    Ok(Json(response))
}
