use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::warn;

use crate::github::GitHubError;
use crate::query::QueryError;
use crate::search::SearchError;

/// Errors surfaced by the HTTP layer, rendered as `{"error": "..."}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Query(#[from] QueryError),

    #[error("{0}")]
    Search(#[from] SearchError),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) | ApiError::Query(_) => StatusCode::BAD_REQUEST,
            ApiError::Search(SearchError::Search(e))
            | ApiError::Search(SearchError::Enrichment { source: e, .. }) => upstream_status(e),
        }
    }
}

/// Client-side upstream statuses pass through; everything else is a bad gateway.
fn upstream_status(e: &GitHubError) -> StatusCode {
    match e {
        GitHubError::NotFound(_) => StatusCode::NOT_FOUND,
        GitHubError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        GitHubError::Forbidden(_) => StatusCode::FORBIDDEN,
        GitHubError::Api { code, .. } if (400..500).contains(code) => {
            StatusCode::from_u16(*code).unwrap_or(StatusCode::BAD_GATEWAY)
        }
        _ => StatusCode::BAD_GATEWAY,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!(%status, error = %self, "request failed");
        }
        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
