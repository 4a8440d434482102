mod helpers;
pub mod types;

pub use helpers::parse_repo;
use helpers::encode_query;

use reqwest::Client;
use std::env;
use tracing::{debug, warn};

use types::*;

pub const API_BASE: &str = "https://api.github.com";

/// Errors returned by GitHub API operations.
#[derive(Debug, thiserror::Error)]
pub enum GitHubError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("GitHub API rate limit exceeded. Set GITHUB_TOKEN for higher limits.")]
    RateLimited,

    #[error("Access denied: {0}")]
    Forbidden(String),

    #[error("GitHub API error ({code}): {message}")]
    Api { code: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid repository format: expected 'owner/repo', got '{0}'")]
    InvalidRepo(String),

    #[error("Response decode error: {0}")]
    Decode(String),
}

/// Upstream operations the search orchestrator depends on.
/// Implemented by `GitHubClient` for production; mock implementations used in tests.
pub trait RepositoryProvider {
    async fn search_repositories(&self, req: &SearchRequest) -> Result<SearchResult, GitHubError>;

    async fn get_languages(&self, full_name: &str) -> Result<Languages, GitHubError>;
}

/// HTTP client for the GitHub REST API v3.
///
/// Repository names are validated by `parse_repo` before URL interpolation;
/// the search query is percent-encoded.
#[derive(Clone)]
pub struct GitHubClient {
    http: Client,
    token: Option<String>,
    base_url: String,
}

impl GitHubClient {
    pub fn new(http: Client, base_url: &str, token: Option<String>) -> Self {
        if token.is_some() {
            debug!("GitHub token configured");
        } else {
            warn!("No GitHub token found. Rate limit: 60 req/hour. Set GITHUB_TOKEN or GH_TOKEN.");
        }
        Self {
            http,
            token,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_base_url(http: Client, base_url: &str) -> Self {
        Self {
            http,
            token: None,
            base_url: base_url.to_string(),
        }
    }

    fn request(&self, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{path}", self.base_url);
        let mut req = self
            .http
            .get(&url)
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", crate::USER_AGENT)
            .header("X-GitHub-Api-Version", "2022-11-28");
        if let Some(ref token) = self.token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }
        req
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, GitHubError> {
        let response = self.request(path).send().await?;
        let status = response.status();
        debug!(%path, status = status.as_u16(), "github response");
        match status.as_u16() {
            200..=299 => {
                let body = response.text().await?;
                serde_json::from_str(&body).map_err(|e| GitHubError::Decode(e.to_string()))
            }
            404 => Err(GitHubError::NotFound(path.to_string())),
            429 => Err(GitHubError::RateLimited),
            403 => {
                let remaining = response
                    .headers()
                    .get("x-ratelimit-remaining")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok());
                if remaining == Some(0) {
                    Err(GitHubError::RateLimited)
                } else {
                    let message = extract_error_message(&response.text().await.unwrap_or_default());
                    Err(GitHubError::Forbidden(message))
                }
            }
            _ => {
                let message = extract_error_message(
                    &response
                        .text()
                        .await
                        .unwrap_or_else(|_| format!("HTTP {status}")),
                );
                Err(GitHubError::Api {
                    code: status.as_u16(),
                    message,
                })
            }
        }
    }
}

impl RepositoryProvider for GitHubClient {
    async fn search_repositories(&self, req: &SearchRequest) -> Result<SearchResult, GitHubError> {
        let path = format!(
            "/search/repositories?q={}&per_page={}&page={}",
            encode_query(&req.query),
            req.per_page,
            req.page
        );
        self.get_json(&path).await.map_err(|e| match e {
            GitHubError::Api { code: 422, message } => GitHubError::Api {
                code: 422,
                message: format!(
                    "{message}. This is usually caused by a bad equality qualifier (language or license)"
                ),
            },
            e => e,
        })
    }

    async fn get_languages(&self, full_name: &str) -> Result<Languages, GitHubError> {
        let (owner, repo) = parse_repo(full_name)?;
        self.get_json(&format!("/repos/{owner}/{repo}/languages"))
            .await
    }
}

fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["message"].as_str().map(String::from))
        .unwrap_or_else(|| body.chars().take(200).collect())
}

/// Service credentials: `GITHUB_TOKEN` env → `GH_TOKEN` env → unauthenticated.
pub fn resolve_token() -> Option<String> {
    ["GITHUB_TOKEN", "GH_TOKEN"]
        .iter()
        .filter_map(|var| env::var(var).ok())
        .map(|t| t.trim().to_string())
        .find(|t| !t.is_empty())
}

#[cfg(test)]
mod http_tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> GitHubClient {
        GitHubClient::with_base_url(Client::new(), &server.uri())
    }

    #[tokio::test]
    async fn search_repositories_forwards_query_and_pagination() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/repositories"))
            .and(query_param("q", "tetris language:go"))
            .and(query_param("per_page", "10"))
            .and(query_param("page", "2"))
            .and(header("X-GitHub-Api-Version", "2022-11-28"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "total_count": 42,
                "incomplete_results": false,
                "items": [{
                    "full_name": "scalingo/scalingo-test",
                    "name": "scalingo-test",
                    "description": null,
                    "owner": {"login": "scalingo", "id": 1, "node_id": "MDQ", "avatar_url": ""}
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let req = SearchRequest {
            query: "tetris language:go".into(),
            per_page: 10,
            page: 2,
        };
        let result = client(&server).search_repositories(&req).await.unwrap();
        assert_eq!(result.total_count, 42);
        assert_eq!(result.items.len(), 1);
        assert_eq!(result.items[0].full_name, "scalingo/scalingo-test");
        assert!(result.items[0].languages.is_empty());
    }

    #[tokio::test]
    async fn search_repositories_422_hints_equality_qualifier() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/repositories"))
            .respond_with(
                ResponseTemplate::new(422)
                    .set_body_json(serde_json::json!({"message": "Validation Failed"})),
            )
            .mount(&server)
            .await;

        let err = client(&server)
            .search_repositories(&SearchRequest::new("language:klingon"))
            .await
            .unwrap_err();
        assert!(
            matches!(err, GitHubError::Api { code: 422, ref message } if message.starts_with("Validation Failed") && message.contains("equality qualifier")),
            "got: {err}"
        );
    }

    #[tokio::test]
    async fn search_repositories_undecodable_body_returns_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/repositories"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = client(&server)
            .search_repositories(&SearchRequest::new("language:go"))
            .await
            .unwrap_err();
        assert!(matches!(err, GitHubError::Decode(_)), "got: {err}");
    }

    #[tokio::test]
    async fn get_languages_decodes_byte_counts() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/scalingo/scalingo-test/languages"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"Go": 10, "Shell": 3})),
            )
            .mount(&server)
            .await;

        let languages = client(&server)
            .get_languages("scalingo/scalingo-test")
            .await
            .unwrap();
        assert_eq!(languages.get("Go"), Some(&10));
        assert_eq!(languages.get("Shell"), Some(&3));
    }

    #[tokio::test]
    async fn get_languages_rejects_invalid_full_name_without_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = client(&server).get_languages("../etc").await.unwrap_err();
        assert!(matches!(err, GitHubError::InvalidRepo(_)));
    }

    #[tokio::test]
    async fn get_json_404_returns_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/owner/repo/languages"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let result = client(&server).get_languages("owner/repo").await;
        assert!(matches!(result, Err(GitHubError::NotFound(_))));
    }

    #[tokio::test]
    async fn get_json_429_returns_rate_limited() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/owner/repo/languages"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let result = client(&server).get_languages("owner/repo").await;
        assert!(matches!(result, Err(GitHubError::RateLimited)));
    }

    #[tokio::test]
    async fn get_json_403_with_zero_remaining_returns_rate_limited() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/owner/repo/languages"))
            .respond_with(
                ResponseTemplate::new(403)
                    .append_header("x-ratelimit-remaining", "0")
                    .set_body_json(serde_json::json!({"message": "rate limit exceeded"})),
            )
            .mount(&server)
            .await;

        let result = client(&server).get_languages("owner/repo").await;
        assert!(matches!(result, Err(GitHubError::RateLimited)));
    }

    #[tokio::test]
    async fn get_json_403_with_remaining_returns_forbidden() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/owner/repo/languages"))
            .respond_with(
                ResponseTemplate::new(403)
                    .append_header("x-ratelimit-remaining", "50")
                    .set_body_json(serde_json::json!({"message": "access denied"})),
            )
            .mount(&server)
            .await;

        let result = client(&server).get_languages("owner/repo").await;
        assert!(matches!(result, Err(GitHubError::Forbidden(ref msg)) if msg == "access denied"));
    }

    #[tokio::test]
    async fn get_json_500_returns_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/test"))
            .respond_with(
                ResponseTemplate::new(500)
                    .set_body_json(serde_json::json!({"message": "internal server error"})),
            )
            .mount(&server)
            .await;

        let result: Result<serde_json::Value, _> = client(&server).get_json("/test").await;
        assert!(matches!(result, Err(GitHubError::Api { code: 500, .. })));
    }

    #[test]
    fn extract_error_message_from_json() {
        let body = r#"{"message": "Not Found", "documentation_url": "..."}"#;
        assert_eq!(extract_error_message(body), "Not Found");
    }

    #[test]
    fn extract_error_message_fallback_to_raw() {
        assert_eq!(extract_error_message("plain text"), "plain text");
    }
}
