use std::sync::{Mutex, PoisonError};

use futures::future::join_all;
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::github::types::{Repository, SearchRequest, SearchResult};
use crate::github::{GitHubError, RepositoryProvider};
use crate::search::lang::retain_language;

/// Search results after language enrichment.
///
/// `total_count` and `incomplete_results` are GitHub's, untouched; `count` is the
/// number of repositories that survived the language filter. Item order follows
/// lookup completion, not upstream ranking.
#[derive(Serialize, Debug)]
pub struct EnrichedResponse {
    pub total_count: u64,
    pub count: usize,
    pub per_page: u8,
    pub page: u32,
    pub incomplete_results: bool,
    pub items: Vec<Repository>,
}

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("error searching repositories: {0}")]
    Search(#[source] GitHubError),

    #[error("error fetching repository languages for {repository}: {source}")]
    Enrichment {
        repository: String,
        #[source]
        source: GitHubError,
    },
}

/// Outcome of enriching one repository.
#[derive(Debug)]
pub enum Enrichment {
    /// Uses the requested language; `languages` holds that single entry.
    Included(Repository),
    /// Lookup succeeded but the language is absent. Not an error.
    Excluded,
    Failed(SearchError),
}

async fn enrich(
    provider: &impl RepositoryProvider,
    mut repo: Repository,
    language: &str,
) -> Enrichment {
    match provider.get_languages(&repo.full_name).await {
        Ok(languages) => match retain_language(languages, language) {
            Some(filtered) => {
                repo.languages = filtered;
                Enrichment::Included(repo)
            }
            None => {
                debug!(repository = %repo.full_name, %language, "language absent, dropping");
                Enrichment::Excluded
            }
        },
        Err(source) => {
            warn!(repository = %repo.full_name, error = %source, "language lookup failed");
            Enrichment::Failed(SearchError::Enrichment {
                repository: repo.full_name,
                source,
            })
        }
    }
}

/// Search GitHub, then fetch every result's languages concurrently and keep the
/// repositories using `language`.
///
/// All lookups run to completion. If any of them failed the whole response is
/// discarded and the first recorded failure is returned: partially enriched
/// results are never served.
pub async fn search(
    provider: &impl RepositoryProvider,
    req: &SearchRequest,
    language: &str,
) -> Result<EnrichedResponse, SearchError> {
    let SearchResult {
        total_count,
        incomplete_results,
        items,
    } = provider
        .search_repositories(req)
        .await
        .inspect_err(|e| warn!(query = %req.query, error = %e, "repository search failed"))
        .map_err(SearchError::Search)?;

    let fetched = items.len();
    debug!(fetched, %language, "enriching search results");

    let accepted = Mutex::new(Vec::with_capacity(fetched));
    let (failures_tx, mut failures_rx) = mpsc::channel(fetched.max(1));

    let units = items.into_iter().map(|repo| {
        let accepted = &accepted;
        let failures_tx = failures_tx.clone();
        async move {
            match enrich(provider, repo, language).await {
                Enrichment::Included(repo) => accepted
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(repo),
                Enrichment::Excluded => {}
                Enrichment::Failed(e) => {
                    if let Err(e) = failures_tx.try_send(e) {
                        warn!(error = %e, "failure channel rejected enrichment error");
                    }
                }
            }
        }
    });
    join_all(units).await;
    drop(failures_tx);

    if let Ok(first) = failures_rx.try_recv() {
        let mut failed = 1;
        while failures_rx.try_recv().is_ok() {
            failed += 1;
        }
        warn!(fetched, failed, "discarding response after enrichment failures");
        return Err(first);
    }

    let items = accepted.into_inner().unwrap_or_else(PoisonError::into_inner);
    info!(total_count, fetched, kept = items.len(), "search enriched");

    Ok(EnrichedResponse {
        total_count,
        count: items.len(),
        per_page: req.per_page,
        page: req.page,
        incomplete_results,
        items,
    })
}
