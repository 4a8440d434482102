use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Bytes of code per language, from `GET /repos/{owner}/{repo}/languages`.
pub type Languages = HashMap<String, u64>;

/// Parameters forwarded to `GET /search/repositories`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub per_page: u8,
    pub page: u32,
}

#[cfg(test)]
impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            per_page: 100,
            page: 1,
        }
    }
}

/// Response from `GET /search/repositories`. Only the fields we forward are decoded.
#[derive(Deserialize, Debug)]
pub struct SearchResult {
    pub total_count: u64,
    #[serde(default)]
    pub incomplete_results: bool,
    #[serde(default)]
    pub items: Vec<Repository>,
}

/// A single repository, as returned by the search endpoint and as served back to callers.
///
/// `languages` is absent upstream; it is filled in during enrichment.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Repository {
    pub full_name: String,
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub languages: Languages,
    pub owner: Owner,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Owner {
    pub login: String,
    pub id: u64,
    #[serde(default)]
    pub node_id: String,
    #[serde(default)]
    pub avatar_url: String,
}
