//! Search orchestration: upstream repository search and concurrent language enrichment.

pub(crate) mod engine;
mod lang;

pub use engine::{EnrichedResponse, SearchError, search};
