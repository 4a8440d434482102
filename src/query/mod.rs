//! Search query validation against GitHub's qualifier grammar.

mod qualifier;

use qualifier::QualifierKind;

/// GitHub rejects search queries longer than 256 characters.
/// <https://docs.github.com/rest/search/search#limitations-on-query-length>
pub const MAX_QUERY_LEN: usize = 256;

const LANGUAGE: &str = "language";

/// Reasons a search query is refused before any upstream call.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("search query cannot be empty")]
    Empty,

    #[error("search query exceeds 256 characters limit")]
    TooLong,

    #[error("invalid filter format in '{0}': use '+' to separate filters, not ':'")]
    MalformedToken(String),

    #[error("unknown qualifier: {0}")]
    UnknownQualifier(String),

    #[error("no language filter set, please provide one")]
    MissingLanguageFilter,

    #[error("{0} cannot be empty")]
    EmptyValue(String),

    #[error("{0} must have a number after the comparison operator")]
    MissingNumber(String),

    #[error("{qualifier} must be a number with valid optional comparison operator, got '{value}'")]
    InvalidNumber { qualifier: String, value: String },

    #[error("{qualifier} must be a valid range with two numbers separated by '..', got '{value}'")]
    InvalidRange { qualifier: String, value: String },

    #[error("{qualifier} range start must be less than end, got '{value}'")]
    RangeOrder { qualifier: String, value: String },

    #[error("{qualifier} must be a valid date in YYYY-MM-DD format, got '{value}'")]
    InvalidDate { qualifier: String, value: String },

    #[error("{0} cannot be a number, must be a string")]
    NumericEquality(String),

    #[error("{0} cannot be only whitespace")]
    BlankValue(String),
}

/// Validate a search query and return the value of its mandatory `language:` qualifier.
///
/// Bare keywords pass through untouched. Each `qualifier:value` token is checked
/// against its [`QualifierKind`]; the first failure is returned as-is. The language
/// keeps the caller's casing. If several `language:` tokens are present the last
/// one wins.
pub fn validate(query: &str) -> Result<&str, QueryError> {
    if query.is_empty() {
        return Err(QueryError::Empty);
    }
    if query.chars().count() > MAX_QUERY_LEN {
        return Err(QueryError::TooLong);
    }

    let mut language = None;

    for token in query.split_whitespace() {
        if token.matches(':').count() > 1 {
            return Err(QueryError::MalformedToken(token.to_string()));
        }

        let Some((qualifier, value)) = token.split_once(':') else {
            continue;
        };

        let kind = QualifierKind::of(qualifier)
            .ok_or_else(|| QueryError::UnknownQualifier(qualifier.to_string()))?;
        kind.validate(qualifier, value)?;

        if qualifier == LANGUAGE {
            language = Some(value);
        }
    }

    language.ok_or(QueryError::MissingLanguageFilter)
}
