use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use super::GitHubError;

/// Characters to percent-encode in a query-string value.
/// Everything except RFC 3986 unreserved characters, so `:`, `>`, `..` qualifiers survive intact.
const QUERY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

pub(super) fn encode_query(s: &str) -> String {
    utf8_percent_encode(s, QUERY_ENCODE_SET).to_string()
}

fn is_valid_github_name(s: &str) -> bool {
    !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        && s != ".."
        && s != "."
}

/// Split a repository full name into `(owner, repo)`.
///
/// Only the exact `owner/repo` shape is accepted, so both halves are safe to
/// interpolate into an API path.
pub fn parse_repo(full_name: &str) -> Result<(&str, &str), GitHubError> {
    match full_name.split_once('/') {
        Some((owner, repo)) if is_valid_github_name(owner) && is_valid_github_name(repo) => {
            Ok((owner, repo))
        }
        _ => Err(GitHubError::InvalidRepo(full_name.to_string())),
    }
}
