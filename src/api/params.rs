use serde::Deserialize;

use super::errors::ApiError;

const DEFAULT_PER_PAGE: u8 = 100;
const MAX_PER_PAGE: u8 = 100;
const DEFAULT_PAGE: u32 = 1;

/// Query string of `GET /repos`. Pagination stays textual so bad values get our own message.
#[derive(Deserialize, Debug, Default)]
pub struct SearchParams {
    /// GitHub search query, e.g. `tetris stars:>100 language:go`
    #[serde(default)]
    pub q: String,
    /// Results per page, 0-100 (default: 100)
    pub per_page: Option<String>,
    /// 1-based page number (default: 1)
    pub page: Option<String>,
}

impl SearchParams {
    pub fn pagination(&self) -> Result<(u8, u32), ApiError> {
        let per_page = match self.per_page.as_deref() {
            None | Some("") => DEFAULT_PER_PAGE,
            Some(v) => v
                .parse::<u8>()
                .ok()
                .filter(|n| *n <= MAX_PER_PAGE)
                .ok_or_else(|| {
                    ApiError::BadRequest(format!(
                        "per_page must be a number between 0 and {MAX_PER_PAGE}"
                    ))
                })?,
        };

        let page = match self.page.as_deref() {
            None | Some("") => DEFAULT_PAGE,
            Some(v) => v
                .parse::<u32>()
                .ok()
                .filter(|n| *n >= 1)
                .ok_or_else(|| ApiError::BadRequest("page must be a positive number".into()))?,
        };

        Ok((per_page, page))
    }
}

/// Require an `Authorization: Bearer <token>` header. Only the shape is checked.
pub fn validate_bearer(header: Option<&str>) -> Result<(), ApiError> {
    let header = header
        .filter(|h| !h.is_empty())
        .ok_or_else(|| ApiError::Unauthorized("missing Authorization header".into()))?;

    match header.split(' ').collect::<Vec<_>>().as_slice() {
        ["Bearer", token] if !token.is_empty() => Ok(()),
        _ => Err(ApiError::Unauthorized(
            "invalid Authorization header format, must be 'Bearer token'".into(),
        )),
    }
}
