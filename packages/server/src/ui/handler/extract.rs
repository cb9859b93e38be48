//! Custom extractors.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::domain::UserId;

use super::error::ApiError;

/// Header carrying the calling user's id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Caller identity from the `X-User-ID` header.
///
/// Authentication happens in front of this server; the header is trusted.
#[derive(Debug, Clone)]
pub struct CallerId(pub UserId);

impl<S> FromRequestParts<S> for CallerId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.trim().to_string())
            .unwrap_or_default();

        UserId::new(raw)
            .map(Self)
            .map_err(|_| ApiError::BadRequest("missing X-User-ID header".to_string()))
    }
}
