//! Request guard that resolves the caller from a bearer session token.
//!
//! [`resolve_caller`] runs on every route: it looks the token up once and
//! stores the result in request extensions, where the [`Caller`] extractor
//! picks it up. A header that is present but does not carry a live bearer
//! session is rejected with `401` before any handler runs.

use crate::{error::HttpError, AppState};
use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use snippetbox_core::{AppError, UserId};
use std::convert::Infallible;

/// The caller of a request. Requests without an `Authorization` header are
/// anonymous.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Caller {
    pub user_id: Option<UserId>,
    pub token: Option<String>,
}

fn bearer_token(headers: &HeaderMap) -> Result<Option<&str>, AppError> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };
    value
        .to_str()
        .ok()
        .and_then(|raw| raw.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(Some)
        .ok_or(AppError::Unauthorized)
}

/// Middleware that resolves the bearer session into a [`Caller`].
///
/// # Errors
/// Returns `401` for malformed or unknown tokens.
pub async fn resolve_caller(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, HttpError> {
    let caller = match bearer_token(request.headers())? {
        None => Caller::default(),
        Some(token) => {
            let user_id = state
                .db
                .users
                .resolve_session(token)?
                .ok_or(AppError::Unauthorized)?;
            Caller {
                user_id: Some(user_id),
                token: Some(token.to_string()),
            }
        }
    };
    request.extensions_mut().insert(caller);
    Ok(next.run(request).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let caller = parts.extensions.get::<Caller>().cloned();
        Ok(caller.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(auth: Option<&'static str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(value) = auth {
            headers.insert(header::AUTHORIZATION, HeaderValue::from_static(value));
        }
        headers
    }

    #[test]
    fn bearer_token_parses_header_shapes() {
        assert_eq!(bearer_token(&headers_with(None)).expect("anonymous"), None);
        assert_eq!(
            bearer_token(&headers_with(Some("Bearer abc123"))).expect("token"),
            Some("abc123")
        );
        for bad in ["Basic abc", "Bearer ", "abc123"] {
            assert!(matches!(
                bearer_token(&headers_with(Some(bad))),
                Err(AppError::Unauthorized)
            ));
        }
    }
}
