//! Static bearer-token check for the `/tasks` routes.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use http::header::AUTHORIZATION;
use http::HeaderMap;

use super::handlers::ApiError;
use super::AppState;

/// Rejects requests whose `Authorization` header does not carry the
/// configured bearer token. Passes everything through when no token is
/// configured.
pub async fn require_bearer(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let Some(expected) = state.auth_token.as_deref() else {
        return next.run(request).await;
    };

    match bearer_token(request.headers()) {
        Some(token) if token_matches(token, expected) => next.run(request).await,
        presented => {
            let header = request
                .headers()
                .get(AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .map(redact_authorization);
            tracing::warn!(
                method = %request.method(),
                path = %request.uri().path(),
                authorization = header.as_deref().unwrap_or("<missing>"),
                "rejecting unauthenticated request"
            );
            let details = if presented.is_some() {
                "bearer token does not match"
            } else {
                "missing bearer token"
            };
            ApiError::unauthorized(details).into_response()
        },
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` header. The
/// scheme is matched case-insensitively.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    scheme
        .eq_ignore_ascii_case("bearer")
        .then(|| token.trim())
        .filter(|t| !t.is_empty())
}

/// Compares without short-circuiting on the first differing byte.
fn token_matches(presented: &str, expected: &str) -> bool {
    let (a, b) = (presented.as_bytes(), expected.as_bytes());
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Keeps the auth scheme and replaces the credential with `[REDACTED]`.
///
/// # Examples
///
/// ```
/// use weekboard::server::auth::redact_authorization;
///
/// assert_eq!(redact_authorization("Bearer abc"), "Bearer [REDACTED]");
/// assert_eq!(redact_authorization("abc"), "[REDACTED]");
/// ```
pub fn redact_authorization(value: &str) -> String {
    match value.split_once(' ') {
        Some((scheme, _)) => format!("{scheme} [REDACTED]"),
        None => "[REDACTED]".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use http::HeaderValue;

    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn bearer_token_parsing() {
        assert_eq!(bearer_token(&headers("Bearer abc")), Some("abc"));
        assert_eq!(bearer_token(&headers("bearer abc")), Some("abc"));
        assert_eq!(bearer_token(&headers("Basic abc")), None);
        assert_eq!(bearer_token(&headers("Bearer ")), None);
        assert_eq!(bearer_token(&headers("Bearer")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn token_comparison() {
        assert!(token_matches("secret", "secret"));
        assert!(!token_matches("secret", "secreT"));
        assert!(!token_matches("secret", "secret2"));
        assert!(!token_matches("", "secret"));
    }

    #[test]
    fn redaction_keeps_scheme() {
        assert_eq!(redact_authorization("Bearer s3cret"), "Bearer [REDACTED]");
        assert_eq!(redact_authorization("Basic dXNlcg=="), "Basic [REDACTED]");
        assert_eq!(redact_authorization("s3cret"), "[REDACTED]");
    }
}
