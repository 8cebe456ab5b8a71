//! Per-request identity resolution
//!
//! The ordered two-strategy verifier: an explicit bearer token always wins
//! over an ambient cookie session, so API clients are never silently
//! authenticated as a different browser-tab session. Every failure along the
//! way downgrades to "absent"; the gate decides what absence means for the
//! route, nothing here terminates the request.

use crate::auth::session::{get_cookie, SESSION_COOKIE_NAME};
use crate::auth::AuthError;
use crate::state::AppState;
use axum::http::{header::AUTHORIZATION, HeaderMap};
use postline_shared::types::Identity;
use tracing::{debug, warn};

/// Resolve the identity a request presents, if any
///
/// Strict order, first success wins:
/// 1. `Authorization: Bearer <token>`: signature + expiry check, no lookup.
/// 2. Session cookie: one session-store lookup.
/// 3. Neither: `None`.
pub async fn resolve_identity(state: &AppState, headers: &HeaderMap) -> Option<Identity> {
    if let Some(token) = bearer_token(headers) {
        match state.tokens().verify(token) {
            Ok(identity) => return Some(identity),
            // Malformed, forged or expired: treated as absent, not fatal,
            // so a browser with a stale Authorization header can still fall
            // through to its cookie session.
            Err(e) => debug!("bearer token rejected: {}", e),
        }
    }

    if let Some(token) = get_cookie(headers, SESSION_COOKIE_NAME) {
        match state.sessions().resolve(state.db(), token).await {
            Ok(Some(identity)) => return Some(identity),
            Ok(None) => debug!("cookie session rejected: {}", AuthError::SessionNotFound),
            // Lookup failures (including timeouts) surface as unauthenticated,
            // never as a crash.
            Err(e) => warn!("session lookup failed: {:#}", e),
        }
    }

    None
}

/// The token from an `Authorization: Bearer ...` header, if present
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_token_requires_the_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcg=="));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));
    }

    #[test]
    fn bearer_token_trims_surrounding_whitespace() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer  abc "));
        assert_eq!(bearer_token(&headers), Some("abc"));
    }

    #[test]
    fn absent_header_is_none() {
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
