//! Cookie-bound session records
//!
//! The browser flow: login stores an opaque random token server-side and
//! hands it back in a cookie; each request resolves the cookie back to an
//! identity with one lookup. Invalidation is deletion (logout) or expiry.

use crate::repositories::SessionRepository;
use anyhow::Result;
use axum::http::{header::COOKIE, HeaderMap};
use chrono::{DateTime, Duration, Utc};
use postline_shared::types::Identity;
use rand::distributions::Alphanumeric;
use rand::Rng;
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

/// Name of the session cookie
pub const SESSION_COOKIE_NAME: &str = "postline_session";

/// Length of the opaque session token
const SESSION_TOKEN_LEN: usize = 48;

/// Session issuance and resolution
///
/// Stateless service over the sessions table; the lifetime policy is the
/// same constant the bearer tokens use.
#[derive(Clone)]
pub struct SessionService {
    expiry_secs: i64,
}

impl SessionService {
    pub fn new(expiry_secs: i64) -> Self {
        Self { expiry_secs }
    }

    /// Create a session record for a subject
    ///
    /// The expiry is stamped from the current clock; re-issuing never
    /// extends an earlier record.
    pub async fn create(
        &self,
        pool: &PgPool,
        user_id: Uuid,
    ) -> Result<(String, DateTime<Utc>)> {
        let token = generate_session_token();
        let expires_at = Utc::now() + Duration::seconds(self.expiry_secs);

        SessionRepository::create(pool, &token, user_id, expires_at).await?;
        Ok((token, expires_at))
    }

    /// Resolve a session token to an identity
    ///
    /// Returns `Ok(None)` when the token matches no live record. Role values
    /// outside the known set are treated the same way: the record cannot be
    /// trusted, so the request stays unauthenticated.
    pub async fn resolve(&self, pool: &PgPool, token: &str) -> Result<Option<Identity>> {
        let Some(session) = SessionRepository::find_valid(pool, token).await? else {
            return Ok(None);
        };

        let role = match session.user_role.parse() {
            Ok(role) => role,
            Err(e) => {
                warn!(user_id = %session.user_id, "session user has unusable role: {}", e);
                return Ok(None);
            }
        };

        Ok(Some(Identity {
            id: session.user_id,
            name: session.user_name,
            email: session.user_email,
            role,
            issued_at: session.expires_at - Duration::seconds(self.expiry_secs),
            expires_at: session.expires_at,
        }))
    }

    /// Delete a session record (logout)
    pub async fn delete(&self, pool: &PgPool, token: &str) -> Result<()> {
        SessionRepository::delete(pool, token).await
    }

    /// `Set-Cookie` value binding the session token to the browser
    pub fn cookie_value(&self, token: &str) -> String {
        format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            SESSION_COOKIE_NAME, token, self.expiry_secs
        )
    }

    /// `Set-Cookie` value that clears the session cookie
    pub fn clear_cookie_value(&self) -> String {
        format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE_NAME)
    }
}

/// Opaque random session token
fn generate_session_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SESSION_TOKEN_LEN)
        .map(char::from)
        .collect()
}

/// Extract a named cookie from the request headers
pub fn get_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    let cookies = headers.get(COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then_some(value)
    })
}
