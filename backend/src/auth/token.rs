//! Signed bearer tokens
//!
//! Issues and verifies the self-contained HS256 token API clients present in
//! the `Authorization` header. Keys are pre-computed once at startup; signing
//! and verification are pure functions of the token and the wall clock.

use crate::auth::AuthError;
use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use postline_shared::types::{Identity, Role};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Bearer token claims
///
/// The full identity claim set plus the timestamps; nothing else is trusted
/// from a presented token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Display name
    pub name: String,
    /// Account email
    pub email: String,
    /// Account role
    pub role: Role,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Pre-computed HMAC keys, expensive to derive, cached in AppState
#[derive(Clone)]
pub struct TokenKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

impl TokenKeys {
    /// Create keys from the shared secret. Called once at startup.
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
        }
    }
}

/// Bearer token service
///
/// Cheap to clone (keys are Arc'd). Create once at startup and store in
/// AppState, never per-request.
#[derive(Clone)]
pub struct TokenService {
    keys: TokenKeys,
    expiry_secs: i64,
}

impl TokenService {
    pub fn new(secret: &str, expiry_secs: i64) -> Self {
        Self {
            keys: TokenKeys::new(secret),
            expiry_secs,
        }
    }

    /// Token lifetime in seconds
    #[inline]
    pub fn expiry_secs(&self) -> i64 {
        self.expiry_secs
    }

    /// Sign a token for the given account
    ///
    /// The expiry is always stamped from the current clock. Re-issuing for
    /// the same account yields a fresh `exp`, never an extension of an old
    /// one.
    pub fn issue(
        &self,
        id: Uuid,
        name: &str,
        email: &str,
        role: Role,
    ) -> Result<(String, DateTime<Utc>), AuthError> {
        let now = Utc::now();
        let expires_at = now + Duration::seconds(self.expiry_secs);

        let claims = Claims {
            sub: id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            role,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::default(), &claims, &self.keys.encoding)
            .map_err(|e| AuthError::MalformedToken(e.to_string()))?;

        Ok((token, expires_at))
    }

    /// Re-sign a token for an existing identity (refresh-on-read)
    pub fn reissue(&self, identity: &Identity) -> Result<(String, DateTime<Utc>), AuthError> {
        self.issue(identity.id, &identity.name, &identity.email, identity.role)
    }

    /// Verify a presented token and reconstruct the claim set
    ///
    /// Expiry is compared against the wall clock here with zero leeway:
    /// `exp == now` is already expired. jsonwebtoken's built-in check allows
    /// a 60 second leeway and an exactly-expiring token, so it is disabled
    /// and the comparison done explicitly after the signature verifies.
    pub fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;

        let data = decode::<Claims>(token, &self.keys.decoding, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::BadSignature,
                _ => AuthError::MalformedToken(e.to_string()),
            }
        })?;

        let claims = data.claims;
        if claims.exp <= Utc::now().timestamp() {
            return Err(AuthError::ExpiredToken);
        }

        let id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AuthError::MalformedToken("subject is not a UUID".to_string()))?;

        let issued_at = Utc
            .timestamp_opt(claims.iat, 0)
            .single()
            .ok_or_else(|| AuthError::MalformedToken("iat out of range".to_string()))?;
        let expires_at = Utc
            .timestamp_opt(claims.exp, 0)
            .single()
            .ok_or_else(|| AuthError::MalformedToken("exp out of range".to_string()))?;

        Ok(Identity {
            id,
            name: claims.name,
            email: claims.email,
            role: claims.role,
            issued_at,
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new("test-secret", 604_800)
    }

    fn issue_for(service: &TokenService, role: Role) -> (Uuid, String) {
        let id = Uuid::new_v4();
        let (token, _) = service.issue(id, "Test", "test@example.com", role).unwrap();
        (id, token)
    }

    #[test]
    fn issue_then_verify_round_trips_the_claim_set() {
        let service = service();
        let (id, token) = issue_for(&service, Role::User);

        let identity = service.verify(&token).unwrap();
        assert_eq!(identity.id, id);
        assert_eq!(identity.email, "test@example.com");
        assert_eq!(identity.role, Role::User);
        assert!(identity.expires_at > identity.issued_at);
    }

    #[test]
    fn verification_is_idempotent() {
        let service = service();
        let (_, token) = issue_for(&service, Role::Admin);

        let first = service.verify(&token).unwrap();
        let second = service.verify(&token).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn token_signed_with_different_secret_is_rejected() {
        let theirs = TokenService::new("some-other-environment", 3600);
        let (_, token) = issue_for(&theirs, Role::User);

        let ours = service();
        assert!(matches!(ours.verify(&token), Err(AuthError::BadSignature)));
    }

    #[test]
    fn expired_token_is_rejected() {
        let service = TokenService::new("test-secret", -10);
        let (_, token) = issue_for(&service, Role::User);

        assert!(matches!(service.verify(&token), Err(AuthError::ExpiredToken)));
    }

    #[test]
    fn exp_equal_to_now_counts_as_expired() {
        // Lifetime of zero stamps exp == now at issuance.
        let service = TokenService::new("test-secret", 0);
        let (_, token) = issue_for(&service, Role::User);

        assert!(matches!(service.verify(&token), Err(AuthError::ExpiredToken)));
    }

    #[test]
    fn garbage_is_malformed_not_a_panic() {
        let service = service();
        assert!(matches!(
            service.verify("not.a.token"),
            Err(AuthError::MalformedToken(_))
        ));
        assert!(matches!(
            service.verify(""),
            Err(AuthError::MalformedToken(_))
        ));
    }

    #[test]
    fn reissue_restamps_expiry_from_now() {
        let service = service();
        let (_, token) = issue_for(&service, Role::User);
        let identity = service.verify(&token).unwrap();

        let (fresh, new_expiry) = service.reissue(&identity).unwrap();
        let refreshed = service.verify(&fresh).unwrap();
        assert_eq!(refreshed.id, identity.id);
        // New stamp comes from the current clock, not from the old token.
        assert!(new_expiry >= identity.expires_at);
    }
}
