//! The request gate
//!
//! Runs ahead of every route: classify the path, resolve the identity for
//! protected classes, decide, then either short-circuit or annotate the
//! request and let it through. The gate never touches persisted state.

use crate::auth::policy::{
    classify, decide, is_api_path, GateDecision, RouteClass, LOGIN_PATH, NOT_FOUND_PATH,
};
use crate::auth::verify::resolve_identity;
use crate::auth::AuthError;
use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::{request::Parts, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use postline_shared::types::{ApiResponse, Identity};
use tracing::{debug, warn};

/// Header carrying the JSON-encoded claim set to downstream handlers
pub const X_USER_HEADER: &str = "x-user";

/// Gate middleware, applied to the whole router
pub async fn auth_gate(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    let class = classify(&path);

    // Public prefixes are admitted without any identity resolution.
    if class == RouteClass::Public {
        return next.run(request).await;
    }

    let identity = resolve_identity(&state, request.headers()).await;

    match decide(class, is_api_path(&path), identity.as_ref()) {
        GateDecision::Admit => match identity {
            Some(identity) => admit(request, identity, next).await,
            // decide() only admits protected classes with an identity; this
            // arm exists so the gate fails closed rather than panicking.
            None => reject_unauthorized(),
        },
        GateDecision::Unauthorized => {
            debug!(%path, "unauthenticated API request rejected");
            reject_unauthorized()
        }
        GateDecision::RedirectToLogin => {
            debug!(%path, "unauthenticated page request redirected to sign-in");
            Redirect::to(LOGIN_PATH).into_response()
        }
        GateDecision::HideBehindNotFound => {
            // Indistinguishable from a route that does not exist.
            debug!(%path, "request hidden: {}", AuthError::InsufficientRole);
            Redirect::to(NOT_FOUND_PATH).into_response()
        }
    }
}

/// Attach the resolved claim set and forward to the router
async fn admit(mut request: Request, identity: Identity, next: Next) -> Response {
    match serde_json::to_string(&identity) {
        Ok(json) => match HeaderValue::from_str(&json) {
            Ok(value) => {
                request.headers_mut().insert(X_USER_HEADER, value);
            }
            // Display names are free-form UTF-8; header values are not.
            // The typed extension below still carries the identity.
            Err(_) => warn!(user_id = %identity.id, "claim set not header-encodable"),
        },
        Err(e) => warn!(user_id = %identity.id, "claim set serialization failed: {}", e),
    }

    request.extensions_mut().insert(identity);
    next.run(request).await
}

fn reject_unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ApiResponse::<()>::error("Unauthorized")),
    )
        .into_response()
}

/// The verified identity of the calling user
///
/// Extractor for handlers behind the gate; reads what the gate attached,
/// no re-verification. Fails closed with a 401 if the gate never ran.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Identity);

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| ApiError::Unauthorized("Unauthorized".to_string()))
    }
}
