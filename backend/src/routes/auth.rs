//! Authentication routes
//!
//! Registration, login, session check and logout. Login issues both
//! representations of the verified identity: a session record bound to a
//! cookie for browsers, and a signed bearer token for API clients.
//!
//! Everything under `/api/auth` plus `/api/register` is a public prefix: the
//! gate never runs here, so the session-check endpoint resolves the identity
//! itself.

use crate::auth::session::get_cookie;
use crate::auth::verify::resolve_identity;
use crate::auth::SESSION_COOKIE_NAME;
use crate::error::{ApiError, ApiResult};
use crate::services::AccountService;
use crate::state::AppState;
use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{AppendHeaders, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use postline_shared::types::{
    ApiResponse, LoginRequest, LoginResponse, RegisterRequest, SessionResponse,
};
use tracing::info;
use validator::Validate;

/// Routes under /api/auth
///
/// Login lives here rather than at `/api/login`: the route classification
/// only exempts the `/api/auth` prefix, and a login endpoint must be
/// reachable unauthenticated.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/session", get(session))
        .route("/logout", post(logout))
}

/// Register a new user
///
/// POST /api/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<()>>)> {
    AccountService::register(&state.db, &req).await?;

    info!(email = %req.email, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::message("User registered successfully")),
    ))
}

/// Login with email and password
///
/// POST /api/auth/login
///
/// Verifies the credential, then issues a fresh bearer token and a session
/// record; the session token travels back in a cookie, the bearer token in
/// the body.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Response> {
    req.validate()
        .map_err(|_| ApiError::Validation("Invalid email or password format".to_string()))?;

    let account = AccountService::verify_credentials(&state.db, &req.email, &req.password).await?;

    let (token, _expires_at) = state
        .tokens()
        .issue(account.id, &account.name, &account.email, account.role)?;

    let (session_token, _) = state
        .sessions()
        .create(&state.db, account.id)
        .await
        .map_err(ApiError::Internal)?;

    info!(user_id = %account.id, "login successful");

    let cookie = state.sessions().cookie_value(&session_token);
    Ok((
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(LoginResponse {
            message: "Login successful".to_string(),
            token,
        }),
    )
        .into_response())
}

/// Current session check
///
/// GET /api/auth/session
///
/// Resolves the caller's identity (bearer first, then cookie) and re-signs a
/// fresh bearer token on every read, so a live client's expiry keeps moving
/// forward. An unauthenticated caller gets an empty session, not an error.
async fn session(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Json<SessionResponse>> {
    let Some(identity) = resolve_identity(&state, &headers).await else {
        return Ok(Json(SessionResponse {
            user: None,
            token: None,
        }));
    };

    let (token, _expires_at) = state.tokens().reissue(&identity)?;

    Ok(Json(SessionResponse {
        user: Some(identity),
        token: Some(token),
    }))
}

/// Logout
///
/// POST /api/auth/logout
///
/// Deletes the session record and clears the cookie. Bearer tokens cannot be
/// revoked; they die by expiry.
async fn logout(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Response> {
    if let Some(token) = get_cookie(&headers, SESSION_COOKIE_NAME) {
        state
            .sessions()
            .delete(&state.db, token)
            .await
            .map_err(ApiError::Internal)?;
    }

    let clear = state.sessions().clear_cookie_value();
    Ok((
        AppendHeaders([(SET_COOKIE, clear)]),
        Json(ApiResponse::<()>::message("Logged out")),
    )
        .into_response())
}
