//! Route definitions for the Postline API
//!
//! This module organizes all routes and applies middleware. The auth gate is
//! the innermost layer so it sees every request after tracing, timeouts and
//! CORS have been applied.

use crate::auth::middleware::auth_gate;
use crate::state::AppState;
use axum::{
    http::{header, Method, StatusCode},
    middleware,
    response::Html,
    routing::get,
    Router,
};
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

mod admin;
mod auth;
mod chat;
mod health;
mod posts;
mod profile;

#[cfg(test)]
mod gate_tests;

/// Create the main application router with all middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/health/live", get(health::liveness_check))
        .route("/not-found", get(not_found_page))
        .nest("/api", api_routes())
        .nest("/admin", admin::admin_routes())
        .route("/profile", get(profile::get_profile))
        // Apply middleware layers (the last layer added runs first)
        .layer(middleware::from_fn_with_state(state.clone(), auth_gate))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// API routes
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/register", axum::routing::post(auth::register))
        .nest("/auth", auth::auth_routes())
        .route("/get-all-post", get(posts::feed))
        .nest("/posts", posts::post_routes())
        .route("/gemini", axum::routing::post(chat::generate))
}

/// Redirect target for hidden and unknown pages
async fn not_found_page() -> (StatusCode, Html<&'static str>) {
    (
        StatusCode::NOT_FOUND,
        Html("<h1>404</h1><p>This page could not be found.</p>"),
    )
}
