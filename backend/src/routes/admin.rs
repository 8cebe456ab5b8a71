//! Admin routes
//!
//! Everything under /admin is gated on role = ADMIN before route matching;
//! handlers here can trust the injected identity is an admin.

use crate::auth::CurrentUser;
use crate::error::ApiResult;
use crate::services::AccountService;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use postline_shared::types::{AdminUserList, ApiResponse};
use serde::Deserialize;

/// Routes under /admin
pub fn admin_routes() -> Router<AppState> {
    Router::new().route("/users", get(list_users))
}

/// Page query for the user listing
#[derive(Debug, Deserialize)]
pub struct PageParams {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    10
}

/// Paginated non-admin users with their posts
///
/// GET /admin/users?page=1&limit=10
async fn list_users(
    State(state): State<AppState>,
    CurrentUser(_admin): CurrentUser,
    Query(params): Query<PageParams>,
) -> ApiResult<Json<ApiResponse<AdminUserList>>> {
    let listing = AccountService::list_users(&state.db, params.page, params.limit).await?;
    Ok(Json(ApiResponse::ok("Users fetched successfully", listing)))
}
