//! Profile route

use crate::auth::CurrentUser;
use crate::error::ApiResult;
use crate::services::AccountService;
use crate::state::AppState;
use axum::{extract::State, Json};
use postline_shared::types::{ApiResponse, UserProfile};

/// The caller's own profile
///
/// GET /profile
pub async fn get_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Json<ApiResponse<UserProfile>>> {
    let profile = AccountService::profile(&state.db, user.id).await?;
    Ok(Json(ApiResponse::ok("Profile fetched successfully", profile)))
}
