//! AI chat proxy route

use crate::auth::CurrentUser;
use crate::error::ApiResult;
use crate::state::AppState;
use axum::{extract::State, Json};
use postline_shared::types::{ChatRequest, ChatResponse};

/// Proxy a prompt to the configured generative-AI API
///
/// POST /api/gemini
pub async fn generate(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Json(req): Json<ChatRequest>,
) -> ApiResult<Json<ChatResponse>> {
    let reply = state.chat().generate(&req.prompt).await?;
    Ok(Json(ChatResponse { reply }))
}
