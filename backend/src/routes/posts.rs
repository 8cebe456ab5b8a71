//! Post routes: feed, own posts, likes and comments
//!
//! The feed is public (`/api/get-all-post`, `/api/posts/all`); everything
//! else here sits behind the gate and reads the injected identity.

use crate::auth::CurrentUser;
use crate::error::ApiResult;
use crate::services::PostService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use postline_shared::types::{
    ApiResponse, CommentList, CommentRequest, CommentView, CreatePostRequest, LikeRequest,
    LikeResult, PostList, PostView,
};
use uuid::Uuid;

/// Routes under /api/posts
pub fn post_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(own_posts).post(create_post))
        .route("/all", get(feed))
        .route("/like", post(toggle_like))
        .route("/:post_id/comment", get(list_comments).post(add_comment))
}

/// Public feed
///
/// GET /api/get-all-post (also served as GET /api/posts/all)
pub async fn feed(State(state): State<AppState>) -> ApiResult<Json<ApiResponse<PostList>>> {
    let posts = PostService::feed(&state.db).await?;
    Ok(Json(ApiResponse::ok(
        "Posts fetched successfully",
        PostList { posts },
    )))
}

/// The caller's own posts
///
/// GET /api/posts
async fn own_posts(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Json<ApiResponse<PostList>>> {
    let posts = PostService::own_posts(&state.db, user.id).await?;
    Ok(Json(ApiResponse::ok(
        "Posts fetched successfully",
        PostList { posts },
    )))
}

/// Create a post
///
/// POST /api/posts
async fn create_post(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<CreatePostRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<PostView>>)> {
    let post = PostService::create(&state.db, user.id, &user.name, &req).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Post created successfully", post)),
    ))
}

/// Toggle a like
///
/// POST /api/posts/like; 201 when the post is now liked, 200 on unlike.
async fn toggle_like(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<LikeRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<LikeResult>>)> {
    let liked = PostService::toggle_like(&state.db, user.id, req.post_id).await?;

    let (status, message) = if liked {
        (StatusCode::CREATED, "Post liked successfully")
    } else {
        (StatusCode::OK, "Post unliked successfully")
    };

    Ok((status, Json(ApiResponse::ok(message, LikeResult { liked }))))
}

/// Comments on a post, oldest first
///
/// GET /api/posts/{post_id}/comment
async fn list_comments(
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<CommentList>>> {
    let comments = PostService::comments(&state.db, post_id).await?;
    Ok(Json(ApiResponse::ok(
        "Comments fetched successfully",
        CommentList { comments },
    )))
}

/// Add a comment
///
/// POST /api/posts/{post_id}/comment
async fn add_comment(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(post_id): Path<Uuid>,
    Json(req): Json<CommentRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<CommentView>>)> {
    let comment = PostService::add_comment(&state.db, post_id, user.id, &req).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Comment added successfully", comment)),
    ))
}
