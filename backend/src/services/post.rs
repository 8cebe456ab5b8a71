//! Post service: the feed, own posts, likes and comments.

use crate::error::ApiError;
use crate::repositories::{CommentRecord, PostRepository};
use crate::repositories::post::PostWithAuthor;
use postline_shared::types::{
    CommentRequest, CommentView, CreatePostRequest, LikeView, PostAuthor, PostView,
};
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;
use validator::Validate;

/// Post service
pub struct PostService;

impl PostService {
    /// The public feed: every post with author, likes and comments
    pub async fn feed(pool: &PgPool) -> Result<Vec<PostView>, ApiError> {
        let posts = PostRepository::list_all(pool)
            .await
            .map_err(ApiError::Internal)?;
        Self::assemble(pool, posts).await
    }

    /// The caller's own posts
    pub async fn own_posts(pool: &PgPool, user_id: Uuid) -> Result<Vec<PostView>, ApiError> {
        let posts = PostRepository::list_by_author(pool, user_id)
            .await
            .map_err(ApiError::Internal)?;
        Self::assemble(pool, posts).await
    }

    /// Create a post from text and/or an image URL
    pub async fn create(
        pool: &PgPool,
        author_id: Uuid,
        author_name: &str,
        req: &CreatePostRequest,
    ) -> Result<PostView, ApiError> {
        let text = req.text.as_deref().map(str::trim).filter(|t| !t.is_empty());
        let image_url = req
            .image_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty());

        if text.is_none() && image_url.is_none() {
            return Err(ApiError::BadRequest(
                "Text or image is required".to_string(),
            ));
        }

        let post = PostRepository::create(pool, author_id, text, image_url)
            .await
            .map_err(ApiError::Internal)?;

        Ok(PostView {
            id: post.id,
            text: post.text,
            image_url: post.image_url,
            author: PostAuthor {
                id: author_id,
                name: author_name.to_string(),
            },
            likes: Vec::new(),
            comments: Vec::new(),
            created_at: post.created_at,
        })
    }

    /// Toggle the caller's like on a post; true when the post is now liked
    pub async fn toggle_like(
        pool: &PgPool,
        user_id: Uuid,
        post_id: Uuid,
    ) -> Result<bool, ApiError> {
        if !PostRepository::exists(pool, post_id)
            .await
            .map_err(ApiError::Internal)?
        {
            return Err(ApiError::NotFound("Post not found".to_string()));
        }

        match PostRepository::find_like(pool, user_id, post_id)
            .await
            .map_err(ApiError::Internal)?
        {
            Some(like) => {
                PostRepository::delete_like(pool, like.id)
                    .await
                    .map_err(ApiError::Internal)?;
                Ok(false)
            }
            None => {
                PostRepository::create_like(pool, user_id, post_id)
                    .await
                    .map_err(ApiError::Internal)?;
                Ok(true)
            }
        }
    }

    /// Comments for one post, oldest first
    pub async fn comments(pool: &PgPool, post_id: Uuid) -> Result<Vec<CommentView>, ApiError> {
        if !PostRepository::exists(pool, post_id)
            .await
            .map_err(ApiError::Internal)?
        {
            return Err(ApiError::NotFound("Post not found".to_string()));
        }

        let comments = PostRepository::comments_for_posts(pool, &[post_id])
            .await
            .map_err(ApiError::Internal)?;

        Ok(comments.into_iter().map(comment_view).collect())
    }

    /// Add a comment to a post
    pub async fn add_comment(
        pool: &PgPool,
        post_id: Uuid,
        user_id: Uuid,
        req: &CommentRequest,
    ) -> Result<CommentView, ApiError> {
        req.validate()
            .map_err(|_| ApiError::Validation("Comment must be between 2 and 500 characters".to_string()))?;

        if !PostRepository::exists(pool, post_id)
            .await
            .map_err(ApiError::Internal)?
        {
            return Err(ApiError::NotFound("Post not found".to_string()));
        }

        let comment = PostRepository::create_comment(pool, post_id, user_id, req.text.trim())
            .await
            .map_err(ApiError::Internal)?;

        Ok(comment_view(comment))
    }

    /// Attach likes and comments to a page of posts
    async fn assemble(
        pool: &PgPool,
        posts: Vec<PostWithAuthor>,
    ) -> Result<Vec<PostView>, ApiError> {
        let post_ids: Vec<Uuid> = posts.iter().map(|p| p.id).collect();

        let likes = PostRepository::likes_for_posts(pool, &post_ids)
            .await
            .map_err(ApiError::Internal)?;
        let comments = PostRepository::comments_for_posts(pool, &post_ids)
            .await
            .map_err(ApiError::Internal)?;

        let mut likes_by_post: HashMap<Uuid, Vec<LikeView>> = HashMap::new();
        for like in likes {
            likes_by_post.entry(like.post_id).or_default().push(LikeView {
                id: like.id,
                user_id: like.user_id,
            });
        }

        let mut comments_by_post: HashMap<Uuid, Vec<CommentView>> = HashMap::new();
        for comment in comments {
            comments_by_post
                .entry(comment.post_id)
                .or_default()
                .push(comment_view(comment));
        }

        Ok(posts
            .into_iter()
            .map(|post| PostView {
                likes: likes_by_post.remove(&post.id).unwrap_or_default(),
                comments: comments_by_post.remove(&post.id).unwrap_or_default(),
                id: post.id,
                text: post.text,
                image_url: post.image_url,
                author: PostAuthor {
                    id: post.author_id,
                    name: post.author_name,
                },
                created_at: post.created_at,
            })
            .collect())
    }
}

fn comment_view(comment: CommentRecord) -> CommentView {
    CommentView {
        id: comment.id,
        text: comment.text,
        user: PostAuthor {
            id: comment.user_id,
            name: comment.user_name,
        },
        created_at: comment.created_at,
    }
}
