//! Post, like and comment repository

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Post record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostRecord {
    pub id: Uuid,
    pub text: Option<String>,
    pub image_url: Option<String>,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Post row joined with its author's name
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostWithAuthor {
    pub id: Uuid,
    pub text: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub author_id: Uuid,
    pub author_name: String,
}

/// Like record
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LikeRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub post_id: Uuid,
}

/// Comment row joined with the commenter's name
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CommentRecord {
    pub id: Uuid,
    pub text: String,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    pub created_at: DateTime<Utc>,
}

/// Post repository
pub struct PostRepository;

impl PostRepository {
    /// All posts with authors, newest first
    pub async fn list_all(pool: &PgPool) -> Result<Vec<PostWithAuthor>> {
        let posts = sqlx::query_as::<_, PostWithAuthor>(
            r#"
            SELECT p.id, p.text, p.image_url, p.created_at,
                   u.id AS author_id, u.name AS author_name
            FROM posts p
            JOIN users u ON u.id = p.author_id
            ORDER BY p.created_at DESC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(posts)
    }

    /// One author's posts, newest first
    pub async fn list_by_author(pool: &PgPool, author_id: Uuid) -> Result<Vec<PostWithAuthor>> {
        let posts = sqlx::query_as::<_, PostWithAuthor>(
            r#"
            SELECT p.id, p.text, p.image_url, p.created_at,
                   u.id AS author_id, u.name AS author_name
            FROM posts p
            JOIN users u ON u.id = p.author_id
            WHERE p.author_id = $1
            ORDER BY p.created_at DESC
            "#,
        )
        .bind(author_id)
        .fetch_all(pool)
        .await?;

        Ok(posts)
    }

    /// Posts belonging to any of the given authors (admin listing)
    pub async fn list_by_authors(pool: &PgPool, author_ids: &[Uuid]) -> Result<Vec<PostRecord>> {
        let posts = sqlx::query_as::<_, PostRecord>(
            r#"
            SELECT id, text, image_url, author_id, created_at
            FROM posts
            WHERE author_id = ANY($1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(author_ids)
        .fetch_all(pool)
        .await?;

        Ok(posts)
    }

    /// Create a post
    pub async fn create(
        pool: &PgPool,
        author_id: Uuid,
        text: Option<&str>,
        image_url: Option<&str>,
    ) -> Result<PostRecord> {
        let post = sqlx::query_as::<_, PostRecord>(
            r#"
            INSERT INTO posts (author_id, text, image_url)
            VALUES ($1, $2, $3)
            RETURNING id, text, image_url, author_id, created_at
            "#,
        )
        .bind(author_id)
        .bind(text)
        .bind(image_url)
        .fetch_one(pool)
        .await?;

        Ok(post)
    }

    /// Check a post exists
    pub async fn exists(pool: &PgPool, post_id: Uuid) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM posts WHERE id = $1)
            "#,
        )
        .bind(post_id)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }

    /// Likes for a set of posts
    pub async fn likes_for_posts(pool: &PgPool, post_ids: &[Uuid]) -> Result<Vec<LikeRecord>> {
        let likes = sqlx::query_as::<_, LikeRecord>(
            r#"
            SELECT id, user_id, post_id
            FROM likes
            WHERE post_id = ANY($1)
            "#,
        )
        .bind(post_ids)
        .fetch_all(pool)
        .await?;

        Ok(likes)
    }

    /// A specific user's like on a specific post, if any
    pub async fn find_like(
        pool: &PgPool,
        user_id: Uuid,
        post_id: Uuid,
    ) -> Result<Option<LikeRecord>> {
        let like = sqlx::query_as::<_, LikeRecord>(
            r#"
            SELECT id, user_id, post_id
            FROM likes
            WHERE user_id = $1 AND post_id = $2
            "#,
        )
        .bind(user_id)
        .bind(post_id)
        .fetch_optional(pool)
        .await?;

        Ok(like)
    }

    /// Create a like
    pub async fn create_like(pool: &PgPool, user_id: Uuid, post_id: Uuid) -> Result<LikeRecord> {
        let like = sqlx::query_as::<_, LikeRecord>(
            r#"
            INSERT INTO likes (user_id, post_id)
            VALUES ($1, $2)
            RETURNING id, user_id, post_id
            "#,
        )
        .bind(user_id)
        .bind(post_id)
        .fetch_one(pool)
        .await?;

        Ok(like)
    }

    /// Remove a like by id
    pub async fn delete_like(pool: &PgPool, like_id: Uuid) -> Result<()> {
        sqlx::query(
            r#"
            DELETE FROM likes WHERE id = $1
            "#,
        )
        .bind(like_id)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Comments with commenter names for a set of posts, oldest first
    pub async fn comments_for_posts(
        pool: &PgPool,
        post_ids: &[Uuid],
    ) -> Result<Vec<CommentRecord>> {
        let comments = sqlx::query_as::<_, CommentRecord>(
            r#"
            SELECT c.id, c.text, c.post_id, c.created_at,
                   u.id AS user_id, u.name AS user_name
            FROM comments c
            JOIN users u ON u.id = c.user_id
            WHERE c.post_id = ANY($1)
            ORDER BY c.created_at ASC
            "#,
        )
        .bind(post_ids)
        .fetch_all(pool)
        .await?;

        Ok(comments)
    }

    /// Add a comment, returning it with the commenter's name
    pub async fn create_comment(
        pool: &PgPool,
        post_id: Uuid,
        user_id: Uuid,
        text: &str,
    ) -> Result<CommentRecord> {
        let comment = sqlx::query_as::<_, CommentRecord>(
            r#"
            WITH inserted AS (
                INSERT INTO comments (post_id, user_id, text)
                VALUES ($1, $2, $3)
                RETURNING id, text, post_id, user_id, created_at
            )
            SELECT i.id, i.text, i.post_id, i.created_at,
                   u.id AS user_id, u.name AS user_name
            FROM inserted i
            JOIN users u ON u.id = i.user_id
            "#,
        )
        .bind(post_id)
        .bind(user_id)
        .bind(text)
        .fetch_one(pool)
        .await?;

        Ok(comment)
    }
}

#[cfg(test)]
mod tests {
    // Integration tests require database - see backend/tests/
}
