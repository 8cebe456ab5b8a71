//! Session repository
//!
//! Server-side session records backing the cookie flow: an opaque token
//! mapped to a subject id with a fixed expiry. Created at login, deleted at
//! logout, looked up by token on every cookie-authenticated request.

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Session row joined with its user, as one lookup resolves both
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SessionWithUser {
    pub session_token: String,
    pub expires_at: DateTime<Utc>,
    pub user_id: Uuid,
    pub user_name: String,
    pub user_email: String,
    pub user_role: String,
}

/// Session repository
pub struct SessionRepository;

impl SessionRepository {
    /// Persist a new session record
    pub async fn create(
        pool: &PgPool,
        session_token: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO sessions (session_token, user_id, expires_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(session_token)
        .bind(user_id)
        .bind(expires_at)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Look up an unexpired session and its user by token
    ///
    /// Expiry is enforced in the query against the database clock; an expired
    /// record is indistinguishable from an absent one.
    pub async fn find_valid(pool: &PgPool, session_token: &str) -> Result<Option<SessionWithUser>> {
        let session = sqlx::query_as::<_, SessionWithUser>(
            r#"
            SELECT s.session_token, s.expires_at,
                   u.id AS user_id, u.name AS user_name,
                   u.email AS user_email, u.role AS user_role
            FROM sessions s
            JOIN users u ON u.id = s.user_id
            WHERE s.session_token = $1 AND s.expires_at > NOW()
            "#,
        )
        .bind(session_token)
        .fetch_optional(pool)
        .await?;

        Ok(session)
    }

    /// Delete a session by token (logout)
    pub async fn delete(pool: &PgPool, session_token: &str) -> Result<()> {
        sqlx::query(
            r#"
            DELETE FROM sessions WHERE session_token = $1
            "#,
        )
        .bind(session_token)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Drop expired records; returns how many were removed
    pub async fn purge_expired(pool: &PgPool) -> Result<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM sessions WHERE expires_at <= NOW()
            "#,
        )
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    // Integration tests require database - see backend/tests/
}
