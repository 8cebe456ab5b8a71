//! Account service: registration, credential verification, profiles and the
//! admin user listing.

use crate::auth::{AuthError, PasswordService};
use crate::error::ApiError;
use crate::repositories::{PostRepository, UserRecord, UserRepository};
use postline_shared::types::{
    AdminUserList, AdminUserView, PaginationMeta, PostSummary, RegisterRequest, Role, UserProfile,
};
use postline_shared::validation::validate_phone;
use sqlx::PgPool;
use std::collections::HashMap;
use tracing::warn;
use uuid::Uuid;
use validator::Validate;

/// The claim fields established by credential verification
///
/// Everything the token issuer needs, and nothing it must not have: the
/// stored password hash never leaves this module.
#[derive(Debug, Clone)]
pub struct VerifiedAccount {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// Account service
pub struct AccountService;

impl AccountService {
    /// Register a new user
    ///
    /// Password hashing runs on the blocking thread pool.
    pub async fn register(pool: &PgPool, req: &RegisterRequest) -> Result<(), ApiError> {
        req.validate()
            .map_err(|e| ApiError::Validation(flatten_validation(&e)))?;

        // Ten digits exactly; the derive only checks length.
        validate_phone(&req.phone)
            .map_err(|_| ApiError::Validation("Phone must be 10 digits".to_string()))?;

        if UserRepository::email_exists(pool, &req.email)
            .await
            .map_err(ApiError::Internal)?
        {
            return Err(ApiError::BadRequest("User already exists".to_string()));
        }

        let password_hash = PasswordService::hash_async(req.password.clone())
            .await
            .map_err(ApiError::Internal)?;

        UserRepository::create(pool, &req.name, &req.email, &req.phone, &password_hash)
            .await
            .map_err(ApiError::Internal)?;

        Ok(())
    }

    /// Verify an email/password pair against the stored credential
    ///
    /// Case-sensitive email lookup, argon2 verification against the stored
    /// hash. Read-only; the returned claim fields never include the hash.
    pub async fn verify_credentials(
        pool: &PgPool,
        email: &str,
        password: &str,
    ) -> Result<VerifiedAccount, ApiError> {
        let user = UserRepository::find_by_email(pool, email)
            .await
            .map_err(ApiError::Internal)?
            .ok_or(AuthError::CredentialNotFound)?;

        let valid = PasswordService::verify_async(password.to_string(), user.password_hash.clone())
            .await
            .map_err(ApiError::Internal)?;

        if !valid {
            return Err(AuthError::InvalidCredential.into());
        }

        claims_for(&user)
    }

    /// The caller's own profile
    pub async fn profile(pool: &PgPool, user_id: Uuid) -> Result<UserProfile, ApiError> {
        let user = UserRepository::find_by_id(pool, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        let role = parse_role(&user)?;
        Ok(UserProfile {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            role,
            created_at: user.created_at,
        })
    }

    /// Page through non-admin users with their posts (admin listing)
    pub async fn list_users(
        pool: &PgPool,
        page: u32,
        per_page: u32,
    ) -> Result<AdminUserList, ApiError> {
        let page = page.max(1);
        let per_page = per_page.clamp(1, 100);
        let offset = (page as i64 - 1) * per_page as i64;

        let users = UserRepository::list_non_admin(pool, offset, per_page as i64)
            .await
            .map_err(ApiError::Internal)?;
        let total_users = UserRepository::count_non_admin(pool)
            .await
            .map_err(ApiError::Internal)? as u64;

        let user_ids: Vec<Uuid> = users.iter().map(|u| u.id).collect();
        let posts = PostRepository::list_by_authors(pool, &user_ids)
            .await
            .map_err(ApiError::Internal)?;

        let mut posts_by_author: HashMap<Uuid, Vec<PostSummary>> = HashMap::new();
        for post in posts {
            posts_by_author
                .entry(post.author_id)
                .or_default()
                .push(PostSummary {
                    id: post.id,
                    text: post.text,
                    image_url: post.image_url,
                });
        }

        let users = users
            .into_iter()
            .map(|user| {
                let role = parse_role(&user)?;
                Ok(AdminUserView {
                    posts: posts_by_author.remove(&user.id).unwrap_or_default(),
                    id: user.id,
                    name: user.name,
                    email: user.email,
                    phone: user.phone,
                    role,
                    created_at: user.created_at,
                })
            })
            .collect::<Result<Vec<_>, ApiError>>()?;

        let total_pages = total_users.div_ceil(per_page as u64);

        Ok(AdminUserList {
            users,
            pagination: PaginationMeta {
                total_users,
                total_pages,
                current_page: page,
                per_page,
            },
        })
    }
}

/// Claim fields for a stored user; fails on an unusable role value
fn claims_for(user: &UserRecord) -> Result<VerifiedAccount, ApiError> {
    let role = parse_role(user)?;
    Ok(VerifiedAccount {
        id: user.id,
        name: user.name.clone(),
        email: user.email.clone(),
        role,
    })
}

fn parse_role(user: &UserRecord) -> Result<Role, ApiError> {
    user.role.parse().map_err(|e| {
        warn!(user_id = %user.id, "stored role is unusable: {}", e);
        ApiError::Internal(anyhow::anyhow!("unusable role for user {}", user.id))
    })
}

/// One readable line out of a validator error tree
fn flatten_validation(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("invalid {}", field))
            })
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_flatten_to_messages() {
        let req = RegisterRequest {
            name: String::new(),
            email: "nope".to_string(),
            phone: "123".to_string(),
            password: "short".to_string(),
        };
        let errors = req.validate().unwrap_err();
        let message = flatten_validation(&errors);
        assert!(message.contains("Phone must be 10 digits"));
        assert!(message.contains("Invalid email"));
    }
}
