//! API request and response types
//!
//! Field names are camelCase on the wire; the frontend consumes them as-is.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Uniform response envelope
///
/// Every endpoint responds with `{success, message, data}`; `data` is omitted
/// when there is nothing to return.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }
}

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER" => Ok(Role::User),
            "ADMIN" => Ok(Role::Admin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// Role value outside the known set
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

/// Identity claim set
///
/// The minimal identity trusted after verification. Immutable once issued;
/// this is the exact JSON handlers receive in the `x-user` request header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Registration request
///
/// The phone shape (exactly ten digits) is checked by the account service
/// with [`crate::validation::validate_phone`]; the derive only covers what
/// it can express.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email"))]
    pub email: String,
    #[validate(length(min = 10, max = 10, message = "Phone must be 10 digits"))]
    pub phone: String,
    #[validate(length(min = 6, message = "At least 6 characters"))]
    pub password: String,
}

/// Login response: a signed bearer token for API clients. The session cookie
/// rides along in `Set-Cookie` for browser clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
}

/// Session-check response
///
/// `user` is absent when the request carried no valid credential. `token` is
/// re-signed on every read, so its expiry is always stamped from now.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<Identity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// Post author as embedded in feed responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostAuthor {
    pub id: Uuid,
    pub name: String,
}

/// Like entry: enough for a client to know who liked a post
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeView {
    pub id: Uuid,
    pub user_id: Uuid,
}

/// Comment with its author
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: Uuid,
    pub text: String,
    pub user: PostAuthor,
    pub created_at: DateTime<Utc>,
}

/// Post with author, likes and comments
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    pub id: Uuid,
    pub text: Option<String>,
    pub image_url: Option<String>,
    pub author: PostAuthor,
    pub likes: Vec<LikeView>,
    pub comments: Vec<CommentView>,
    pub created_at: DateTime<Utc>,
}

/// Create-post request. Binary uploads are out of scope; an image is an URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub text: Option<String>,
    pub image_url: Option<String>,
}

/// Like-toggle request. The acting user comes from the verified identity,
/// never from the body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeRequest {
    pub post_id: Uuid,
}

/// Result of a like toggle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikeResult {
    pub liked: bool,
}

/// Comment request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CommentRequest {
    #[validate(length(min = 2, max = 500, message = "Comment must be between 2 and 500 characters"))]
    pub text: String,
}

/// Feed / own-posts payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostList {
    pub posts: Vec<PostView>,
}

/// Comment listing payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentList {
    pub comments: Vec<CommentView>,
}

/// Caller's own profile
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Post summary embedded in the admin user listing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    pub id: Uuid,
    pub text: Option<String>,
    pub image_url: Option<String>,
}

/// User row in the admin listing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserView {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub posts: Vec<PostSummary>,
}

/// Pagination metadata for the admin listing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub total_users: u64,
    pub total_pages: u64,
    pub current_page: u32,
    pub per_page: u32,
}

/// Admin user listing payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUserList {
    pub users: Vec<AdminUserView>,
    pub pagination: PaginationMeta,
}

/// AI chat proxy request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub prompt: String,
}

/// AI chat proxy response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_omits_absent_data() {
        let resp: ApiResponse<()> = ApiResponse::error("Unauthorized");
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"success": false, "message": "Unauthorized"})
        );
    }

    #[test]
    fn role_round_trips_through_strings() {
        assert_eq!("ADMIN".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(Role::User.as_str(), "USER");
        assert!("editor".parse::<Role>().is_err());
    }

    #[test]
    fn identity_serializes_camel_case() {
        let identity = Identity {
            id: Uuid::nil(),
            name: "Admin".to_string(),
            email: "admin@yopmail.com".to_string(),
            role: Role::Admin,
            issued_at: Utc::now(),
            expires_at: Utc::now(),
        };
        let json = serde_json::to_value(&identity).unwrap();
        assert_eq!(json["role"], "ADMIN");
        assert!(json.get("issuedAt").is_some());
        assert!(json.get("expiresAt").is_some());
    }

    #[test]
    fn register_request_rejects_short_phone() {
        let req = RegisterRequest {
            name: "Test".to_string(),
            email: "test@example.com".to_string(),
            phone: "12345".to_string(),
            password: "secret1".to_string(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn register_request_accepts_valid_input() {
        let req = RegisterRequest {
            name: "Test".to_string(),
            email: "test@example.com".to_string(),
            phone: "9999999999".to_string(),
            password: "secret1".to_string(),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn comment_length_bounds() {
        let too_short = CommentRequest { text: "a".to_string() };
        assert!(too_short.validate().is_err());

        let ok = CommentRequest { text: "nice post".to_string() };
        assert!(ok.validate().is_ok());

        let too_long = CommentRequest { text: "x".repeat(501) };
        assert!(too_long.validate().is_err());
    }
}
