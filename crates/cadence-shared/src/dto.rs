//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to register a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterUserRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response containing a user's public information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: String,
}

/// Response containing authentication tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// Request to create a post. The scheduling choice (either `share_now` or a
/// `share_at` timestamp) is validated server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub content: String,
    #[serde(default)]
    pub share_now: Option<bool>,
    #[serde(default)]
    pub share_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub share_on_linkedin: bool,
}

/// Request to update a post. Absent fields are left unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePostRequest {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub share_now: Option<bool>,
    #[serde(default)]
    pub share_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub share_on_linkedin: Option<bool>,
}

/// Request to publish a post to a platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharePostRequest {
    /// Platform name; defaults to "linkedin".
    #[serde(default)]
    pub platform: Option<String>,
    /// Simulate the share without calling the external platform.
    #[serde(default)]
    pub dry_run: bool,
}

/// A post with its scheduling and publish status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub share_now: Option<bool>,
    pub share_at: Option<DateTime<Utc>>,
    pub share_start_at: Option<DateTime<Utc>>,
    pub share_complete_at: Option<DateTime<Utc>>,
    pub share_on_linkedin: bool,
    pub shared_at_linkedin: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
