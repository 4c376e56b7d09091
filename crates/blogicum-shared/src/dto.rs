//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::response::PageResponse;

/// Public view of a post or comment author.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorResponse {
    pub id: Uuid,
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub slug: String,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationResponse {
    pub id: Uuid,
    pub name: String,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

/// A post as shown in listings and on its detail page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub title: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub is_published: bool,
    pub image: Option<String>,
    pub author: AuthorResponse,
    pub category: Option<CategoryResponse>,
    pub location: Option<LocationResponse>,
    pub comment_count: u64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: Uuid,
    pub post_id: Uuid,
    pub text: String,
    pub author: AuthorResponse,
    pub created_at: DateTime<Utc>,
}

/// A post with its comments, oldest comment first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetailResponse {
    pub post: PostResponse,
    pub comments: Vec<CommentResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryPageResponse {
    pub category: CategoryResponse,
    pub posts: PageResponse<PostResponse>,
}

/// A user's public profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub display_name: String,
    pub date_joined: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfilePageResponse {
    pub profile: ProfileResponse,
    pub posts: PageResponse<PostResponse>,
}

/// Response containing authentication tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub username: String,
}

/// Describes the login form to a client that has not signed in yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginPageResponse {
    pub fields: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

/// Body of a redirect; mirrors the `Location` header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedirectResponse {
    pub location: String,
}

/// Query parameters of the staff post search.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminPostQuery {
    pub search: Option<String>,
    pub author: Option<String>,
    pub category: Option<Uuid>,
    pub location: Option<Uuid>,
    pub is_published: Option<bool>,
    pub page: Option<String>,
}

/// Body of the staff publish toggle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishRequest {
    pub is_published: bool,
}

/// Query string accepted by every listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}
