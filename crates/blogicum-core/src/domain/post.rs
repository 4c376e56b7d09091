use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::visibility;
use super::{Category, Location, User};

/// Post entity - a blog entry with a scheduled publication date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub category_id: Option<Uuid>,
    pub location_id: Option<Uuid>,
    pub title: String,
    pub text: String,
    /// Posts dated in the future stay hidden from the public until then.
    pub pub_date: DateTime<Utc>,
    pub is_published: bool,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Create a new published post without category or location.
    pub fn new(author_id: Uuid, title: String, text: String, pub_date: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            author_id,
            category_id: None,
            location_id: None,
            title,
            text,
            pub_date,
            is_published: true,
            image: None,
            created_at: Utc::now(),
        }
    }

    pub fn is_authored_by(&self, user_id: Uuid) -> bool {
        self.author_id == user_id
    }
}

/// The public face of a post's author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorSummary {
    pub id: Uuid,
    pub username: String,
}

impl From<&User> for AuthorSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
        }
    }
}

/// Post joined with its author, category, location and comment count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostView {
    pub post: Post,
    pub author: AuthorSummary,
    pub category: Option<Category>,
    pub location: Option<Location>,
    pub comment_count: u64,
}

impl PostView {
    pub fn is_publicly_visible(&self, now: DateTime<Utc>) -> bool {
        visibility::is_publicly_visible(
            &self.post,
            self.category.as_ref(),
            self.location.as_ref(),
            now,
        )
    }

    pub fn is_visible_to(&self, viewer: Option<Uuid>, now: DateTime<Utc>) -> bool {
        visibility::is_visible_to(
            &self.post,
            self.category.as_ref(),
            self.location.as_ref(),
            viewer,
            now,
        )
    }
}
