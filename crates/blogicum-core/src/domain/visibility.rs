//! Post visibility rule.
//!
//! A post is publicly visible when it is published, dated no later than now,
//! and neither its category nor its location (when set) is hidden. The author
//! always sees their own posts.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{Category, Location, Post};

/// Whether an anonymous reader may see `post` at `now`.
pub fn is_publicly_visible(
    post: &Post,
    category: Option<&Category>,
    location: Option<&Location>,
    now: DateTime<Utc>,
) -> bool {
    post.is_published
        && post.pub_date <= now
        && category.is_none_or(|c| c.is_published)
        && location.is_none_or(|l| l.is_published)
}

/// Whether `viewer` (anonymous when `None`) may see `post` at `now`.
pub fn is_visible_to(
    post: &Post,
    category: Option<&Category>,
    location: Option<&Location>,
    viewer: Option<Uuid>,
    now: DateTime<Utc>,
) -> bool {
    viewer.is_some_and(|id| post.is_authored_by(id))
        || is_publicly_visible(post, category, location, now)
}
