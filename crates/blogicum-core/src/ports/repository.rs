use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Category, Comment, CommentView, Location, Post, PostView, User};
use crate::error::RepoError;
use crate::pagination::{Page, PageRequest};

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Persist a new entity.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Overwrite an existing entity; `RepoError::NotFound` if it is gone.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;
}

#[async_trait]
pub trait CategoryRepository: BaseRepository<Category, Uuid> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError>;

    /// Every category, published or not, ordered by title.
    async fn list(&self) -> Result<Vec<Category>, RepoError>;
}

#[async_trait]
pub trait LocationRepository: BaseRepository<Location, Uuid> {
    /// Every location, published or not, ordered by name.
    async fn list(&self) -> Result<Vec<Location>, RepoError>;
}

/// Which posts a listing draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostScope {
    All,
    Category(Uuid),
    Author(Uuid),
}

/// A visibility-filtered post listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostQuery {
    pub scope: PostScope,
    /// The requesting user; their own posts bypass publication checks.
    pub viewer: Option<Uuid>,
    pub now: DateTime<Utc>,
}

impl PostQuery {
    pub fn new(scope: PostScope, viewer: Option<Uuid>) -> Self {
        Self {
            scope,
            viewer,
            now: Utc::now(),
        }
    }
}

/// Unfiltered post listing used by staff.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminPostFilter {
    /// Case-insensitive title substring.
    pub search: Option<String>,
    pub author_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub location_id: Option<Uuid>,
    pub is_published: Option<bool>,
}

#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// Load a post with its relations, regardless of visibility.
    async fn find_view(&self, id: Uuid) -> Result<Option<PostView>, RepoError>;

    /// Posts visible to `query.viewer`, newest `pub_date` first.
    async fn list_visible(
        &self,
        query: &PostQuery,
        page: PageRequest,
    ) -> Result<Page<PostView>, RepoError>;

    /// Every post matching `filter`, newest `pub_date` first.
    async fn list_admin(
        &self,
        filter: &AdminPostFilter,
        page: PageRequest,
    ) -> Result<Page<PostView>, RepoError>;
}

#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, Uuid> {
    /// Comments on a post, oldest first.
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<CommentView>, RepoError>;
}
