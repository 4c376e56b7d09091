//! In-memory storage - used when no database is configured and in tests.
//!
//! All repositories handed out by one [`InMemoryDatabase`] share the same
//! tables, so the foreign-key rules of the PostgreSQL schema (cascading
//! deletes, nullified references, unique columns) are reproduced here.
//! Note: Data is lost on process restart.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use blogicum_core::domain::{
    AuthorSummary, Category, Comment, CommentView, Location, Post, PostView, User,
};
use blogicum_core::error::RepoError;
use blogicum_core::pagination::{Page, PageRequest};
use blogicum_core::ports::{
    AdminPostFilter, BaseRepository, CategoryRepository, CommentRepository, LocationRepository,
    PostQuery, PostRepository, PostScope, UserRepository,
};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    categories: HashMap<Uuid, Category>,
    locations: HashMap<Uuid, Location>,
    posts: HashMap<Uuid, Post>,
    comments: HashMap<Uuid, Comment>,
}

impl Tables {
    fn author(&self, id: Uuid) -> Result<AuthorSummary, RepoError> {
        self.users
            .get(&id)
            .map(AuthorSummary::from)
            .ok_or_else(|| RepoError::Query(format!("user {id} is missing")))
    }

    fn view(&self, post: &Post) -> Result<PostView, RepoError> {
        Ok(PostView {
            post: post.clone(),
            author: self.author(post.author_id)?,
            category: post
                .category_id
                .and_then(|id| self.categories.get(&id).cloned()),
            location: post
                .location_id
                .and_then(|id| self.locations.get(&id).cloned()),
            comment_count: self
                .comments
                .values()
                .filter(|c| c.post_id == post.id)
                .count() as u64,
        })
    }

    /// Views of the posts accepted by `keep`, newest `pub_date` first.
    fn views_where(&self, keep: impl Fn(&PostView) -> bool) -> Result<Vec<PostView>, RepoError> {
        let mut views = Vec::new();
        for post in self.posts.values() {
            let view = self.view(post)?;
            if keep(&view) {
                views.push(view);
            }
        }
        views.sort_by(|a, b| {
            b.post
                .pub_date
                .cmp(&a.post.pub_date)
                .then(b.post.created_at.cmp(&a.post.created_at))
        });
        Ok(views)
    }

    fn check_post_refs(&self, post: &Post) -> Result<(), RepoError> {
        if !self.users.contains_key(&post.author_id) {
            return Err(RepoError::Constraint("post author does not exist".to_string()));
        }
        if post.category_id.is_some_and(|id| !self.categories.contains_key(&id)) {
            return Err(RepoError::Constraint("post category does not exist".to_string()));
        }
        if post.location_id.is_some_and(|id| !self.locations.contains_key(&id)) {
            return Err(RepoError::Constraint("post location does not exist".to_string()));
        }
        Ok(())
    }

    fn check_comment_refs(&self, comment: &Comment) -> Result<(), RepoError> {
        if !self.posts.contains_key(&comment.post_id) {
            return Err(RepoError::Constraint("comment post does not exist".to_string()));
        }
        if !self.users.contains_key(&comment.author_id) {
            return Err(RepoError::Constraint("comment author does not exist".to_string()));
        }
        Ok(())
    }

    fn check_username(&self, user: &User) -> Result<(), RepoError> {
        if self
            .users
            .values()
            .any(|u| u.id != user.id && u.username == user.username)
        {
            return Err(RepoError::Constraint(format!(
                "duplicate username '{}'",
                user.username
            )));
        }
        Ok(())
    }

    fn check_slug(&self, category: &Category) -> Result<(), RepoError> {
        if self
            .categories
            .values()
            .any(|c| c.id != category.id && c.slug == category.slug)
        {
            return Err(RepoError::Constraint(format!(
                "duplicate slug '{}'",
                category.slug
            )));
        }
        Ok(())
    }

    fn remove_post(&mut self, id: Uuid) -> bool {
        let removed = self.posts.remove(&id).is_some();
        if removed {
            self.comments.retain(|_, c| c.post_id != id);
        }
        removed
    }
}

fn insert_row<T: Clone>(
    table: &mut HashMap<Uuid, T>,
    id: Uuid,
    row: T,
) -> Result<T, RepoError> {
    if table.contains_key(&id) {
        return Err(RepoError::Constraint(format!("duplicate key {id}")));
    }
    table.insert(id, row.clone());
    Ok(row)
}

fn update_row<T: Clone>(
    table: &mut HashMap<Uuid, T>,
    id: Uuid,
    row: T,
) -> Result<T, RepoError> {
    match table.get_mut(&id) {
        Some(slot) => {
            *slot = row.clone();
            Ok(row)
        }
        None => Err(RepoError::NotFound),
    }
}

type SharedTables = Arc<RwLock<Tables>>;

/// Handle to one in-memory database; repositories created from the same
/// handle see each other's writes.
#[derive(Clone, Default)]
pub struct InMemoryDatabase {
    tables: SharedTables,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn users(&self) -> InMemoryUserRepository {
        InMemoryUserRepository {
            tables: self.tables.clone(),
        }
    }

    pub fn categories(&self) -> InMemoryCategoryRepository {
        InMemoryCategoryRepository {
            tables: self.tables.clone(),
        }
    }

    pub fn locations(&self) -> InMemoryLocationRepository {
        InMemoryLocationRepository {
            tables: self.tables.clone(),
        }
    }

    pub fn posts(&self) -> InMemoryPostRepository {
        InMemoryPostRepository {
            tables: self.tables.clone(),
        }
    }

    pub fn comments(&self) -> InMemoryCommentRepository {
        InMemoryCommentRepository {
            tables: self.tables.clone(),
        }
    }
}

pub struct InMemoryUserRepository {
    tables: SharedTables,
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;
        tables.check_username(&user)?;
        insert_row(&mut tables.users, user.id, user)
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;
        tables.check_username(&user)?;
        update_row(&mut tables.users, user.id, user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if tables.users.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        let owned: Vec<Uuid> = tables
            .posts
            .values()
            .filter(|p| p.author_id == id)
            .map(|p| p.id)
            .collect();
        for post_id in owned {
            tables.remove_post(post_id);
        }
        tables.comments.retain(|_, c| c.author_id != id);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }
}

pub struct InMemoryCategoryRepository {
    tables: SharedTables,
}

#[async_trait]
impl BaseRepository<Category, Uuid> for InMemoryCategoryRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, RepoError> {
        Ok(self.tables.read().await.categories.get(&id).cloned())
    }

    async fn insert(&self, category: Category) -> Result<Category, RepoError> {
        let mut tables = self.tables.write().await;
        tables.check_slug(&category)?;
        insert_row(&mut tables.categories, category.id, category)
    }

    async fn update(&self, category: Category) -> Result<Category, RepoError> {
        let mut tables = self.tables.write().await;
        tables.check_slug(&category)?;
        update_row(&mut tables.categories, category.id, category)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if tables.categories.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        for post in tables.posts.values_mut() {
            if post.category_id == Some(id) {
                post.category_id = None;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.categories.values().find(|c| c.slug == slug).cloned())
    }

    async fn list(&self) -> Result<Vec<Category>, RepoError> {
        let tables = self.tables.read().await;
        let mut categories: Vec<Category> = tables.categories.values().cloned().collect();
        categories.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(categories)
    }
}

pub struct InMemoryLocationRepository {
    tables: SharedTables,
}

#[async_trait]
impl BaseRepository<Location, Uuid> for InMemoryLocationRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Location>, RepoError> {
        Ok(self.tables.read().await.locations.get(&id).cloned())
    }

    async fn insert(&self, location: Location) -> Result<Location, RepoError> {
        let mut tables = self.tables.write().await;
        insert_row(&mut tables.locations, location.id, location)
    }

    async fn update(&self, location: Location) -> Result<Location, RepoError> {
        let mut tables = self.tables.write().await;
        update_row(&mut tables.locations, location.id, location)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if tables.locations.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        for post in tables.posts.values_mut() {
            if post.location_id == Some(id) {
                post.location_id = None;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl LocationRepository for InMemoryLocationRepository {
    async fn list(&self) -> Result<Vec<Location>, RepoError> {
        let tables = self.tables.read().await;
        let mut locations: Vec<Location> = tables.locations.values().cloned().collect();
        locations.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(locations)
    }
}

pub struct InMemoryPostRepository {
    tables: SharedTables,
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.tables.read().await.posts.get(&id).cloned())
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        tables.check_post_refs(&post)?;
        insert_row(&mut tables.posts, post.id, post)
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        tables.check_post_refs(&post)?;
        update_row(&mut tables.posts, post.id, post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if tables.remove_post(id) {
            Ok(())
        } else {
            Err(RepoError::NotFound)
        }
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_view(&self, id: Uuid) -> Result<Option<PostView>, RepoError> {
        let tables = self.tables.read().await;
        tables.posts.get(&id).map(|p| tables.view(p)).transpose()
    }

    async fn list_visible(
        &self,
        query: &PostQuery,
        page: PageRequest,
    ) -> Result<Page<PostView>, RepoError> {
        let tables = self.tables.read().await;
        let views = tables.views_where(|view| {
            let in_scope = match query.scope {
                PostScope::All => true,
                PostScope::Category(id) => view.post.category_id == Some(id),
                PostScope::Author(id) => view.post.author_id == id,
            };
            in_scope && view.is_visible_to(query.viewer, query.now)
        })?;
        Ok(Page::from_vec(views, page))
    }

    async fn list_admin(
        &self,
        filter: &AdminPostFilter,
        page: PageRequest,
    ) -> Result<Page<PostView>, RepoError> {
        let search = filter
            .search
            .as_deref()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());

        let tables = self.tables.read().await;
        let views = tables.views_where(|view| {
            let post = &view.post;
            search
                .as_deref()
                .is_none_or(|s| post.title.to_lowercase().contains(s))
                && filter.author_id.is_none_or(|id| post.author_id == id)
                && filter.category_id.is_none_or(|id| post.category_id == Some(id))
                && filter.location_id.is_none_or(|id| post.location_id == Some(id))
                && filter.is_published.is_none_or(|p| post.is_published == p)
        })?;
        Ok(Page::from_vec(views, page))
    }
}

pub struct InMemoryCommentRepository {
    tables: SharedTables,
}

#[async_trait]
impl BaseRepository<Comment, Uuid> for InMemoryCommentRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        Ok(self.tables.read().await.comments.get(&id).cloned())
    }

    async fn insert(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut tables = self.tables.write().await;
        tables.check_comment_refs(&comment)?;
        insert_row(&mut tables.comments, comment.id, comment)
    }

    async fn update(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut tables = self.tables.write().await;
        tables.check_comment_refs(&comment)?;
        update_row(&mut tables.comments, comment.id, comment)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        match tables.comments.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<CommentView>, RepoError> {
        let tables = self.tables.read().await;
        let mut comments: Vec<&Comment> = tables
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .collect();
        comments.sort_by_key(|c| c.created_at);

        comments
            .into_iter()
            .map(|c| {
                Ok(CommentView {
                    comment: c.clone(),
                    author: tables.author(c.author_id)?,
                })
            })
            .collect()
    }
}
