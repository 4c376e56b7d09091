//! PostgreSQL repository implementations.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, DbConn, EntityTrait, FromQueryResult, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Select,
};
use uuid::Uuid;

use blogicum_core::domain::{
    AuthorSummary, Category, CommentView, Location, PostView, User,
};
use blogicum_core::error::RepoError;
use blogicum_core::pagination::{Page, PageRequest};
use blogicum_core::ports::{
    AdminPostFilter, CategoryRepository, CommentRepository, LocationRepository, PostQuery,
    PostRepository, UserRepository,
};

use super::entity::category::{self, Entity as CategoryEntity};
use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::location::{self, Entity as LocationEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::filters;
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL category repository.
pub type PostgresCategoryRepository = PostgresBaseRepository<CategoryEntity>;

/// PostgreSQL location repository.
pub type PostgresLocationRepository = PostgresBaseRepository<LocationEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL comment repository.
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(%username, "Finding user by username");

        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let result = CategoryEntity::find()
            .filter(category::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn list(&self) -> Result<Vec<Category>, RepoError> {
        let result = CategoryEntity::find()
            .order_by_asc(category::Column::Title)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl LocationRepository for PostgresLocationRepository {
    async fn list(&self) -> Result<Vec<Location>, RepoError> {
        let result = LocationEntity::find()
            .order_by_asc(location::Column::Name)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[derive(Debug, FromQueryResult)]
struct CommentCount {
    post_id: Uuid,
    count: i64,
}

fn unique_ids(ids: impl Iterator<Item = Uuid>) -> Vec<Uuid> {
    let mut ids: Vec<Uuid> = ids.collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

/// Attach authors, categories, locations and comment counts to `models`,
/// one query per relation.
async fn load_views(db: &DbConn, models: Vec<post::Model>) -> Result<Vec<PostView>, RepoError> {
    if models.is_empty() {
        return Ok(Vec::new());
    }

    let post_ids = unique_ids(models.iter().map(|m| m.id));
    let author_ids = unique_ids(models.iter().map(|m| m.author_id));
    let category_ids = unique_ids(models.iter().filter_map(|m| m.category_id));
    let location_ids = unique_ids(models.iter().filter_map(|m| m.location_id));

    let authors: HashMap<Uuid, AuthorSummary> = UserEntity::find()
        .filter(user::Column::Id.is_in(author_ids))
        .all(db)
        .await
        .map_err(map_db_err)?
        .into_iter()
        .map(|u| {
            let summary = AuthorSummary {
                id: u.id,
                username: u.username,
            };
            (summary.id, summary)
        })
        .collect();

    let categories: HashMap<Uuid, Category> = if category_ids.is_empty() {
        HashMap::new()
    } else {
        CategoryEntity::find()
            .filter(category::Column::Id.is_in(category_ids))
            .all(db)
            .await
            .map_err(map_db_err)?
            .into_iter()
            .map(|c| (c.id, c.into()))
            .collect()
    };

    let locations: HashMap<Uuid, Location> = if location_ids.is_empty() {
        HashMap::new()
    } else {
        LocationEntity::find()
            .filter(location::Column::Id.is_in(location_ids))
            .all(db)
            .await
            .map_err(map_db_err)?
            .into_iter()
            .map(|l| (l.id, l.into()))
            .collect()
    };

    let counts: HashMap<Uuid, u64> = CommentEntity::find()
        .select_only()
        .column(comment::Column::PostId)
        .column_as(comment::Column::Id.count(), "count")
        .filter(comment::Column::PostId.is_in(post_ids))
        .group_by(comment::Column::PostId)
        .into_model::<CommentCount>()
        .all(db)
        .await
        .map_err(map_db_err)?
        .into_iter()
        .map(|c| (c.post_id, c.count.max(0) as u64))
        .collect();

    models
        .into_iter()
        .map(|model| {
            let author = authors.get(&model.author_id).cloned().ok_or_else(|| {
                RepoError::Query(format!("author {} of post {} is missing", model.author_id, model.id))
            })?;
            let category = model.category_id.and_then(|id| categories.get(&id).cloned());
            let location = model.location_id.and_then(|id| locations.get(&id).cloned());
            let comment_count = counts.get(&model.id).copied().unwrap_or(0);

            Ok(PostView {
                post: model.into(),
                author,
                category,
                location,
                comment_count,
            })
        })
        .collect()
}

/// Run `select` newest-first and cut out the requested page.
async fn fetch_page(
    db: &DbConn,
    select: Select<PostEntity>,
    page: PageRequest,
) -> Result<Page<PostView>, RepoError> {
    let paginator = select
        .order_by_desc(post::Column::PubDate)
        .order_by_desc(post::Column::CreatedAt)
        .paginate(db, page.per_page);

    let count = paginator.num_items().await.map_err(map_db_err)?;
    let page = page.resolve(count);
    let models = paginator
        .fetch_page(page.number - 1)
        .await
        .map_err(map_db_err)?;

    let views = load_views(db, models).await?;
    Ok(Page::new(views, page, count))
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_view(&self, id: Uuid) -> Result<Option<PostView>, RepoError> {
        let Some(model) = PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
        else {
            return Ok(None);
        };

        Ok(load_views(&self.db, vec![model]).await?.pop())
    }

    async fn list_visible(
        &self,
        query: &PostQuery,
        page: PageRequest,
    ) -> Result<Page<PostView>, RepoError> {
        tracing::debug!(scope = ?query.scope, viewer = ?query.viewer, page = page.number, "Listing visible posts");

        let select = filters::joined_posts()
            .filter(filters::scope_condition(query.scope))
            .filter(filters::visibility_condition(query.viewer, query.now));

        fetch_page(&self.db, select, page).await
    }

    async fn list_admin(
        &self,
        filter: &AdminPostFilter,
        page: PageRequest,
    ) -> Result<Page<PostView>, RepoError> {
        let select = PostEntity::find().filter(filters::admin_condition(filter));

        fetch_page(&self.db, select, page).await
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<CommentView>, RepoError> {
        let rows = CommentEntity::find()
            .find_also_related(UserEntity)
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_asc(comment::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        rows.into_iter()
            .map(|(comment, author)| {
                let author = author.ok_or_else(|| {
                    RepoError::Query(format!("author of comment {} is missing", comment.id))
                })?;
                Ok(CommentView {
                    author: AuthorSummary {
                        id: author.id,
                        username: author.username,
                    },
                    comment: comment.into(),
                })
            })
            .collect()
    }
}
