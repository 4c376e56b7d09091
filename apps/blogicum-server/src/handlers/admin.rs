//! Staff-only management of categories, locations and posts.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use blogicum_core::DomainError;
use blogicum_core::domain::{Category, Location};
use blogicum_core::error::ValidationErrors;
use blogicum_core::forms::{CategoryForm, LocationForm};
use blogicum_core::pagination::{Page, PageRequest};
use blogicum_core::ports::{AdminPostFilter, BaseRepository};
use blogicum_shared::ApiResponse;
use blogicum_shared::dto::{AdminPostQuery, PublishRequest};

use super::render;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn require_staff(identity: &Identity) -> AppResult<()> {
    if identity.is_staff() {
        Ok(())
    } else {
        tracing::warn!(user_id = %identity.user_id, "Admin access denied");
        Err(AppError::Forbidden)
    }
}

/// Field rules plus slug uniqueness, ignoring `current` itself.
async fn validate_category(
    state: &AppState,
    form: &CategoryForm,
    current: Option<Uuid>,
) -> AppResult<()> {
    let mut errors: ValidationErrors = form.validate().err().unwrap_or_default();
    if !errors.has_field("slug") {
        let existing = state.categories.find_by_slug(form.slug.trim()).await?;
        if existing.is_some_and(|c| Some(c.id) != current) {
            errors.add("slug", "Category with this slug already exists.");
        }
    }
    errors.into_result().map_err(Into::into)
}

/// GET /admin/categories/
pub async fn list_categories(
    state: web::Data<AppState>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    require_staff(&identity)?;
    let categories = state.categories.list().await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        categories.into_iter().map(render::category).collect::<Vec<_>>(),
    )))
}

/// POST /admin/categories/
pub async fn create_category(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CategoryForm>,
) -> AppResult<HttpResponse> {
    require_staff(&identity)?;
    let form = body.into_inner();
    validate_category(&state, &form, None).await?;

    let category = state.categories.insert(form.into_category()).await?;
    tracing::info!(category_id = %category.id, slug = %category.slug, "Category created");

    Ok(HttpResponse::Created().json(ApiResponse::ok(render::category(category))))
}

/// POST /admin/categories/{id}/
pub async fn update_category(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<CategoryForm>,
) -> AppResult<HttpResponse> {
    require_staff(&identity)?;
    let id = path.into_inner();
    let mut category: Category = state
        .categories
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("Category", id))?;

    let form = body.into_inner();
    validate_category(&state, &form, Some(id)).await?;
    form.apply(&mut category);

    let category = state.categories.update(category).await?;
    tracing::info!(category_id = %id, "Category updated");

    Ok(HttpResponse::Ok().json(ApiResponse::ok(render::category(category))))
}

/// POST /admin/categories/{id}/delete/
///
/// Posts of the category keep existing without one.
pub async fn delete_category(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    require_staff(&identity)?;
    let id = path.into_inner();
    state.categories.delete(id).await?;
    tracing::info!(category_id = %id, "Category deleted");

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(id, "Category deleted")))
}

/// GET /admin/locations/
pub async fn list_locations(
    state: web::Data<AppState>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    require_staff(&identity)?;
    let locations = state.locations.list().await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        locations.into_iter().map(render::location).collect::<Vec<_>>(),
    )))
}

/// POST /admin/locations/
pub async fn create_location(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<LocationForm>,
) -> AppResult<HttpResponse> {
    require_staff(&identity)?;
    let form = body.into_inner();
    form.validate()?;

    let location = state.locations.insert(form.into_location()).await?;
    tracing::info!(location_id = %location.id, "Location created");

    Ok(HttpResponse::Created().json(ApiResponse::ok(render::location(location))))
}

/// POST /admin/locations/{id}/
pub async fn update_location(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<LocationForm>,
) -> AppResult<HttpResponse> {
    require_staff(&identity)?;
    let id = path.into_inner();
    let mut location: Location = state
        .locations
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("Location", id))?;

    let form = body.into_inner();
    form.validate()?;
    form.apply(&mut location);

    let location = state.locations.update(location).await?;
    tracing::info!(location_id = %id, "Location updated");

    Ok(HttpResponse::Ok().json(ApiResponse::ok(render::location(location))))
}

/// POST /admin/locations/{id}/delete/
pub async fn delete_location(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    require_staff(&identity)?;
    let id = path.into_inner();
    state.locations.delete(id).await?;
    tracing::info!(location_id = %id, "Location deleted");

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(id, "Location deleted")))
}

/// GET /admin/posts/
///
/// Every post regardless of visibility, searchable by title.
pub async fn list_posts(
    state: web::Data<AppState>,
    identity: Identity,
    query: web::Query<AdminPostQuery>,
) -> AppResult<HttpResponse> {
    require_staff(&identity)?;
    let query = query.into_inner();
    let page = PageRequest::from_query(query.page.as_deref(), state.posts_per_page);

    let author_id = match query.author.as_deref().map(str::trim).filter(|a| !a.is_empty()) {
        Some(username) => match state.users.find_by_username(username).await? {
            Some(user) => Some(user.id),
            None => {
                let empty = Page::from_vec(Vec::new(), page);
                return Ok(HttpResponse::Ok().json(ApiResponse::ok(render::page(empty, render::post))));
            }
        },
        None => None,
    };

    let filter = AdminPostFilter {
        search: query.search,
        author_id,
        category_id: query.category,
        location_id: query.location,
        is_published: query.is_published,
    };
    let posts = state.posts.list_admin(&filter, page).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(render::page(posts, render::post))))
}

/// POST /admin/posts/{id}/publish/
pub async fn set_published(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<PublishRequest>,
) -> AppResult<HttpResponse> {
    require_staff(&identity)?;
    let id = path.into_inner();
    let mut post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("Post", id))?;

    post.is_published = body.is_published;
    state.posts.update(post).await?;
    tracing::info!(post_id = %id, is_published = body.is_published, "Post publication changed");

    let view = state
        .posts
        .find_view(id)
        .await?
        .ok_or_else(|| DomainError::not_found("Post", id))?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(render::post(view))))
}
