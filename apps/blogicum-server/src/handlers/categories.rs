use actix_web::{HttpResponse, web};

use blogicum_core::DomainError;
use blogicum_core::pagination::PageRequest;
use blogicum_core::ports::{PostQuery, PostScope};
use blogicum_shared::ApiResponse;
use blogicum_shared::dto::{CategoryPageResponse, PageQuery};

use super::render;
use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /category/{category_slug}/
///
/// Unpublished categories answer 404 like unknown ones.
pub async fn category_posts(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let slug = path.into_inner();
    let category = state
        .categories
        .find_by_slug(&slug)
        .await?
        .filter(|c| c.is_published)
        .ok_or_else(|| DomainError::not_found("Category", &slug))?;

    let page = PageRequest::from_query(query.page.as_deref(), state.posts_per_page);
    let posts = state
        .posts
        .list_visible(
            &PostQuery::new(PostScope::Category(category.id), identity.user_id()),
            page,
        )
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(CategoryPageResponse {
        category: render::category(category),
        posts: render::page(posts, render::post),
    })))
}
