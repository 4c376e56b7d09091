//! Post listing, detail and authoring handlers.

use actix_web::{HttpResponse, web};
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use blogicum_core::DomainError;
use blogicum_core::domain::Post;
use blogicum_core::forms::PostForm;
use blogicum_core::pagination::PageRequest;
use blogicum_core::ports::{BaseRepository, PostQuery, PostScope};
use blogicum_shared::ApiResponse;
use blogicum_shared::dto::{CategoryResponse, LocationResponse, PageQuery, PostDetailResponse};

use super::{current_user, render, urls};
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// The post form with the choices for its select fields.
#[derive(Serialize)]
pub struct PostFormPage {
    pub form: PostForm,
    pub categories: Vec<CategoryResponse>,
    pub locations: Vec<LocationResponse>,
}

async fn form_page(state: &AppState, form: PostForm) -> AppResult<PostFormPage> {
    Ok(PostFormPage {
        form,
        categories: state
            .categories
            .list()
            .await?
            .into_iter()
            .map(render::category)
            .collect(),
        locations: state
            .locations
            .list()
            .await?
            .into_iter()
            .map(render::location)
            .collect(),
    })
}

/// Field rules plus the checks that need storage.
async fn validate_form(state: &AppState, form: &PostForm) -> AppResult<()> {
    let mut errors = form.validate().err().unwrap_or_default();

    if let Some(category_id) = form.category {
        if state.categories.find_by_id(category_id).await?.is_none() {
            errors.add("category", "Select a valid choice.");
        }
    }
    if let Some(location_id) = form.location {
        if state.locations.find_by_id(location_id).await?.is_none() {
            errors.add("location", "Select a valid choice.");
        }
    }

    errors.into_result().map_err(Into::into)
}

async fn load_post(state: &AppState, post_id: Uuid) -> AppResult<Post> {
    Ok(state
        .posts
        .find_by_id(post_id)
        .await?
        .ok_or_else(|| DomainError::not_found("Post", post_id))?)
}

/// GET /
pub async fn index(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = PageRequest::from_query(query.page.as_deref(), state.posts_per_page);
    let posts = state
        .posts
        .list_visible(&PostQuery::new(PostScope::All, identity.user_id()), page)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(render::page(posts, render::post))))
}

/// GET /posts/{post_id}/
pub async fn detail(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let view = state
        .posts
        .find_view(post_id)
        .await?
        .filter(|view| view.is_visible_to(identity.user_id(), Utc::now()))
        .ok_or_else(|| DomainError::not_found("Post", post_id))?;

    let comments = state.comments.list_for_post(post_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(PostDetailResponse {
        post: render::post(view),
        comments: comments.into_iter().map(render::comment).collect(),
    })))
}

/// GET /posts/create/
pub async fn create_form(state: web::Data<AppState>, _identity: Identity) -> AppResult<HttpResponse> {
    let page = form_page(&state, PostForm::default()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(page)))
}

/// POST /posts/create/
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<PostForm>,
) -> AppResult<HttpResponse> {
    let form = body.into_inner();
    validate_form(&state, &form).await?;

    let author = current_user(&state, &identity).await?;
    let post = state.posts.insert(form.into_post(author.id)).await?;
    tracing::info!(post_id = %post.id, author_id = %author.id, "Post created");

    Ok(urls::see_other(urls::profile(&author.username)))
}

/// GET /posts/{post_id}/edit/
pub async fn edit_form(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = load_post(&state, path.into_inner()).await?;
    if !post.is_authored_by(identity.user_id) {
        return Ok(urls::found(urls::post_detail(post.id)));
    }

    let page = form_page(&state, PostForm::from_post(&post)).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(page)))
}

/// POST /posts/{post_id}/edit/
pub async fn edit(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<PostForm>,
) -> AppResult<HttpResponse> {
    let mut post = load_post(&state, path.into_inner()).await?;
    if !post.is_authored_by(identity.user_id) {
        tracing::debug!(post_id = %post.id, user_id = %identity.user_id, "Edit by non-author");
        return Ok(urls::see_other(urls::post_detail(post.id)));
    }

    let form = body.into_inner();
    validate_form(&state, &form).await?;
    form.apply(&mut post);

    let post = state.posts.update(post).await?;
    tracing::info!(post_id = %post.id, "Post updated");

    Ok(urls::see_other(urls::post_detail(post.id)))
}

/// GET /posts/{post_id}/delete/
pub async fn delete_form(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = load_post(&state, path.into_inner()).await?;
    if !post.is_authored_by(identity.user_id) {
        return Ok(urls::found(urls::post_detail(post.id)));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::ok(PostForm::from_post(&post))))
}

/// POST /posts/{post_id}/delete/
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = load_post(&state, path.into_inner()).await?;
    if !post.is_authored_by(identity.user_id) {
        tracing::debug!(post_id = %post.id, user_id = %identity.user_id, "Delete by non-author");
        return Ok(urls::see_other(urls::post_detail(post.id)));
    }

    state.posts.delete(post.id).await?;
    tracing::info!(post_id = %post.id, "Post deleted");

    let author = current_user(&state, &identity).await?;
    Ok(urls::see_other(urls::profile(&author.username)))
}

