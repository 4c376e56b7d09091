//! Profile page and profile editing.

use actix_web::{HttpResponse, web};

use blogicum_core::DomainError;
use blogicum_core::domain::User;
use blogicum_core::forms::ProfileForm;
use blogicum_core::pagination::PageRequest;
use blogicum_core::ports::{BaseRepository, PostQuery, PostScope};
use blogicum_shared::ApiResponse;
use blogicum_shared::dto::{PageQuery, ProfilePageResponse};

use super::{render, urls, username_taken};
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::AppResult;
use crate::state::AppState;

async fn load_user(state: &AppState, username: &str) -> AppResult<User> {
    Ok(state
        .users
        .find_by_username(username)
        .await?
        .ok_or_else(|| DomainError::not_found("User", username))?)
}

/// GET /profile/{username}/
///
/// The owner sees every post of theirs; other viewers see the public ones.
pub async fn profile(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let user = load_user(&state, &path.into_inner()).await?;

    let page = PageRequest::from_query(query.page.as_deref(), state.posts_per_page);
    let posts = state
        .posts
        .list_visible(
            &PostQuery::new(PostScope::Author(user.id), identity.user_id()),
            page,
        )
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(ProfilePageResponse {
        profile: render::profile(&user),
        posts: render::page(posts, render::post),
    })))
}

/// GET /profile/{username}/edit/
pub async fn edit_form(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let user = load_user(&state, &path.into_inner()).await?;
    if user.id != identity.user_id {
        return Ok(urls::found(urls::profile(&user.username)));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::ok(ProfileForm::from_user(&user))))
}

/// POST /profile/{username}/edit/
pub async fn edit(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
    body: web::Json<ProfileForm>,
) -> AppResult<HttpResponse> {
    let mut user = load_user(&state, &path.into_inner()).await?;
    if user.id != identity.user_id {
        tracing::debug!(user_id = %identity.user_id, profile = %user.username, "Profile edit by non-owner");
        return Ok(urls::see_other(urls::profile(&user.username)));
    }

    let form = body.into_inner();
    let mut errors = form.validate().err().unwrap_or_default();
    if !errors.has_field("username") && username_taken(&state, form.username.trim(), Some(user.id)).await? {
        errors.add("username", "A user with that username already exists.");
    }
    errors.into_result()?;

    form.apply(&mut user);
    let user = state.users.update(user).await?;
    tracing::info!(user_id = %user.id, email = %user.masked_email(), "Profile updated");

    Ok(urls::see_other(urls::profile(&user.username)))
}
