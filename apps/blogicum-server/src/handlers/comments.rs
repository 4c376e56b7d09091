//! Comment handlers. Every route is nested under its post.

use actix_web::{HttpResponse, web};
use chrono::Utc;
use uuid::Uuid;

use blogicum_core::DomainError;
use blogicum_core::domain::Comment;
use blogicum_core::forms::CommentForm;
use blogicum_core::ports::BaseRepository;
use blogicum_shared::ApiResponse;

use super::urls;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// The comment addressed by `(post_id, comment_id)`; a comment of another
/// post counts as missing.
async fn load_comment(state: &AppState, post_id: Uuid, comment_id: Uuid) -> AppResult<Comment> {
    Ok(state
        .comments
        .find_by_id(comment_id)
        .await?
        .filter(|c| c.post_id == post_id)
        .ok_or_else(|| DomainError::not_found("Comment", comment_id))?)
}

/// POST /posts/{post_id}/comment/
pub async fn add(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<CommentForm>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    state
        .posts
        .find_view(post_id)
        .await?
        .filter(|view| view.is_visible_to(Some(identity.user_id), Utc::now()))
        .ok_or_else(|| DomainError::not_found("Post", post_id))?;

    let form = body.into_inner();
    form.validate()?;

    let comment = state
        .comments
        .insert(Comment::new(post_id, identity.user_id, form.text))
        .await?;
    tracing::info!(comment_id = %comment.id, %post_id, "Comment added");

    Ok(urls::see_other(urls::post_detail(post_id)))
}

/// GET /posts/{post_id}/edit_comment/{comment_id}/
pub async fn edit_form(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let comment = load_comment(&state, post_id, comment_id).await?;
    if !comment.is_authored_by(identity.user_id) {
        return Ok(urls::found(urls::post_detail(post_id)));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::ok(CommentForm::from_comment(&comment))))
}

/// POST /posts/{post_id}/edit_comment/{comment_id}/
pub async fn edit(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Json<CommentForm>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let mut comment = load_comment(&state, post_id, comment_id).await?;
    if !comment.is_authored_by(identity.user_id) {
        return Ok(urls::see_other(urls::post_detail(post_id)));
    }

    let form = body.into_inner();
    form.validate()?;
    comment.text = form.text;

    state.comments.update(comment).await?;
    tracing::info!(%comment_id, %post_id, "Comment updated");

    Ok(urls::see_other(urls::post_detail(post_id)))
}

/// GET /posts/{post_id}/delete_comment/{comment_id}/
pub async fn delete_form(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let comment = load_comment(&state, post_id, comment_id).await?;
    if !comment.is_authored_by(identity.user_id) {
        return Ok(urls::found(urls::post_detail(post_id)));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::ok(CommentForm::from_comment(&comment))))
}

/// POST /posts/{post_id}/delete_comment/{comment_id}/
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let comment = load_comment(&state, post_id, comment_id).await?;
    if !comment.is_authored_by(identity.user_id) {
        return Ok(urls::see_other(urls::post_detail(post_id)));
    }

    state.comments.delete(comment.id).await?;
    tracing::info!(%comment_id, %post_id, "Comment deleted");

    Ok(urls::see_other(urls::post_detail(post_id)))
}
