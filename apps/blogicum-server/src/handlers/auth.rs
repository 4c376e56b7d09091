//! Authentication handlers.

use actix_web::cookie::{Cookie, SameSite, time::Duration};
use actix_web::{HttpResponse, web};
use serde::Deserialize;

use blogicum_core::domain::User;
use blogicum_core::forms::{LoginForm, RegistrationForm};
use blogicum_core::ports::{AuthError, BaseRepository};
use blogicum_shared::ApiResponse;
use blogicum_shared::dto::{AuthResponse, LoginPageResponse};

use super::{urls, username_taken};
use crate::middleware::auth::TOKEN_COOKIE;
use crate::middleware::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

/// POST /auth/registration/
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegistrationForm>,
) -> AppResult<HttpResponse> {
    let form = body.into_inner();
    let username = form.username.trim().to_string();

    let mut errors = form.validate().err().unwrap_or_default();
    if !errors.has_field("username") && username_taken(&state, &username, None).await? {
        errors.add("username", "A user with that username already exists.");
    }
    errors.into_result()?;

    let password_hash = state.passwords.hash(&form.password1)?;
    let user = state.users.insert(User::new(username, password_hash)).await?;
    tracing::info!(user_id = %user.id, "User registered");

    Ok(urls::see_other(urls::index()))
}

/// GET /auth/login/
pub async fn login_form(query: web::Query<NextQuery>) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::ok(LoginPageResponse {
        fields: vec!["username".to_string(), "password".to_string()],
        next: query.into_inner().next,
    }))
}

/// POST /auth/login/
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginForm>,
) -> AppResult<HttpResponse> {
    let form = body.into_inner();
    form.validate()?;

    let user = state
        .users
        .find_by_username(form.username.trim())
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    if !state.passwords.verify(&form.password, &user.password_hash)? {
        tracing::debug!(user_id = %user.id, "Rejected login");
        return Err(AuthError::InvalidCredentials.into());
    }

    let token = state.tokens.issue_token(&user)?;
    let expires_in = state.tokens.lifetime_seconds();

    let cookie = Cookie::build(TOKEN_COOKIE, token.clone())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::seconds(expires_in))
        .finish();

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(HttpResponse::Ok().cookie(cookie).json(ApiResponse::ok(AuthResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: expires_in.max(0) as u64,
        username: user.username,
    })))
}

/// POST /auth/logout/
pub async fn logout() -> HttpResponse {
    let mut cookie = Cookie::build(TOKEN_COOKIE, "").path("/").finish();
    cookie.make_removal();

    HttpResponse::Ok()
        .cookie(cookie)
        .json(ApiResponse::ok_with_message((), "You have been logged out."))
}
