//! Authentication extractors.
//!
//! A token is read from the `Authorization: Bearer` header or, failing that,
//! from the session cookie set at login.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use std::future::{Ready, ready};

use blogicum_core::ports::{AuthError, TokenClaims};

use crate::handlers::urls;
use crate::state::AppState;

/// Name of the cookie carrying the session token.
pub const TOKEN_COOKIE: &str = "blogicum_token";

/// The signed-in user, taken from a verified session token.
///
/// Anonymous requests to a handler taking `Identity` are redirected to the
/// login page with `next` pointing back at the requested path.
#[derive(Debug, Clone)]
pub struct Identity(TokenClaims);

impl std::ops::Deref for Identity {
    type Target = TokenClaims;

    fn deref(&self) -> &TokenClaims {
        &self.0
    }
}

/// Authentication failure; answered with a redirect to the login page.
#[derive(Debug, thiserror::Error)]
#[error("{cause}")]
pub struct AuthenticationError {
    pub cause: AuthError,
    /// Path to come back to after signing in.
    pub next: String,
}

impl actix_web::ResponseError for AuthenticationError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        actix_web::http::StatusCode::FOUND
    }

    fn error_response(&self) -> actix_web::HttpResponse {
        tracing::debug!(cause = %self.cause, next = %self.next, "Redirecting to login");
        urls::found(urls::login(&self.next))
    }
}

/// Pull the raw token out of the request, header first.
fn token_from_request(req: &HttpRequest) -> Result<String, AuthError> {
    if let Some(value) = req.headers().get(header::AUTHORIZATION) {
        let auth_str = value
            .to_str()
            .map_err(|_| AuthError::InvalidToken("Invalid authorization header".to_string()))?;

        return auth_str
            .strip_prefix("Bearer ")
            .map(str::to_string)
            .ok_or_else(|| AuthError::InvalidToken("Expected Bearer token".to_string()));
    }

    req.cookie(TOKEN_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(AuthError::MissingToken)
}

fn authenticate(req: &HttpRequest) -> Result<Identity, AuthError> {
    let state = req.app_data::<web::Data<AppState>>().ok_or_else(|| {
        tracing::error!("AppState not found in app data");
        AuthError::InvalidToken("Server configuration error".to_string())
    })?;

    let token = token_from_request(req)?;
    state.tokens.verify_token(&token).map(Identity)
}

/// Path plus query string of `req`, for sending the user back after login.
fn requested_path(req: &HttpRequest) -> String {
    req.uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| req.path().to_string())
}

impl FromRequest for Identity {
    type Error = AuthenticationError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req).map_err(|cause| AuthenticationError {
            cause,
            next: requested_path(req),
        }))
    }
}

/// `Identity` for pages that also serve anonymous readers.
pub struct OptionalIdentity(pub Option<Identity>);

impl OptionalIdentity {
    /// The viewer's user id, if signed in.
    pub fn user_id(&self) -> Option<uuid::Uuid> {
        self.0.as_ref().map(|i| i.user_id)
    }
}

impl FromRequest for OptionalIdentity {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(OptionalIdentity(authenticate(req).ok())))
    }
}
