//! Canonical paths and redirect responses.

use actix_web::{HttpResponse, http::header};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use uuid::Uuid;

use blogicum_shared::ApiResponse;
use blogicum_shared::dto::RedirectResponse;

/// Characters left as-is in a `next` value; `/` keeps paths readable.
const NEXT_SAFE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

pub fn index() -> String {
    "/".to_string()
}

pub fn post_detail(post_id: Uuid) -> String {
    format!("/posts/{post_id}/")
}

pub fn profile(username: &str) -> String {
    format!("/profile/{username}/")
}

/// Login page that sends the user back to `next` (path and query) afterwards.
pub fn login(next: &str) -> String {
    format!("/auth/login/?next={}", utf8_percent_encode(next, NEXT_SAFE))
}

fn redirect(mut builder: actix_web::HttpResponseBuilder, location: String) -> HttpResponse {
    builder
        .insert_header((header::LOCATION, location.clone()))
        .json(ApiResponse::ok(RedirectResponse { location }))
}

/// `302 Found`, used when answering a GET.
pub fn found(location: String) -> HttpResponse {
    redirect(HttpResponse::Found(), location)
}

/// `303 See Other`, used after a POST.
pub fn see_other(location: String) -> HttpResponse {
    redirect(HttpResponse::SeeOther(), location)
}
