//! HTTP handlers and route configuration.

mod admin;
mod auth;
mod categories;
mod comments;
mod health;
mod posts;
mod profile;
pub(crate) mod render;
pub(crate) mod urls;

#[cfg(test)]
mod tests;

use actix_web::{HttpRequest, HttpResponse, web};
use uuid::Uuid;

use blogicum_core::domain::User;
use blogicum_core::ports::BaseRepository;
use blogicum_shared::ErrorResponse;

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// The signed-in user as currently stored; tokens outlive renames.
pub(crate) async fn current_user(state: &AppState, identity: &Identity) -> AppResult<User> {
    state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or(AppError::Unauthorized)
}

/// Whether `username` belongs to someone other than `except`.
pub(crate) async fn username_taken(
    state: &AppState,
    username: &str,
    except: Option<Uuid>,
) -> AppResult<bool> {
    Ok(state
        .users
        .find_by_username(username)
        .await?
        .is_some_and(|u| Some(u.id) != except))
}

/// Fallback for unmatched routes.
pub async fn not_found(req: HttpRequest) -> HttpResponse {
    HttpResponse::NotFound().json(
        ErrorResponse::not_found("The requested page does not exist.").with_instance(req.path()),
    )
}

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(err.to_string()).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(err.to_string()).into()
    }))
    .route("/", web::get().to(posts::index))
        .route("/health/", web::get().to(health::health_check))
        .service(
            web::scope("/posts")
                // Registered before `{post_id}` so "create" is not taken for an id
                .service(
                    web::resource("/create/")
                        .route(web::get().to(posts::create_form))
                        .route(web::post().to(posts::create)),
                )
                .route("/{post_id}/", web::get().to(posts::detail))
                .service(
                    web::resource("/{post_id}/edit/")
                        .route(web::get().to(posts::edit_form))
                        .route(web::post().to(posts::edit)),
                )
                .service(
                    web::resource("/{post_id}/delete/")
                        .route(web::get().to(posts::delete_form))
                        .route(web::post().to(posts::delete)),
                )
                .route("/{post_id}/comment/", web::post().to(comments::add))
                .service(
                    web::resource("/{post_id}/edit_comment/{comment_id}/")
                        .route(web::get().to(comments::edit_form))
                        .route(web::post().to(comments::edit)),
                )
                .service(
                    web::resource("/{post_id}/delete_comment/{comment_id}/")
                        .route(web::get().to(comments::delete_form))
                        .route(web::post().to(comments::delete)),
                ),
        )
        .route(
            "/category/{category_slug}/",
            web::get().to(categories::category_posts),
        )
        .service(
            web::scope("/profile")
                .route("/{username}/", web::get().to(profile::profile))
                .service(
                    web::resource("/{username}/edit/")
                        .route(web::get().to(profile::edit_form))
                        .route(web::post().to(profile::edit)),
                ),
        )
        .service(
            web::scope("/auth")
                .route("/registration/", web::post().to(auth::register))
                .service(
                    web::resource("/login/")
                        .route(web::get().to(auth::login_form))
                        .route(web::post().to(auth::login)),
                )
                .route("/logout/", web::post().to(auth::logout)),
        )
        .service(
            web::scope("/admin")
                .service(
                    web::resource("/categories/")
                        .route(web::get().to(admin::list_categories))
                        .route(web::post().to(admin::create_category)),
                )
                .route("/categories/{id}/", web::post().to(admin::update_category))
                .route(
                    "/categories/{id}/delete/",
                    web::post().to(admin::delete_category),
                )
                .service(
                    web::resource("/locations/")
                        .route(web::get().to(admin::list_locations))
                        .route(web::post().to(admin::create_location)),
                )
                .route("/locations/{id}/", web::post().to(admin::update_location))
                .route(
                    "/locations/{id}/delete/",
                    web::post().to(admin::delete_location),
                )
                .route("/posts/", web::get().to(admin::list_posts))
                .route("/posts/{id}/publish/", web::post().to(admin::set_published)),
        );
}
