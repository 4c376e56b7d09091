use std::sync::Arc;

use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use chrono::{Duration, Utc};
use serde_json::{Value, json};

use blogicum_core::domain::{Category, Comment, Location, Post, User};
use blogicum_core::ports::{
    BaseRepository, CommentRepository, PasswordService, TokenService, UserRepository,
};
use blogicum_infra::{Argon2PasswordService, InMemoryDatabase, JwtConfig, JwtTokenService};

use super::{configure_routes, not_found};
use crate::state::AppState;

const PER_PAGE: u64 = 10;

struct Fixture {
    store: InMemoryDatabase,
    state: AppState,
}

impl Fixture {
    fn new() -> Self {
        let store = InMemoryDatabase::new();
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(JwtConfig {
            secret: "test-secret".to_string(),
            ..JwtConfig::default()
        }));
        let state = AppState::in_memory(
            &store,
            tokens,
            Arc::new(Argon2PasswordService::new()),
            PER_PAGE,
        );
        Self { store, state }
    }

    async fn user(&self, username: &str) -> User {
        self.store
            .users()
            .insert(User::new(username.to_string(), "unused".to_string()))
            .await
            .unwrap()
    }

    async fn staff(&self, username: &str) -> User {
        let mut user = User::new(username.to_string(), "unused".to_string());
        user.is_staff = true;
        self.store.users().insert(user).await.unwrap()
    }

    async fn post(&self, author: &User, title: &str, tweak: impl FnOnce(&mut Post)) -> Post {
        let mut post = Post::new(
            author.id,
            title.to_string(),
            "Body".to_string(),
            Utc::now() - Duration::hours(1),
        );
        tweak(&mut post);
        self.store.posts().insert(post).await.unwrap()
    }

    async fn category(&self, slug: &str, is_published: bool) -> Category {
        let mut category = Category::new(slug.to_string(), "About".to_string(), slug.to_string());
        category.is_published = is_published;
        self.store.categories().insert(category).await.unwrap()
    }

    async fn location(&self, name: &str, is_published: bool) -> Location {
        let mut location = Location::new(name.to_string());
        location.is_published = is_published;
        self.store.locations().insert(location).await.unwrap()
    }

    fn bearer(&self, user: &User) -> (header::HeaderName, String) {
        let token = self.state.tokens.issue_token(user).unwrap();
        (header::AUTHORIZATION, format!("Bearer {token}"))
    }
}

macro_rules! app {
    ($fixture:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($fixture.state.clone()))
                .configure(configure_routes)
                .default_service(web::to(not_found)),
        )
        .await
    };
}

/// Titles on a serialized page, in order.
fn titles(page: &Value) -> Vec<String> {
    page["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap().to_string())
        .collect()
}

fn location_of<B>(res: &actix_web::dev::ServiceResponse<B>) -> String {
    res.headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string()
}

#[actix_web::test]
async fn test_index_shows_only_publicly_visible_posts() {
    let f = Fixture::new();
    let author = f.user("author").await;
    let hidden_category = f.category("hidden", false).await;
    let hidden_location = f.location("Nowhere", false).await;
    let open_category = f.category("open", true).await;

    f.post(&author, "plain", |_| {}).await;
    f.post(&author, "in open category", |p| p.category_id = Some(open_category.id))
        .await;
    f.post(&author, "draft", |p| p.is_published = false).await;
    f.post(&author, "scheduled", |p| p.pub_date = Utc::now() + Duration::days(1))
        .await;
    f.post(&author, "in hidden category", |p| {
        p.category_id = Some(hidden_category.id)
    })
    .await;
    f.post(&author, "in hidden location", |p| {
        p.location_id = Some(hidden_location.id)
    })
    .await;

    let app = app!(f);
    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/").to_request(),
    )
    .await;

    let mut seen = titles(&body["data"]);
    seen.sort();
    assert_eq!(seen, vec!["in open category", "plain"]);
}

#[actix_web::test]
async fn test_author_sees_own_hidden_posts_in_listings() {
    let f = Fixture::new();
    let author = f.user("author").await;
    let other = f.user("other").await;
    f.post(&author, "public", |_| {}).await;
    f.post(&author, "draft", |p| p.is_published = false).await;

    let app = app!(f);

    let req = test::TestRequest::get()
        .uri("/profile/author/")
        .insert_header(f.bearer(&author))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["posts"]["page"]["count"], 2);
    assert_eq!(body["data"]["profile"]["username"], "author");

    let req = test::TestRequest::get()
        .uri("/profile/author/")
        .insert_header(f.bearer(&other))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(titles(&body["data"]["posts"]), vec!["public"]);
}

#[actix_web::test]
async fn test_index_pagination_is_lenient_and_newest_first() {
    let f = Fixture::new();
    let author = f.user("author").await;
    for i in 0..12 {
        f.post(&author, &format!("post {i:02}"), |p| {
            p.pub_date = Utc::now() - Duration::days(i + 1)
        })
        .await;
    }

    let app = app!(f);

    let body: Value =
        test::call_and_read_body_json(&app, test::TestRequest::get().uri("/").to_request()).await;
    let first = titles(&body["data"]);
    assert_eq!(first.len(), 10);
    assert_eq!(first[0], "post 00");
    assert_eq!(first[9], "post 09");
    assert_eq!(body["data"]["page"]["num_pages"], 2);
    assert_eq!(body["data"]["page"]["has_next"], true);

    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/?page=2").to_request(),
    )
    .await;
    assert_eq!(titles(&body["data"]), vec!["post 10", "post 11"]);

    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/?page=abc").to_request(),
    )
    .await;
    assert_eq!(body["data"]["page"]["number"], 1);

    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/?page=99").to_request(),
    )
    .await;
    assert_eq!(body["data"]["page"]["number"], 2);
    assert_eq!(body["data"]["page"]["has_previous"], true);

    for below_one in ["/?page=0", "/?page=-1"] {
        let body: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get().uri(below_one).to_request(),
        )
        .await;
        assert_eq!(body["data"]["page"]["number"], 2, "{below_one}");
        assert_eq!(titles(&body["data"]), vec!["post 10", "post 11"]);
    }
}

#[actix_web::test]
async fn test_empty_index_has_one_page() {
    let f = Fixture::new();
    let app = app!(f);

    let body: Value =
        test::call_and_read_body_json(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(body["data"]["page"]["num_pages"], 1);
    assert_eq!(body["data"]["page"]["count"], 0);
}

#[actix_web::test]
async fn test_post_detail_respects_visibility_and_orders_comments() {
    let f = Fixture::new();
    let author = f.user("author").await;
    let reader = f.user("reader").await;
    let draft = f.post(&author, "draft", |p| p.is_published = false).await;
    let public = f.post(&author, "public", |_| {}).await;

    let mut older = Comment::new(public.id, reader.id, "first".to_string());
    older.created_at = Utc::now() - Duration::minutes(10);
    let newer = Comment::new(public.id, author.id, "second".to_string());
    f.store.comments().insert(newer).await.unwrap();
    f.store.comments().insert(older).await.unwrap();

    let app = app!(f);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/posts/{}/", draft.id))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/posts/{}/", draft.id))
            .insert_header(f.bearer(&author))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri(&format!("/posts/{}/", public.id))
            .to_request(),
    )
    .await;
    assert_eq!(body["data"]["post"]["comment_count"], 2);
    assert_eq!(body["data"]["comments"][0]["text"], "first");
    assert_eq!(body["data"]["comments"][1]["text"], "second");
    assert_eq!(body["data"]["comments"][0]["author"]["username"], "reader");
}

#[actix_web::test]
async fn test_anonymous_create_redirects_to_login() {
    let f = Fixture::new();
    let app = app!(f);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/posts/create/")
            .set_json(json!({"title": "x"}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location_of(&res), "/auth/login/?next=/posts/create/");

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/admin/posts/?search=rome&page=2")
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(
        location_of(&res),
        "/auth/login/?next=/admin/posts/%3Fsearch%3Drome%26page%3D2"
    );
}

#[actix_web::test]
async fn test_create_post_redirects_to_profile() {
    let f = Fixture::new();
    let author = f.user("author").await;
    let category = f.category("travel", true).await;
    let app = app!(f);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/posts/create/")
            .insert_header(f.bearer(&author))
            .set_json(json!({
                "title": "Trip",
                "text": "Went places",
                "pub_date": Utc::now() - Duration::minutes(1),
                "category": category.id,
            }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location_of(&res), "/profile/author/");

    let body: Value =
        test::call_and_read_body_json(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(titles(&body["data"]), vec!["Trip"]);
    assert_eq!(body["data"]["items"][0]["category"]["slug"], "travel");
}

#[actix_web::test]
async fn test_invalid_post_form_lists_every_field() {
    let f = Fixture::new();
    let author = f.user("author").await;
    let app = app!(f);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/posts/create/")
            .insert_header(f.bearer(&author))
            .set_json(json!({
                "category": uuid::Uuid::new_v4(),
                "image": "../../etc/passwd",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = test::read_body_json(res).await;
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"title"));
    assert!(fields.contains(&"text"));
    assert!(fields.contains(&"pub_date"));
    assert!(fields.contains(&"category"));
    assert!(fields.contains(&"image"));
}

#[actix_web::test]
async fn test_non_author_is_redirected_to_post_detail() {
    let f = Fixture::new();
    let author = f.user("author").await;
    let intruder = f.user("intruder").await;
    let post = f.post(&author, "mine", |_| {}).await;
    let app = app!(f);
    let detail = format!("/posts/{}/", post.id);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/posts/{}/edit/", post.id))
            .insert_header(f.bearer(&intruder))
            .set_json(json!({"title": "hacked", "text": "x", "pub_date": Utc::now()}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location_of(&res), detail);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/posts/{}/delete/", post.id))
            .insert_header(f.bearer(&intruder))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location_of(&res), detail);

    let stored = f.store.posts().find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(stored.title, "mine");
}

#[actix_web::test]
async fn test_author_edits_and_deletes_post() {
    let f = Fixture::new();
    let author = f.user("author").await;
    let post = f.post(&author, "before", |_| {}).await;
    f.store
        .comments()
        .insert(Comment::new(post.id, author.id, "note".to_string()))
        .await
        .unwrap();
    let app = app!(f);

    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri(&format!("/posts/{}/edit/", post.id))
            .insert_header(f.bearer(&author))
            .to_request(),
    )
    .await;
    assert_eq!(body["data"]["form"]["title"], "before");

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/posts/{}/edit/", post.id))
            .insert_header(f.bearer(&author))
            .set_json(json!({"title": "after", "text": "Body", "pub_date": post.pub_date}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location_of(&res), format!("/posts/{}/", post.id));

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/posts/{}/delete/", post.id))
            .insert_header(f.bearer(&author))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location_of(&res), "/profile/author/");

    assert!(f.store.posts().find_by_id(post.id).await.unwrap().is_none());
    assert!(
        f.store
            .comments()
            .list_for_post(post.id)
            .await
            .unwrap()
            .is_empty()
    );
}

#[actix_web::test]
async fn test_commenting_rules() {
    let f = Fixture::new();
    let author = f.user("author").await;
    let reader = f.user("reader").await;
    let draft = f.post(&author, "draft", |p| p.is_published = false).await;
    let public = f.post(&author, "public", |_| {}).await;
    let other = f.post(&author, "other", |_| {}).await;
    let app = app!(f);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/posts/{}/comment/", draft.id))
            .insert_header(f.bearer(&reader))
            .set_json(json!({"text": "hello"}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/posts/{}/comment/", public.id))
            .insert_header(f.bearer(&reader))
            .set_json(json!({"text": "  "}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/posts/{}/comment/", public.id))
            .insert_header(f.bearer(&reader))
            .set_json(json!({"text": "hello"}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location_of(&res), format!("/posts/{}/", public.id));

    let comments = f.store.comments().list_for_post(public.id).await.unwrap();
    assert_eq!(comments.len(), 1);
    let comment = &comments[0].comment;
    assert_eq!(comment.author_id, reader.id);

    // Addressed through the wrong post
    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/posts/{}/edit_comment/{}/", other.id, comment.id))
            .insert_header(f.bearer(&reader))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/posts/{}/delete_comment/{}/", public.id, comment.id))
            .insert_header(f.bearer(&author))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(f.store.comments().list_for_post(public.id).await.unwrap().len(), 1);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/posts/{}/edit_comment/{}/", public.id, comment.id))
            .insert_header(f.bearer(&reader))
            .set_json(json!({"text": "edited"}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    let stored = f.store.comments().find_by_id(comment.id).await.unwrap().unwrap();
    assert_eq!(stored.text, "edited");
}

#[actix_web::test]
async fn test_category_listing() {
    let f = Fixture::new();
    let author = f.user("author").await;
    let travel = f.category("travel", true).await;
    f.category("secret", false).await;
    f.post(&author, "trip", |p| p.category_id = Some(travel.id)).await;
    f.post(&author, "elsewhere", |_| {}).await;
    let app = app!(f);

    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/category/travel/").to_request(),
    )
    .await;
    assert_eq!(body["data"]["category"]["slug"], "travel");
    assert_eq!(titles(&body["data"]["posts"]), vec!["trip"]);

    for uri in ["/category/secret/", "/category/missing/"] {
        let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "{uri}");
    }
}

#[actix_web::test]
async fn test_unknown_profile_is_not_found() {
    let f = Fixture::new();
    let app = app!(f);

    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/profile/ghost/").to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_profile_edit() {
    let f = Fixture::new();
    let owner = f.user("owner").await;
    let other = f.user("other").await;
    let app = app!(f);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/profile/owner/edit/")
            .insert_header(f.bearer(&other))
            .set_json(json!({"username": "stolen"}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location_of(&res), "/profile/owner/");

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/profile/owner/edit/")
            .insert_header(f.bearer(&owner))
            .set_json(json!({"username": "other"}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/profile/owner/edit/")
            .insert_header(f.bearer(&owner))
            .set_json(json!({
                "username": "renamed",
                "first_name": "Ada",
                "last_name": "Lovelace",
                "email": "ada@example.com",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location_of(&res), "/profile/renamed/");

    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/profile/renamed/").to_request(),
    )
    .await;
    assert_eq!(body["data"]["profile"]["display_name"], "Ada Lovelace");
}

#[actix_web::test]
async fn test_registration_login_and_cookie_session() {
    let f = Fixture::new();
    let app = app!(f);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/auth/registration/")
            .set_json(json!({
                "username": "newbie",
                "password1": "s3cret-pass",
                "password2": "s3cret-pass",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location_of(&res), "/");

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/auth/registration/")
            .set_json(json!({
                "username": "newbie",
                "password1": "another-pass",
                "password2": "another-pass",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/auth/login/")
            .set_json(json!({"username": "newbie", "password": "wrong-pass"}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/auth/login/")
            .set_json(json!({"username": "newbie", "password": "s3cret-pass"}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let cookie = res
        .response()
        .cookies()
        .find(|c| c.name() == "blogicum_token")
        .unwrap()
        .into_owned();
    assert!(cookie.http_only().unwrap_or(false));

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/posts/create/")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = test::call_service(
        &app,
        test::TestRequest::post().uri("/auth/logout/").to_request(),
    )
    .await;
    let removal = res
        .response()
        .cookies()
        .find(|c| c.name() == "blogicum_token")
        .unwrap();
    assert_eq!(removal.value(), "");
}

#[actix_web::test]
async fn test_passwords_are_stored_hashed() {
    let f = Fixture::new();
    let app = app!(f);

    test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/auth/registration/")
            .set_json(json!({
                "username": "hashme",
                "password1": "plain-text-pw",
                "password2": "plain-text-pw",
            }))
            .to_request(),
    )
    .await;

    let user = f.store.users().find_by_username("hashme").await.unwrap().unwrap();
    assert_ne!(user.password_hash, "plain-text-pw");
    assert!(
        Argon2PasswordService::new()
            .verify("plain-text-pw", &user.password_hash)
            .unwrap()
    );
}

#[actix_web::test]
async fn test_admin_requires_staff() {
    let f = Fixture::new();
    let user = f.user("user").await;
    let app = app!(f);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/admin/categories/")
            .insert_header(f.bearer(&user))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_admin_manages_categories_and_posts() {
    let f = Fixture::new();
    let staff = f.staff("editor").await;
    let author = f.user("author").await;
    f.post(&author, "Summer in Rome", |p| p.is_published = false).await;
    f.post(&author, "Winter notes", |_| {}).await;
    let app = app!(f);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/admin/categories/")
            .insert_header(f.bearer(&staff))
            .set_json(json!({"title": "Travel", "description": "Trips", "slug": "travel"}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/admin/categories/")
            .insert_header(f.bearer(&staff))
            .set_json(json!({"title": "Again", "description": "Dup", "slug": "travel"}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/admin/posts/?search=rome")
            .insert_header(f.bearer(&staff))
            .to_request(),
    )
    .await;
    assert_eq!(titles(&body["data"]), vec!["Summer in Rome"]);
    let post_id = body["data"]["items"][0]["id"].as_str().unwrap().to_string();

    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri(&format!("/admin/posts/{post_id}/publish/"))
            .insert_header(f.bearer(&staff))
            .set_json(json!({"is_published": true}))
            .to_request(),
    )
    .await;
    assert_eq!(body["data"]["is_published"], true);

    let body: Value =
        test::call_and_read_body_json(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(body["data"]["page"]["count"], 2);
}

#[actix_web::test]
async fn test_deleting_category_keeps_its_posts() {
    let f = Fixture::new();
    let staff = f.staff("editor").await;
    let author = f.user("author").await;
    let travel = f.category("travel", true).await;
    let post = f.post(&author, "trip", |p| p.category_id = Some(travel.id)).await;
    let app = app!(f);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/admin/categories/{}/delete/", travel.id))
            .insert_header(f.bearer(&staff))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);

    let stored = f.store.posts().find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(stored.category_id, None);
}

#[actix_web::test]
async fn test_unknown_route_answers_problem_document() {
    let f = Fixture::new();
    let app = app!(f);

    let res = test::call_service(&app, test::TestRequest::get().uri("/nope/").to_request()).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["status"], 404);
    assert_eq!(body["instance"], "/nope/");
}

#[actix_web::test]
async fn test_malformed_post_id_is_not_found() {
    let f = Fixture::new();
    let app = app!(f);

    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/posts/not-a-uuid/").to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
