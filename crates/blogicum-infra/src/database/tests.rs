use chrono::Utc;
use sea_orm::{
    DatabaseBackend, DbErr, MockDatabase, MockExecResult, QueryFilter, QueryTrait, SqlErr,
};
use uuid::Uuid;

use blogicum_core::domain::{Category, Post, User};
use blogicum_core::error::RepoError;
use blogicum_core::ports::{BaseRepository, CategoryRepository, CommentRepository, UserRepository};

use crate::database::entity::{category, comment, post, user};
use crate::database::filters;
use crate::database::postgres_base::{map_db_err, map_sql_err};
use crate::database::postgres_repo::{
    PostgresCategoryRepository, PostgresCommentRepository, PostgresPostRepository,
    PostgresUserRepository,
};

fn post_model(id: Uuid, author_id: Uuid) -> post::Model {
    let now = Utc::now();
    post::Model {
        id,
        author_id,
        category_id: None,
        location_id: None,
        title: "Test Post".to_owned(),
        text: "Content".to_owned(),
        pub_date: now.into(),
        is_published: true,
        image: None,
        created_at: now.into(),
    }
}

fn user_model(id: Uuid, username: &str) -> user::Model {
    let now = Utc::now();
    user::Model {
        id,
        username: username.to_owned(),
        email: String::new(),
        first_name: String::new(),
        last_name: String::new(),
        password_hash: "hash".to_owned(),
        is_staff: false,
        created_at: now.into(),
        updated_at: now.into(),
    }
}

#[tokio::test]
async fn test_find_post_by_id() {
    let post_id = Uuid::new_v4();
    let author_id = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![post_model(post_id, author_id)]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let result: Option<Post> = repo.find_by_id(post_id).await.unwrap();

    let post = result.unwrap();
    assert_eq!(post.title, "Test Post");
    assert_eq!(post.id, post_id);
    assert_eq!(post.author_id, author_id);
}

#[tokio::test]
async fn test_find_user_by_username() {
    let user_id = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![user_model(user_id, "leo")]])
        .into_connection();

    let repo = PostgresUserRepository::new(db);
    let user: User = repo.find_by_username("leo").await.unwrap().unwrap();

    assert_eq!(user.id, user_id);
    assert_eq!(user.username, "leo");
}

#[tokio::test]
async fn test_insert_category_returns_stored_row() {
    let category = Category::new("Travel".into(), "Trips".into(), "travel".into());
    let stored = category::Model {
        id: category.id,
        title: category.title.clone(),
        description: category.description.clone(),
        slug: category.slug.clone(),
        is_published: true,
        created_at: category.created_at.into(),
    };

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![stored]])
        .into_connection();

    let repo = PostgresCategoryRepository::new(db);
    let saved = repo.insert(category.clone()).await.unwrap();

    assert_eq!(saved.id, category.id);
    assert_eq!(saved.slug, "travel");
}

#[tokio::test]
async fn test_find_category_by_unknown_slug() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![Vec::<category::Model>::new()])
        .into_connection();

    let repo = PostgresCategoryRepository::new(db);
    assert!(repo.find_by_slug("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete_missing_row_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results(vec![MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let result = BaseRepository::<Post, Uuid>::delete(&repo, Uuid::new_v4()).await;

    assert!(matches!(result, Err(RepoError::NotFound)));
}

#[tokio::test]
async fn test_comments_come_with_their_authors() {
    let post_id = Uuid::new_v4();
    let author_id = Uuid::new_v4();
    let now = Utc::now();
    let row = (
        comment::Model {
            id: Uuid::new_v4(),
            post_id,
            author_id,
            text: "Nice!".to_owned(),
            created_at: now.into(),
        },
        Some(user_model(author_id, "reader")),
    );

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![row]])
        .into_connection();

    let repo = PostgresCommentRepository::new(db);
    let comments = repo.list_for_post(post_id).await.unwrap();

    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].comment.text, "Nice!");
    assert_eq!(comments[0].author.username, "reader");
}

#[test]
fn test_constraint_violations_are_constraint_errors() {
    let dangling = map_sql_err(SqlErr::ForeignKeyConstraintViolation(
        "insert or update on table \"posts\" violates foreign key constraint".to_owned(),
    ));
    assert!(matches!(dangling, RepoError::Constraint(_)));

    let duplicate = map_sql_err(SqlErr::UniqueConstraintViolation(
        "duplicate key value violates unique constraint \"users_username_key\"".to_owned(),
    ));
    assert!(matches!(duplicate, RepoError::Constraint(_)));
}

#[test]
fn test_other_database_errors_are_not_sniffed_from_text() {
    assert!(matches!(
        map_db_err(DbErr::Custom("duplicate entry".to_owned())),
        RepoError::Query(_)
    ));
    assert!(matches!(
        map_db_err(DbErr::RecordNotFound("post".to_owned())),
        RepoError::NotFound
    ));
}

#[test]
fn test_anonymous_visibility_sql() {
    let sql = filters::joined_posts()
        .filter(filters::visibility_condition(None, Utc::now()))
        .build(DatabaseBackend::Postgres)
        .to_string();

    assert!(sql.contains(r#"LEFT JOIN "categories""#));
    assert!(sql.contains(r#"LEFT JOIN "locations""#));
    assert!(sql.contains(r#""posts"."is_published""#));
    assert!(sql.contains(r#""posts"."pub_date" <="#));
    assert!(sql.contains(r#""categories"."id" IS NULL"#));
    assert!(sql.contains(r#""locations"."is_published""#));
    assert!(!sql.contains(r#""posts"."author_id" ="#));
}

#[test]
fn test_viewer_visibility_sql_includes_own_posts() {
    let viewer = Uuid::new_v4();
    let sql = filters::joined_posts()
        .filter(filters::visibility_condition(Some(viewer), Utc::now()))
        .build(DatabaseBackend::Postgres)
        .to_string();

    assert!(sql.contains(r#""posts"."author_id" ="#));
    assert!(sql.contains(&viewer.to_string()));
}
