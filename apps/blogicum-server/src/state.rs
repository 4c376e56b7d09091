//! Application state - shared across all handlers.

use std::sync::Arc;

use blogicum_core::ports::{
    CategoryRepository, CommentRepository, LocationRepository, PasswordService, PostRepository,
    TokenService, UserRepository,
};
use blogicum_infra::{Argon2PasswordService, InMemoryDatabase, JwtTokenService};

#[cfg(feature = "postgres")]
use blogicum_infra::database::{
    DatabaseConnections, PostgresCategoryRepository, PostgresCommentRepository,
    PostgresLocationRepository, PostgresPostRepository, PostgresUserRepository,
};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub locations: Arc<dyn LocationRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
    pub posts_per_page: u64,
    #[cfg(feature = "postgres")]
    pub db: Option<Arc<DatabaseConnections>>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(config.jwt.clone()));
        let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());

        #[cfg(feature = "postgres")]
        {
            if let Some(db_config) = &config.database {
                match DatabaseConnections::init(db_config).await {
                    Ok(connections) => {
                        let conn = Arc::new(connections);
                        tracing::info!("Application state initialized (PostgreSQL)");
                        return Self {
                            users: Arc::new(PostgresUserRepository::new(conn.main.clone())),
                            categories: Arc::new(PostgresCategoryRepository::new(conn.main.clone())),
                            locations: Arc::new(PostgresLocationRepository::new(conn.main.clone())),
                            posts: Arc::new(PostgresPostRepository::new(conn.main.clone())),
                            comments: Arc::new(PostgresCommentRepository::new(conn.main.clone())),
                            tokens,
                            passwords,
                            posts_per_page: config.posts_per_page,
                            db: Some(conn),
                        };
                    }
                    Err(e) => {
                        tracing::error!(
                            "Failed to connect to database: {}. Using in-memory fallback.",
                            e
                        );
                    }
                }
            } else {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            }
        }

        #[cfg(not(feature = "postgres"))]
        tracing::info!("Running without postgres feature - using in-memory repositories");

        tracing::info!("Application state initialized (in-memory)");
        Self::in_memory(&InMemoryDatabase::new(), tokens, passwords, config.posts_per_page)
    }

    /// State backed by `store`; every repository shares its tables.
    pub fn in_memory(
        store: &InMemoryDatabase,
        tokens: Arc<dyn TokenService>,
        passwords: Arc<dyn PasswordService>,
        posts_per_page: u64,
    ) -> Self {
        Self {
            users: Arc::new(store.users()),
            categories: Arc::new(store.categories()),
            locations: Arc::new(store.locations()),
            posts: Arc::new(store.posts()),
            comments: Arc::new(store.comments()),
            tokens,
            passwords,
            posts_per_page,
            #[cfg(feature = "postgres")]
            db: None,
        }
    }
}
