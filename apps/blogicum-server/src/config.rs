//! Application configuration loaded from environment variables.

use std::env;

use blogicum_core::pagination::DEFAULT_PAGE_SIZE;
use blogicum_infra::JwtConfig;
use blogicum_infra::database::DatabaseConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    pub posts_per_page: u64,
    pub jwt: JwtConfig,
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
            url,
            max_connections: parse_var("DB_MAX_CONNECTIONS", 100),
            min_connections: parse_var("DB_MIN_CONNECTIONS", 10),
        });

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT", 8080),
            database,
            posts_per_page: parse_var("POSTS_PER_PAGE", DEFAULT_PAGE_SIZE).max(1),
            jwt: JwtConfig::from_env(),
        }
    }
}
