//! Session tokens signed with a shared secret.

use chrono::{TimeDelta, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use blogicum_core::domain::User;
use blogicum_core::ports::{AuthError, TokenClaims, TokenService};

const DEFAULT_SECRET: &str = "change-me-in-production";
const DEFAULT_ISSUER: &str = "blogicum";
const DEFAULT_EXPIRATION_HOURS: i64 = 24;

/// Signing secret, token lifetime and issuer.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_hours: i64,
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: DEFAULT_SECRET.to_string(),
            expiration_hours: DEFAULT_EXPIRATION_HOURS,
            issuer: DEFAULT_ISSUER.to_string(),
        }
    }
}

impl JwtConfig {
    /// Read `JWT_SECRET`, `JWT_EXPIRATION_HOURS` and `JWT_ISSUER`, keeping
    /// the defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let config = Self {
            secret: std::env::var("JWT_SECRET").unwrap_or(defaults.secret),
            expiration_hours: std::env::var("JWT_EXPIRATION_HOURS")
                .ok()
                .and_then(|hours| hours.parse().ok())
                .unwrap_or(defaults.expiration_hours),
            issuer: std::env::var("JWT_ISSUER").unwrap_or(defaults.issuer),
        };

        if config.secret == DEFAULT_SECRET {
            let production = matches!(
                std::env::var("RUST_ENV").as_deref(),
                Ok("production" | "prod")
            );
            if production {
                tracing::error!("JWT_SECRET is unset in production; sessions can be forged");
            } else {
                tracing::warn!("JWT_SECRET is unset, signing sessions with the development secret");
            }
        }

        config
    }
}

/// Payload as it travels inside the token.
#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    sub: Uuid,
    username: String,
    roles: Vec<String>,
    exp: i64,
    iat: i64,
    iss: String,
}

impl From<SessionClaims> for TokenClaims {
    fn from(claims: SessionClaims) -> Self {
        Self {
            user_id: claims.sub,
            username: claims.username,
            roles: claims.roles,
            exp: claims.exp,
        }
    }
}

/// HS256 session tokens.
pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    config: JwtConfig,
}

impl JwtTokenService {
    pub fn new(config: JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);

        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            config,
        }
    }
}

impl TokenService for JwtTokenService {
    fn issue_token(&self, user: &User) -> Result<String, AuthError> {
        let issued_at = Utc::now();
        let claims = SessionClaims {
            sub: user.id,
            username: user.username.clone(),
            roles: user.roles(),
            exp: (issued_at + TimeDelta::hours(self.config.expiration_hours)).timestamp(),
            iat: issued_at.timestamp(),
            iss: self.config.issuer.clone(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }

    fn verify_token(&self, token: &str) -> Result<TokenClaims, AuthError> {
        decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims.into())
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken(e.to_string()),
            })
    }

    fn lifetime_seconds(&self) -> i64 {
        self.config.expiration_hours * 3600
    }
}
