//! Session tokens and password hashing.

use uuid::Uuid;

use crate::domain::{ROLE_STAFF, User};

/// What a verified session token says about its bearer.
///
/// Username and roles are a snapshot taken at login; handlers that need
/// the current profile reload the user by `user_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    pub user_id: Uuid,
    pub username: String,
    pub roles: Vec<String>,
    /// Unix timestamp after which the token is rejected.
    pub exp: i64,
}

impl TokenClaims {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn is_staff(&self) -> bool {
        self.has_role(ROLE_STAFF)
    }
}

/// Issues and verifies signed session tokens.
pub trait TokenService: Send + Sync {
    /// Sign a token for `user` carrying their username and roles.
    fn issue_token(&self, user: &User) -> Result<String, AuthError>;

    /// Check signature, issuer and expiry, then return the claims.
    fn verify_token(&self, token: &str) -> Result<TokenClaims, AuthError>;

    /// How long an issued token stays valid. Also used as the cookie max-age.
    fn lifetime_seconds(&self) -> i64;
}

/// One-way password hashing.
pub trait PasswordService: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// `Ok(false)` on a mismatch; `Err` only when `hash` is malformed.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Wrong username or password")]
    InvalidCredentials,

    #[error("Session expired")]
    TokenExpired,

    #[error("Invalid session token: {0}")]
    InvalidToken(String),

    #[error("Not logged in")]
    MissingToken,

    #[error("Password hashing failed: {0}")]
    Hashing(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staff_claims() {
        let mut user = User::new("leo".into(), "hash".into());
        user.is_staff = true;
        let claims = TokenClaims {
            user_id: user.id,
            username: user.username.clone(),
            roles: user.roles(),
            exp: 0,
        };

        assert!(claims.is_staff());
        assert!(claims.has_role(crate::domain::ROLE_USER));
        assert!(!claims.has_role("admin"));
    }
}
