use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role granted to every registered user.
pub const ROLE_USER: &str = "user";
/// Role granted to staff users; required by the admin endpoints.
pub const ROLE_STAFF: &str = "staff";

/// User entity - represents an account in the system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub is_staff: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with generated ID and timestamps.
    pub fn new(username: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username,
            email: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            password_hash,
            is_staff: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Roles embedded into issued tokens.
    pub fn roles(&self) -> Vec<String> {
        let mut roles = vec![ROLE_USER.to_string()];
        if self.is_staff {
            roles.push(ROLE_STAFF.to_string());
        }
        roles
    }

    /// "First Last", falling back to the username when both are blank.
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }

    /// E-mail safe to write into logs: `leo@example.com` becomes `l***@example.com`.
    pub fn masked_email(&self) -> String {
        match self.email.split_once('@') {
            Some((local, domain)) => {
                let first: String = local.chars().take(1).collect();
                format!("{first}***@{domain}")
            }
            None if self.email.is_empty() => String::new(),
            None => "***".to_string(),
        }
    }
}
