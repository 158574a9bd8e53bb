use chrono::{DateTime, Utc};
use serde::Serialize;

/// A registered account
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub password_salt: String,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

/// Profile data returned to clients; never carries credentials
#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    pub username: String,
    /// Present on the owner's own profile only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub joined: DateTime<Utc>,
}

impl Profile {
    /// Profile as shown to its owner
    pub fn own(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            email: Some(user.email.clone()),
            bio: user.bio.clone(),
            avatar_url: user.avatar_url.clone(),
            joined: user.created_at,
        }
    }

    /// Profile as shown to everyone else
    pub fn public(user: &User) -> Self {
        Self {
            email: None,
            ..Self::own(user)
        }
    }
}
