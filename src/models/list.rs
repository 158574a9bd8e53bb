use chrono::{DateTime, Utc};
use serde::Serialize;

/// A user-curated movie list
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CustomList {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
}

/// List with its movie count, as shown on profile pages
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ListSummary {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub movie_count: i64,
}
