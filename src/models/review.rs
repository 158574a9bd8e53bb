use chrono::{DateTime, Utc};
use serde::Serialize;

/// A user's review of one movie; at most one per (user, movie)
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Review {
    pub id: i64,
    pub user_id: i64,
    pub movie_id: i64,
    /// Overall rating, 0 to 10
    pub rating: f64,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// Review joined with its author, as listed on movie pages
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ReviewWithAuthor {
    pub id: i64,
    pub user_id: i64,
    pub username: String,
    pub rating: f64,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// Mood score joined with its mood name for display
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ScoredMood {
    pub mood_id: i64,
    pub name: String,
    pub intensity: i64,
}

/// Review joined with its movie, as listed on profile pages
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct UserReview {
    pub id: i64,
    pub tmdb_id: i64,
    pub title: String,
    pub poster_url: Option<String>,
    pub rating: f64,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}
