use crate::{
    error::{AppError, AppResult},
    middleware::AdminUser,
    models::Mood,
    AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

const DASHBOARD_RECENT: i64 = 5;

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct RecentReview {
    pub id: i64,
    pub username: String,
    pub movie_title: String,
    pub rating: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub movie_count: i64,
    pub review_count: i64,
    pub user_count: i64,
    pub mood_count: i64,
    pub recent_reviews: Vec<RecentReview>,
}

/// Store counts and the latest reviews, for moderation
pub async fn dashboard(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> AppResult<Json<DashboardResponse>> {
    let movie_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM movies")
        .fetch_one(&state.db)
        .await?;
    let review_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reviews")
        .fetch_one(&state.db)
        .await?;
    let user_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&state.db)
        .await?;
    let mood_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM moods")
        .fetch_one(&state.db)
        .await?;

    let recent_reviews = sqlx::query_as::<_, RecentReview>(
        "SELECT r.id, u.username, m.title AS movie_title, r.rating, r.created_at
         FROM reviews r
         JOIN users u ON u.id = r.user_id
         JOIN movies m ON m.id = r.movie_id
         ORDER BY r.created_at DESC
         LIMIT ?",
    )
    .bind(DASHBOARD_RECENT)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(DashboardResponse {
        movie_count,
        review_count,
        user_count,
        mood_count,
        recent_reviews,
    }))
}

#[derive(Debug, Deserialize)]
pub struct MovieFilter {
    pub q: Option<String>,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct AdminMovie {
    pub id: i64,
    pub tmdb_id: i64,
    pub title: String,
    pub poster_url: Option<String>,
    pub review_count: i64,
}

/// Stored movies with their review counts, newest id first
pub async fn movies(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Query(filter): Query<MovieFilter>,
) -> AppResult<Json<Vec<AdminMovie>>> {
    let mut sql = String::from(
        "SELECT m.id, m.tmdb_id, m.title, m.poster_url, COUNT(r.id) AS review_count
         FROM movies m
         LEFT JOIN reviews r ON r.movie_id = m.id",
    );
    let q = filter.q.as_deref().map(str::trim).filter(|q| !q.is_empty());
    if q.is_some() {
        sql.push_str(" WHERE m.title LIKE ?");
    }
    sql.push_str(" GROUP BY m.id ORDER BY m.id DESC");

    let mut query = sqlx::query_as::<_, AdminMovie>(&sql);
    if let Some(q) = q {
        query = query.bind(format!("%{}%", q));
    }

    Ok(Json(query.fetch_all(&state.db).await?))
}

/// Removes a stored movie; reviews, scores and links cascade away
pub async fn delete_movie(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(movie_id): Path<i64>,
) -> AppResult<Json<Value>> {
    let deleted = sqlx::query("DELETE FROM movies WHERE id = ?")
        .bind(movie_id)
        .execute(&state.db)
        .await?
        .rows_affected();
    if deleted == 0 {
        return Err(AppError::NotFound(format!("Movie {} not found", movie_id)));
    }

    tracing::info!(movie_id, admin = %admin.username, "Movie removed");

    Ok(Json(json!({ "status": "deleted" })))
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct MoodUsage {
    pub id: i64,
    pub name: String,
    pub score_count: i64,
}

pub async fn moods(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> AppResult<Json<Vec<MoodUsage>>> {
    let moods = sqlx::query_as::<_, MoodUsage>(
        "SELECT mo.id, mo.name, COUNT(ms.mood_id) AS score_count
         FROM moods mo
         LEFT JOIN mood_scores ms ON ms.mood_id = mo.id
         GROUP BY mo.id
         ORDER BY mo.id",
    )
    .fetch_all(&state.db)
    .await?;

    Ok(Json(moods))
}

#[derive(Debug, Deserialize)]
pub struct MoodInput {
    pub name: String,
}

pub async fn create_mood(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Json(input): Json<MoodInput>,
) -> AppResult<(StatusCode, Json<Mood>)> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(AppError::InvalidInput("Mood name cannot be empty".to_string()));
    }

    let taken: Option<i64> = sqlx::query_scalar("SELECT id FROM moods WHERE name = ?")
        .bind(name)
        .fetch_optional(&state.db)
        .await?;
    if taken.is_some() {
        return Err(AppError::Duplicate(format!("Mood '{}' already exists", name)));
    }

    let mood_id = sqlx::query("INSERT INTO moods (name) VALUES (?)")
        .bind(name)
        .execute(&state.db)
        .await?
        .last_insert_rowid();

    let mood = sqlx::query_as::<_, Mood>("SELECT id, name FROM moods WHERE id = ?")
        .bind(mood_id)
        .fetch_one(&state.db)
        .await?;

    Ok((StatusCode::CREATED, Json(mood)))
}

pub async fn update_mood(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(mood_id): Path<i64>,
    Json(input): Json<MoodInput>,
) -> AppResult<Json<Mood>> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(AppError::InvalidInput("Mood name cannot be empty".to_string()));
    }

    let taken: Option<i64> = sqlx::query_scalar("SELECT id FROM moods WHERE name = ? AND id != ?")
        .bind(name)
        .bind(mood_id)
        .fetch_optional(&state.db)
        .await?;
    if taken.is_some() {
        return Err(AppError::Duplicate(format!("Mood '{}' already exists", name)));
    }

    let updated = sqlx::query("UPDATE moods SET name = ? WHERE id = ?")
        .bind(name)
        .bind(mood_id)
        .execute(&state.db)
        .await?
        .rows_affected();
    if updated == 0 {
        return Err(AppError::NotFound(format!("Mood {} not found", mood_id)));
    }

    let mood = sqlx::query_as::<_, Mood>("SELECT id, name FROM moods WHERE id = ?")
        .bind(mood_id)
        .fetch_one(&state.db)
        .await?;

    Ok(Json(mood))
}

/// Removes a mood and, through cascade, every score tagged with it
pub async fn delete_mood(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(mood_id): Path<i64>,
) -> AppResult<Json<Value>> {
    let deleted = sqlx::query("DELETE FROM moods WHERE id = ?")
        .bind(mood_id)
        .execute(&state.db)
        .await?
        .rows_affected();
    if deleted == 0 {
        return Err(AppError::NotFound(format!("Mood {} not found", mood_id)));
    }

    tracing::info!(mood_id, admin = %admin.username, "Mood removed");

    Ok(Json(json!({ "status": "deleted" })))
}
