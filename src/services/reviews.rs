use crate::{
    error::{AppError, AppResult},
    models::{Review, ReviewWithAuthor, ScoredMood},
};
use chrono::Utc;
use serde::Deserialize;
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::collections::HashMap;

pub const MAX_INTENSITY: i64 = 5;
pub const MAX_RATING: f64 = 10.0;

/// A review submission: overall rating, comment and one intensity per mood.
/// Moods absent from the map are treated as 0 (cleared).
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewInput {
    pub rating: f64,
    pub comment: String,
    #[serde(default)]
    pub mood_scores: HashMap<i64, i64>,
}

fn validate(input: &ReviewInput) -> AppResult<()> {
    if !(0.0..=MAX_RATING).contains(&input.rating) {
        return Err(AppError::InvalidInput(format!(
            "Rating must be between 0 and {}",
            MAX_RATING
        )));
    }
    if input.comment.trim().is_empty() {
        return Err(AppError::InvalidInput("Comment cannot be empty".to_string()));
    }
    for (&mood_id, &intensity) in &input.mood_scores {
        if !(0..=MAX_INTENSITY).contains(&intensity) {
            return Err(AppError::InvalidInput(format!(
                "Intensity for mood {} must be between 0 and {}",
                mood_id, MAX_INTENSITY
            )));
        }
    }
    Ok(())
}

/// Writes the sparse fact table for one review: a positive intensity is
/// created-or-updated, a zero or absent one deletes the row. Runs inside the
/// caller's transaction so the review and its scores land together.
async fn apply_mood_scores(
    tx: &mut Transaction<'_, Sqlite>,
    review_id: i64,
    submitted: &HashMap<i64, i64>,
) -> AppResult<()> {
    let mood_ids: Vec<i64> = sqlx::query_scalar("SELECT id FROM moods ORDER BY id")
        .fetch_all(&mut **tx)
        .await?;

    for mood_id in submitted.keys() {
        if !mood_ids.contains(mood_id) {
            return Err(AppError::NotFound(format!("Mood {} not found", mood_id)));
        }
    }

    for mood_id in mood_ids {
        let intensity = submitted.get(&mood_id).copied().unwrap_or(0);
        if intensity > 0 {
            sqlx::query(
                "INSERT INTO mood_scores (review_id, mood_id, intensity)
                 VALUES (?, ?, ?)
                 ON CONFLICT(review_id, mood_id) DO UPDATE SET intensity = excluded.intensity",
            )
            .bind(review_id)
            .bind(mood_id)
            .bind(intensity)
            .execute(&mut **tx)
            .await?;
        } else {
            sqlx::query("DELETE FROM mood_scores WHERE review_id = ? AND mood_id = ?")
                .bind(review_id)
                .bind(mood_id)
                .execute(&mut **tx)
                .await?;
        }
    }

    Ok(())
}

/// Creates a review for a locally stored movie. A second review by the same
/// user for the same movie is rejected before anything is written.
pub async fn create_review(
    pool: &SqlitePool,
    user_id: i64,
    movie_id: i64,
    input: &ReviewInput,
) -> AppResult<Review> {
    validate(input)?;

    let existing: Option<i64> =
        sqlx::query_scalar("SELECT id FROM reviews WHERE user_id = ? AND movie_id = ?")
            .bind(user_id)
            .bind(movie_id)
            .fetch_optional(pool)
            .await?;
    if existing.is_some() {
        return Err(AppError::Duplicate(
            "You have already reviewed this movie".to_string(),
        ));
    }

    let mut tx = pool.begin().await?;

    let review_id = sqlx::query(
        "INSERT INTO reviews (user_id, movie_id, rating, comment, created_at)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(user_id)
    .bind(movie_id)
    .bind(input.rating)
    .bind(input.comment.trim())
    .bind(Utc::now())
    .execute(&mut *tx)
    .await?
    .last_insert_rowid();

    apply_mood_scores(&mut tx, review_id, &input.mood_scores).await?;

    tx.commit().await?;

    tracing::info!(user_id, movie_id, review_id, "Review created");

    get_review(pool, review_id).await
}

/// Updates a review; only the owner may edit
pub async fn update_review(
    pool: &SqlitePool,
    user_id: i64,
    review_id: i64,
    input: &ReviewInput,
) -> AppResult<Review> {
    validate(input)?;

    let review = get_review(pool, review_id).await?;
    if review.user_id != user_id {
        return Err(AppError::Forbidden(
            "You can only edit your own review".to_string(),
        ));
    }

    let mut tx = pool.begin().await?;

    sqlx::query("UPDATE reviews SET rating = ?, comment = ? WHERE id = ?")
        .bind(input.rating)
        .bind(input.comment.trim())
        .bind(review_id)
        .execute(&mut *tx)
        .await?;

    apply_mood_scores(&mut tx, review_id, &input.mood_scores).await?;

    tx.commit().await?;

    get_review(pool, review_id).await
}

/// Deletes a review; the owner may always delete, admins may moderate any
pub async fn delete_review(
    pool: &SqlitePool,
    user_id: i64,
    is_admin: bool,
    review_id: i64,
) -> AppResult<()> {
    let review = get_review(pool, review_id).await?;
    if review.user_id != user_id && !is_admin {
        return Err(AppError::Forbidden(
            "You can only delete your own review".to_string(),
        ));
    }

    sqlx::query("DELETE FROM reviews WHERE id = ?")
        .bind(review_id)
        .execute(pool)
        .await?;

    tracing::info!(review_id, deleted_by = user_id, "Review deleted");

    Ok(())
}

pub async fn get_review(pool: &SqlitePool, review_id: i64) -> AppResult<Review> {
    sqlx::query_as::<_, Review>(
        "SELECT id, user_id, movie_id, rating, comment, created_at
         FROM reviews WHERE id = ?",
    )
    .bind(review_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Review {} not found", review_id)))
}

/// Reviews for a movie page, newest first, each with its mood scores
pub async fn reviews_for_movie(
    pool: &SqlitePool,
    movie_id: i64,
) -> AppResult<Vec<(ReviewWithAuthor, Vec<ScoredMood>)>> {
    let reviews = sqlx::query_as::<_, ReviewWithAuthor>(
        "SELECT r.id, r.user_id, u.username, r.rating, r.comment, r.created_at
         FROM reviews r
         JOIN users u ON u.id = r.user_id
         WHERE r.movie_id = ?
         ORDER BY r.created_at DESC",
    )
    .bind(movie_id)
    .fetch_all(pool)
    .await?;

    let mut result = Vec::with_capacity(reviews.len());
    for review in reviews {
        let moods = mood_scores_for_review(pool, review.id).await?;
        result.push((review, moods));
    }

    Ok(result)
}

pub async fn mood_scores_for_review(
    pool: &SqlitePool,
    review_id: i64,
) -> AppResult<Vec<ScoredMood>> {
    let moods = sqlx::query_as::<_, ScoredMood>(
        "SELECT ms.mood_id, mo.name, ms.intensity
         FROM mood_scores ms
         JOIN moods mo ON mo.id = ms.mood_id
         WHERE ms.review_id = ?
         ORDER BY mo.id",
    )
    .bind(review_id)
    .fetch_all(pool)
    .await?;

    Ok(moods)
}

/// Mean overall rating from local reviews, if the movie has any
pub async fn average_rating(pool: &SqlitePool, movie_id: i64) -> AppResult<Option<f64>> {
    let avg: Option<f64> = sqlx::query_scalar("SELECT AVG(rating) FROM reviews WHERE movie_id = ?")
        .bind(movie_id)
        .fetch_one(pool)
        .await?;

    Ok(avg)
}
