use crate::{
    error::AppResult,
    middleware::CurrentUser,
    models::Review,
    services::{catalog, reviews, reviews::ReviewInput},
    AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

/// Creates the caller's review for a movie, storing the movie locally first
/// if this is its first interaction
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(tmdb_id): Path<i64>,
    Json(input): Json<ReviewInput>,
) -> AppResult<(StatusCode, Json<Review>)> {
    let movie = catalog::ensure_movie(&state.db, state.catalog.clone(), tmdb_id).await?;
    let review = reviews::create_review(&state.db, user.id, movie.id, &input).await?;

    Ok((StatusCode::CREATED, Json(review)))
}

pub async fn update(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(review_id): Path<i64>,
    Json(input): Json<ReviewInput>,
) -> AppResult<Json<Review>> {
    let review = reviews::update_review(&state.db, user.id, review_id, &input).await?;

    Ok(Json(review))
}

pub async fn remove(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(review_id): Path<i64>,
) -> AppResult<Json<Value>> {
    reviews::delete_review(&state.db, user.id, user.is_admin, review_id).await?;

    Ok(Json(json!({ "status": "deleted" })))
}
