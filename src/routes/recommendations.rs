use crate::{
    error::AppResult,
    models::MoodSummary,
    services::recommendation::{self, ScoredMovie},
    AppState,
};
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub mood: MoodSummary,
    pub movies: Vec<ScoredMovie>,
}

/// Handler for mood recommendations: movies ranked by credibility-weighted
/// mood intensity, one page at most
pub async fn for_mood(
    State(state): State<AppState>,
    Path(mood_id): Path<i64>,
) -> AppResult<Json<RecommendationResponse>> {
    let (mood, movies) =
        recommendation::recommend_for_mood(&state.db, mood_id, state.config.min_mood_votes)
            .await?;

    Ok(Json(RecommendationResponse {
        mood: mood.into(),
        movies,
    }))
}
