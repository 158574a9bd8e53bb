use crate::{
    error::{AppError, AppResult},
    middleware::OptionalUser,
    models::{emoji_for, CatalogMovie, Genre, MoodSummary, Movie, ReviewWithAuthor},
    services::{catalog, library, reviews},
    AppState,
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Default span of the release calendar when no bounds are given
const CALENDAR_DAYS: i64 = 30;

#[derive(Debug, Serialize)]
pub struct HomeResponse {
    pub moods: Vec<MoodSummary>,
    pub popular: Vec<CatalogMovie>,
}

/// Landing data: the mood picker and the popular shelf
pub async fn home(State(state): State<AppState>) -> AppResult<Json<HomeResponse>> {
    let moods = all_moods(&state).await?;
    let popular = catalog::popular(state.catalog.clone()).await;

    Ok(Json(HomeResponse { moods, popular }))
}

async fn all_moods(state: &AppState) -> AppResult<Vec<MoodSummary>> {
    let moods = sqlx::query_as::<_, crate::models::Mood>("SELECT id, name FROM moods ORDER BY id")
        .fetch_all(&state.db)
        .await?;

    Ok(moods.into_iter().map(MoodSummary::from).collect())
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub mood: Option<i64>,
    pub genre: Option<i64>,
    pub year: Option<i32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case", tag = "source", content = "movies")]
pub enum SearchResponse {
    Local(Vec<Movie>),
    Catalog(Vec<CatalogMovie>),
}

/// Search: a mood filter searches the local store (only reviewed movies can
/// carry mood scores); everything else goes to the catalog
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<SearchResponse>> {
    if let Some(mood_id) = params.mood {
        let movies = catalog::local_movies_for_mood(
            &state.db,
            mood_id,
            params.q.as_deref(),
            params.year,
        )
        .await?;
        return Ok(Json(SearchResponse::Local(movies)));
    }

    let movies = catalog::search(
        state.catalog.clone(),
        params.q.as_deref(),
        params.genre,
        params.year,
    )
    .await;

    Ok(Json(SearchResponse::Catalog(movies)))
}

pub async fn genres(State(state): State<AppState>) -> Json<Vec<Genre>> {
    Json(catalog::genres(state.catalog.clone()).await)
}

#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CalendarResponse {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub movies: Vec<CatalogMovie>,
}

/// Regional releases in a date window; absent or malformed bounds fall back
/// to the next thirty days
pub async fn calendar(
    State(state): State<AppState>,
    Query(params): Query<CalendarQuery>,
) -> Json<CalendarResponse> {
    let today = Utc::now().date_naive();
    let start = params
        .start
        .as_deref()
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
        .unwrap_or(today);
    let end = params
        .end
        .as_deref()
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
        .unwrap_or(start + Duration::days(CALENDAR_DAYS));

    let movies = catalog::releases_between(state.catalog.clone(), start, end).await;

    Json(CalendarResponse { start, end, movies })
}

#[derive(Debug, Serialize)]
pub struct MoodTag {
    pub mood_id: i64,
    pub name: String,
    pub emoji: &'static str,
    pub intensity: i64,
}

#[derive(Debug, Serialize)]
pub struct ReviewEntry {
    #[serde(flatten)]
    pub review: ReviewWithAuthor,
    pub moods: Vec<MoodTag>,
    pub is_owner: bool,
}

#[derive(Debug, Serialize)]
pub struct DetailResponse {
    pub movie: crate::models::CatalogMovieDetails,
    pub local_rating: Option<f64>,
    pub reviews: Vec<ReviewEntry>,
    pub is_favorited: bool,
    pub is_bookmarked: bool,
    pub my_review_id: Option<i64>,
}

/// Catalog detail merged with local review data and the caller's flags
pub async fn detail(
    State(state): State<AppState>,
    OptionalUser(viewer): OptionalUser,
    Path(tmdb_id): Path<i64>,
) -> AppResult<Json<DetailResponse>> {
    let movie = catalog::details(state.catalog.clone(), tmdb_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Movie {} not found", tmdb_id)))?;

    let viewer_id = viewer.as_ref().map(|u| u.id);
    let local = catalog::find_movie(&state.db, tmdb_id).await?;

    let mut local_rating = None;
    let mut entries = Vec::new();
    let mut is_favorited = false;
    let mut is_bookmarked = false;
    let mut my_review_id = None;

    if let Some(local) = &local {
        local_rating = reviews::average_rating(&state.db, local.id).await?;

        for (review, moods) in reviews::reviews_for_movie(&state.db, local.id).await? {
            let is_owner = viewer_id == Some(review.user_id);
            if is_owner {
                my_review_id = Some(review.id);
            }
            let moods = moods
                .into_iter()
                .map(|m| MoodTag {
                    mood_id: m.mood_id,
                    emoji: emoji_for(&m.name),
                    name: m.name,
                    intensity: m.intensity,
                })
                .collect();
            entries.push(ReviewEntry {
                review,
                moods,
                is_owner,
            });
        }

        if let Some(viewer_id) = viewer_id {
            is_favorited =
                library::is_linked(&state.db, library::LinkKind::Favorite, viewer_id, local.id)
                    .await?;
            is_bookmarked =
                library::is_linked(&state.db, library::LinkKind::Bookmark, viewer_id, local.id)
                    .await?;
        }
    }

    Ok(Json(DetailResponse {
        movie,
        local_rating,
        reviews: entries,
        is_favorited,
        is_bookmarked,
        my_review_id,
    }))
}
