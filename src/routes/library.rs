use crate::{
    error::AppResult,
    middleware::{CurrentUser, OptionalUser},
    models::{CustomList, ListSummary, Movie},
    services::{catalog, library, library::LinkKind},
    AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Idempotent favorite toggle; responds with the resulting state
pub async fn toggle_favorite(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(tmdb_id): Path<i64>,
) -> AppResult<Json<Value>> {
    toggle(state, user.id, tmdb_id, LinkKind::Favorite).await
}

pub async fn toggle_bookmark(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(tmdb_id): Path<i64>,
) -> AppResult<Json<Value>> {
    toggle(state, user.id, tmdb_id, LinkKind::Bookmark).await
}

async fn toggle(
    state: AppState,
    user_id: i64,
    tmdb_id: i64,
    kind: LinkKind,
) -> AppResult<Json<Value>> {
    let movie = catalog::ensure_movie(&state.db, state.catalog.clone(), tmdb_id).await?;
    let outcome = library::toggle(&state.db, kind, user_id, movie.id).await?;

    Ok(Json(json!({ "status": outcome })))
}

// ============================================================================
// Custom Lists
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ListInput {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub is_public: bool,
}

pub async fn my_lists(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Vec<ListSummary>>> {
    let lists = library::lists_for_user(&state.db, user.id, false).await?;

    Ok(Json(lists))
}

pub async fn create_list(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<ListInput>,
) -> AppResult<(StatusCode, Json<CustomList>)> {
    let list = library::create_list(
        &state.db,
        user.id,
        &input.name,
        input.description.as_deref(),
        input.is_public,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(list)))
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    #[serde(flatten)]
    pub list: CustomList,
    pub movies: Vec<Movie>,
}

pub async fn show_list(
    State(state): State<AppState>,
    OptionalUser(viewer): OptionalUser,
    Path(list_id): Path<i64>,
) -> AppResult<Json<ListResponse>> {
    let viewer_id = viewer.map(|u| u.id);
    let (list, movies) = library::get_list(&state.db, viewer_id, list_id).await?;

    Ok(Json(ListResponse { list, movies }))
}

pub async fn update_list(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(list_id): Path<i64>,
    Json(input): Json<ListInput>,
) -> AppResult<Json<CustomList>> {
    let list = library::update_list(
        &state.db,
        user.id,
        list_id,
        &input.name,
        input.description.as_deref(),
        input.is_public,
    )
    .await?;

    Ok(Json(list))
}

pub async fn delete_list(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(list_id): Path<i64>,
) -> AppResult<Json<Value>> {
    library::delete_list(&state.db, user.id, list_id).await?;

    Ok(Json(json!({ "status": "deleted" })))
}

/// Toggles a movie's membership in one of the caller's lists
pub async fn toggle_list_movie(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((list_id, tmdb_id)): Path<(i64, i64)>,
) -> AppResult<Json<Value>> {
    let movie = catalog::ensure_movie(&state.db, state.catalog.clone(), tmdb_id).await?;
    let outcome = library::toggle_list_movie(&state.db, user.id, list_id, movie.id).await?;

    Ok(Json(json!({ "status": outcome })))
}
