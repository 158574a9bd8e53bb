use crate::{
    error::{AppError, AppResult},
    middleware::{bearer_from_headers, CurrentUser},
    models::{ListSummary, Movie, Profile, UserReview},
    services::{accounts, library, library::LinkKind},
    AppState,
};
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

const PROFILE_REVIEWS: i64 = 5;
const PROFILE_SHELF: i64 = 10;

#[derive(Debug, Deserialize)]
pub struct SignupInput {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub profile: Profile,
}

/// Creates an account and signs the caller straight in
pub async fn signup(
    State(state): State<AppState>,
    Json(input): Json<SignupInput>,
) -> AppResult<(StatusCode, Json<SessionResponse>)> {
    let (user, token) = accounts::signup(
        &state.db,
        state.config.session_ttl_seconds,
        &input.username,
        &input.email,
        &input.password,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            token,
            profile: Profile::own(&user),
        }),
    ))
}

#[derive(Debug, Deserialize)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginInput>,
) -> AppResult<Json<SessionResponse>> {
    let (user, token) = accounts::login(
        &state.db,
        state.config.session_ttl_seconds,
        &input.username,
        &input.password,
    )
    .await?;

    Ok(Json(SessionResponse {
        token,
        profile: Profile::own(&user),
    }))
}

/// Ends the presented session
pub async fn logout(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    headers: HeaderMap,
) -> AppResult<Json<Value>> {
    let token = bearer_from_headers(&headers)
        .ok_or_else(|| AppError::Unauthorized("Missing session token".to_string()))?;
    accounts::logout(&state.db, token).await?;

    Ok(Json(json!({ "status": "logged_out" })))
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub profile: Profile,
    pub reviews: Vec<UserReview>,
    pub favorites: Vec<Movie>,
    pub bookmarks: Vec<Movie>,
    pub lists: Vec<ListSummary>,
}

async fn profile_page(
    state: &AppState,
    user_id: i64,
    profile: Profile,
    public_only: bool,
) -> AppResult<ProfileResponse> {
    Ok(ProfileResponse {
        profile,
        reviews: accounts::recent_reviews(&state.db, user_id, PROFILE_REVIEWS).await?,
        favorites: library::linked_movies(&state.db, LinkKind::Favorite, user_id, PROFILE_SHELF)
            .await?,
        bookmarks: library::linked_movies(&state.db, LinkKind::Bookmark, user_id, PROFILE_SHELF)
            .await?,
        lists: library::lists_for_user(&state.db, user_id, public_only).await?,
    })
}

/// The caller's own profile with recent activity
pub async fn my_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<ProfileResponse>> {
    let page = profile_page(&state, user.id, Profile::own(&user), false).await?;

    Ok(Json(page))
}

#[derive(Debug, Deserialize)]
pub struct ProfileUpdate {
    pub email: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

pub async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<ProfileUpdate>,
) -> AppResult<Json<Profile>> {
    let updated = accounts::update_profile(
        &state.db,
        user.id,
        input.email.as_deref(),
        input.bio.as_deref(),
        input.avatar_url.as_deref(),
    )
    .await?;

    Ok(Json(Profile::own(&updated)))
}

/// Another user's public profile; private lists stay hidden
pub async fn public_profile(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<Json<ProfileResponse>> {
    let user = accounts::get_user_by_username(&state.db, &username).await?;
    let page = profile_page(&state, user.id, Profile::public(&user), true).await?;

    Ok(Json(page))
}
