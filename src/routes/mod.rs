use crate::{
    middleware::{make_span_with_request_id, request_id_middleware},
    AppState,
};
use axum::{
    http::StatusCode,
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod accounts;
pub mod admin;
pub mod library;
pub mod movies;
pub mod recommendations;
pub mod reviews;

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(axum_middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/home", get(movies::home))
        .route("/movies/search", get(movies::search))
        .route("/movies/genres", get(movies::genres))
        .route("/movies/calendar", get(movies::calendar))
        .route("/movies/:tmdb_id", get(movies::detail))
        .route("/movies/:tmdb_id/reviews", post(reviews::create))
        .route("/movies/:tmdb_id/favorite", post(library::toggle_favorite))
        .route("/movies/:tmdb_id/bookmark", post(library::toggle_bookmark))
        .route("/reviews/:review_id", put(reviews::update).delete(reviews::remove))
        .route("/recommendations/:mood_id", get(recommendations::for_mood))
        .route("/lists", get(library::my_lists).post(library::create_list))
        .route(
            "/lists/:list_id",
            get(library::show_list)
                .put(library::update_list)
                .delete(library::delete_list),
        )
        .route("/lists/:list_id/movies/:tmdb_id", post(library::toggle_list_movie))
        .route("/auth/signup", post(accounts::signup))
        .route("/auth/login", post(accounts::login))
        .route("/auth/logout", post(accounts::logout))
        .route("/profile", get(accounts::my_profile).put(accounts::update_profile))
        .route("/profiles/:username", get(accounts::public_profile))
        .nest("/admin", admin_routes())
}

/// Admin routes; every handler gates on the admin extractor
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(admin::dashboard))
        .route("/movies", get(admin::movies))
        .route("/movies/:movie_id", delete(admin::delete_movie))
        .route("/moods", get(admin::moods).post(admin::create_mood))
        .route(
            "/moods/:mood_id",
            put(admin::update_mood).delete(admin::delete_mood),
        )
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
