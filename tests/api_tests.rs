//! Integration tests for the API surface
//!
//! Each test routes real HTTP requests through the full router, backed by an
//! in-memory database and a canned catalog provider, so extraction, services
//! and persistence are exercised together.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::NaiveDate;
use cinemood_api::{
    config::Config,
    db,
    error::{AppError, AppResult},
    models::{CatalogMovie, CatalogMovieDetails, Genre},
    routes::create_router,
    services::providers::CatalogProvider,
    AppState,
};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower::util::ServiceExt; // for `oneshot` method

const MATRIX: i64 = 603;
const PRINCESS_BRIDE: i64 = 2493;

// ============================================================================
// Test Harness
// ============================================================================

/// Canned catalog provider; the failing variant simulates an upstream outage
struct StubCatalog {
    failing: bool,
}

impl StubCatalog {
    fn new() -> Self {
        Self { failing: false }
    }

    fn failing() -> Self {
        Self { failing: true }
    }

    fn entries() -> Vec<CatalogMovie> {
        vec![
            CatalogMovie {
                tmdb_id: MATRIX,
                title: "The Matrix".to_string(),
                poster_url: Some("https://img/matrix.jpg".to_string()),
                release_date: NaiveDate::from_ymd_opt(1999, 3, 31),
                overview: Some("A hacker learns the truth.".to_string()),
                vote_average: 8.2,
                genre_ids: vec![28, 878],
            },
            CatalogMovie {
                tmdb_id: PRINCESS_BRIDE,
                title: "The Princess Bride".to_string(),
                poster_url: Some("https://img/bride.jpg".to_string()),
                release_date: NaiveDate::from_ymd_opt(1987, 9, 25),
                overview: Some("As you wish.".to_string()),
                vote_average: 7.7,
                genre_ids: vec![12, 35],
            },
        ]
    }

    fn check(&self) -> AppResult<()> {
        if self.failing {
            return Err(AppError::ExternalApi("stub outage".to_string()));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl CatalogProvider for StubCatalog {
    async fn search_movies(
        &self,
        query: &str,
        _year: Option<i32>,
    ) -> AppResult<Vec<CatalogMovie>> {
        self.check()?;
        let needle = query.to_lowercase();
        Ok(Self::entries()
            .into_iter()
            .filter(|m| m.title.to_lowercase().contains(&needle))
            .collect())
    }

    async fn discover_movies(
        &self,
        _genre_id: Option<i64>,
        _year: Option<i32>,
    ) -> AppResult<Vec<CatalogMovie>> {
        self.check()?;
        Ok(Self::entries())
    }

    async fn movie_details(&self, tmdb_id: i64) -> AppResult<CatalogMovieDetails> {
        self.check()?;
        let entry = Self::entries()
            .into_iter()
            .find(|m| m.tmdb_id == tmdb_id)
            .ok_or_else(|| AppError::NotFound(format!("Movie {} not found", tmdb_id)))?;

        Ok(CatalogMovieDetails {
            tmdb_id: entry.tmdb_id,
            title: entry.title,
            poster_url: entry.poster_url,
            release_date: entry.release_date,
            overview: entry.overview,
            vote_average: entry.vote_average,
            runtime: Some(120),
            genres: vec![Genre {
                id: 28,
                name: "Action".to_string(),
            }],
        })
    }

    async fn popular_movies(&self) -> AppResult<Vec<CatalogMovie>> {
        self.check()?;
        Ok(Self::entries())
    }

    async fn movies_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<CatalogMovie>> {
        self.check()?;
        Ok(Self::entries()
            .into_iter()
            .filter(|m| m.release_date.map(|d| d >= start && d <= end).unwrap_or(false))
            .collect())
    }

    async fn movie_genres(&self) -> AppResult<Vec<Genre>> {
        self.check()?;
        Ok(vec![
            Genre {
                id: 28,
                name: "Action".to_string(),
            },
            Genre {
                id: 878,
                name: "Science Fiction".to_string(),
            },
        ])
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        tmdb_api_key: "test-key".to_string(),
        tmdb_api_url: "http://localhost/tmdb".to_string(),
        tmdb_image_base_url: "https://img".to_string(),
        tmdb_language: "en-US".to_string(),
        tmdb_region: "US".to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        session_ttl_seconds: 3600,
        min_mood_votes: 1,
    }
}

/// Test helper: full router over a fresh in-memory database
async fn setup_app_with(catalog: StubCatalog) -> (Router, SqlitePool) {
    let pool = db::init_database("sqlite::memory:")
        .await
        .expect("in-memory database should initialize");

    let state = AppState {
        db: pool.clone(),
        catalog: Arc::new(catalog),
        config: Arc::new(test_config()),
    };

    (create_router(state), pool)
}

async fn setup_app() -> (Router, SqlitePool) {
    setup_app_with(StubCatalog::new()).await
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn auth_request(method: &str, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> axum::response::Response {
    app.clone().oneshot(request).await.expect("request should route")
}

/// Test helper: extract JSON body from response
async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("should read body");
    serde_json::from_slice(&bytes).expect("should parse JSON")
}

/// Test helper: register an account and return its session token
async fn signup(app: &Router, username: &str) -> String {
    let response = send(
        app,
        json_request(
            "POST",
            "/api/v1/auth/signup",
            None,
            &json!({
                "username": username,
                "email": format!("{}@example.com", username),
                "password": "correct-horse",
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = extract_json(response.into_body()).await;
    body["token"].as_str().expect("session token").to_string()
}

async fn promote_to_admin(pool: &SqlitePool, username: &str) {
    sqlx::query("UPDATE users SET is_admin = 1 WHERE username = ?")
        .bind(username)
        .execute(pool)
        .await
        .expect("should promote user");
}

/// Test helper: post a review, asserting creation, and return its JSON
async fn post_review(
    app: &Router,
    token: &str,
    tmdb_id: i64,
    rating: f64,
    mood_scores: Value,
) -> Value {
    let response = send(
        app,
        json_request(
            "POST",
            &format!("/api/v1/movies/{}/reviews", tmdb_id),
            Some(token),
            &json!({
                "rating": rating,
                "comment": "Watched it twice.",
                "mood_scores": mood_scores,
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    extract_json(response.into_body()).await
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _pool) = setup_app().await;

    let response = send(&app, get_request("/health")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "healthy");
}

// ============================================================================
// Accounts and Sessions
// ============================================================================

#[tokio::test]
async fn test_signup_login_logout_round_trip() {
    let (app, _pool) = setup_app().await;

    let token = signup(&app, "alice").await;

    let response = send(&app, auth_request("GET", "/api/v1/profile", &token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["profile"]["username"], "alice");
    assert_eq!(body["profile"]["email"], "alice@example.com");

    let response = send(&app, auth_request("POST", "/api/v1/auth/logout", &token)).await;
    assert_eq!(response.status(), StatusCode::OK);

    // The token no longer resolves
    let response = send(&app, auth_request("GET", "/api/v1/profile", &token)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // But the credentials still work
    let response = send(
        &app,
        json_request(
            "POST",
            "/api/v1/auth/login",
            None,
            &json!({ "username": "alice", "password": "correct-horse" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert!(body["token"].is_string());
}

#[tokio::test]
async fn test_login_rejects_wrong_password() {
    let (app, _pool) = setup_app().await;
    signup(&app, "alice").await;

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/v1/auth/login",
            None,
            &json!({ "username": "alice", "password": "wrong-horse!" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = extract_json(response.into_body()).await;
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_signup_duplicate_username_conflict() {
    let (app, _pool) = setup_app().await;
    signup(&app, "alice").await;

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/v1/auth/signup",
            None,
            &json!({
                "username": "alice",
                "email": "other@example.com",
                "password": "correct-horse",
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = extract_json(response.into_body()).await;
    assert!(body["warning"].is_string());
}

#[tokio::test]
async fn test_public_profile_hides_email() {
    let (app, _pool) = setup_app().await;
    let token = signup(&app, "alice").await;
    post_review(&app, &token, MATRIX, 9.0, json!({ "1": 4 })).await;

    let response = send(&app, get_request("/api/v1/profiles/alice")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["profile"]["username"], "alice");
    assert!(body["profile"].get("email").is_none());
    assert_eq!(body["reviews"].as_array().unwrap().len(), 1);
    assert_eq!(body["reviews"][0]["title"], "The Matrix");
}

// ============================================================================
// Home, Search and Calendar
// ============================================================================

#[tokio::test]
async fn test_home_lists_moods_and_popular() {
    let (app, _pool) = setup_app().await;

    let response = send(&app, get_request("/api/v1/home")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    let moods = body["moods"].as_array().unwrap();
    assert_eq!(moods.len(), 8);
    assert_eq!(moods[0]["name"], "Happy");
    assert_eq!(moods[0]["emoji"], "😊");
    assert_eq!(body["popular"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_search_hits_the_catalog() {
    let (app, _pool) = setup_app().await;

    let response = send(&app, get_request("/api/v1/movies/search?q=matrix")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["source"], "catalog");
    let movies = body["movies"].as_array().unwrap();
    assert_eq!(movies.len(), 1);
    assert_eq!(movies[0]["title"], "The Matrix");
}

#[tokio::test]
async fn test_search_by_mood_uses_local_store() {
    let (app, _pool) = setup_app().await;
    let token = signup(&app, "alice").await;
    post_review(&app, &token, MATRIX, 8.0, json!({ "3": 5 })).await;

    let response = send(&app, get_request("/api/v1/movies/search?mood=3")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["source"], "local");
    let movies = body["movies"].as_array().unwrap();
    assert_eq!(movies.len(), 1);
    assert_eq!(movies[0]["title"], "The Matrix");

    // No scores for this mood yet
    let response = send(&app, get_request("/api/v1/movies/search?mood=5")).await;
    let body = extract_json(response.into_body()).await;
    assert!(body["movies"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_search_degrades_to_empty_on_catalog_failure() {
    let (app, _pool) = setup_app_with(StubCatalog::failing()).await;

    let response = send(&app, get_request("/api/v1/movies/search?q=matrix")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert!(body["movies"].as_array().unwrap().is_empty());

    // Home degrades the same way
    let response = send(&app, get_request("/api/v1/home")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert!(body["popular"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_calendar_filters_to_requested_window() {
    let (app, _pool) = setup_app().await;

    let response = send(
        &app,
        get_request("/api/v1/movies/calendar?start=1999-01-01&end=1999-12-31"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["start"], "1999-01-01");
    let movies = body["movies"].as_array().unwrap();
    assert_eq!(movies.len(), 1);
    assert_eq!(movies[0]["title"], "The Matrix");
}

#[tokio::test]
async fn test_genres_come_from_the_catalog() {
    let (app, _pool) = setup_app().await;

    let response = send(&app, get_request("/api/v1/movies/genres")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
    assert_eq!(body[0]["name"], "Action");
}

// ============================================================================
// Movie Detail
// ============================================================================

#[tokio::test]
async fn test_detail_unknown_movie_returns_404() {
    let (app, _pool) = setup_app().await;

    let response = send(&app, get_request("/api/v1/movies/99999")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_detail_merges_reviews_and_viewer_flags() {
    let (app, _pool) = setup_app().await;
    let alice = signup(&app, "alice").await;
    let review = post_review(&app, &alice, MATRIX, 9.0, json!({ "3": 4 })).await;

    // Anonymous view: review visible, no ownership
    let response = send(&app, get_request(&format!("/api/v1/movies/{}", MATRIX))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["movie"]["tmdb_id"], MATRIX);
    assert_eq!(body["local_rating"], 9.0);
    let reviews = body["reviews"].as_array().unwrap();
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0]["username"], "alice");
    assert_eq!(reviews[0]["is_owner"], false);
    assert_eq!(reviews[0]["moods"][0]["name"], "Scary");
    assert_eq!(reviews[0]["moods"][0]["emoji"], "😱");
    assert_eq!(reviews[0]["moods"][0]["intensity"], 4);
    assert!(body["my_review_id"].is_null());

    // Owner view
    let response = send(
        &app,
        auth_request("GET", &format!("/api/v1/movies/{}", MATRIX), &alice),
    )
    .await;
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["reviews"][0]["is_owner"], true);
    assert_eq!(body["my_review_id"], review["id"]);
}

// ============================================================================
// Reviews and Mood Scores
// ============================================================================

#[tokio::test]
async fn test_create_review_requires_session() {
    let (app, _pool) = setup_app().await;

    let response = send(
        &app,
        json_request(
            "POST",
            &format!("/api/v1/movies/{}/reviews", MATRIX),
            None,
            &json!({ "rating": 7.0, "comment": "ok", "mood_scores": {} }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = extract_json(response.into_body()).await;
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_review_keeps_positive_scores_only() {
    let (app, _pool) = setup_app().await;
    let token = signup(&app, "alice").await;

    // Mood 1 scored, mood 2 explicitly zero
    post_review(&app, &token, MATRIX, 8.5, json!({ "1": 4, "2": 0 })).await;

    let response = send(&app, get_request(&format!("/api/v1/movies/{}", MATRIX))).await;
    let body = extract_json(response.into_body()).await;
    let moods = body["reviews"][0]["moods"].as_array().unwrap();
    assert_eq!(moods.len(), 1);
    assert_eq!(moods[0]["mood_id"], 1);
}

#[tokio::test]
async fn test_duplicate_review_conflict_leaves_single_row() {
    let (app, _pool) = setup_app().await;
    let token = signup(&app, "alice").await;
    post_review(&app, &token, MATRIX, 8.0, json!({ "1": 3 })).await;

    let response = send(
        &app,
        json_request(
            "POST",
            &format!("/api/v1/movies/{}/reviews", MATRIX),
            Some(&token),
            &json!({ "rating": 2.0, "comment": "Changed my mind.", "mood_scores": {} }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = extract_json(response.into_body()).await;
    assert!(body["warning"].is_string());

    // The original review is untouched
    let response = send(&app, get_request(&format!("/api/v1/movies/{}", MATRIX))).await;
    let body = extract_json(response.into_body()).await;
    let reviews = body["reviews"].as_array().unwrap();
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0]["rating"], 8.0);
}

#[tokio::test]
async fn test_zero_intensity_update_removes_score() {
    let (app, _pool) = setup_app().await;
    let token = signup(&app, "alice").await;
    let review = post_review(&app, &token, MATRIX, 8.0, json!({ "3": 4 })).await;
    let review_id = review["id"].as_i64().unwrap();

    let update = json!({ "rating": 8.0, "comment": "Still great.", "mood_scores": { "3": 0 } });
    let response = send(
        &app,
        json_request(
            "PUT",
            &format!("/api/v1/reviews/{}", review_id),
            Some(&token),
            &update,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, get_request(&format!("/api/v1/movies/{}", MATRIX))).await;
    let body = extract_json(response.into_body()).await;
    assert!(body["reviews"][0]["moods"].as_array().unwrap().is_empty());

    // Clearing an already absent score is a no-op, not an error
    let response = send(
        &app,
        json_request(
            "PUT",
            &format!("/api/v1/reviews/{}", review_id),
            Some(&token),
            &update,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_non_owner_cannot_edit_review() {
    let (app, _pool) = setup_app().await;
    let alice = signup(&app, "alice").await;
    let bob = signup(&app, "bob").await;
    let review = post_review(&app, &alice, MATRIX, 8.0, json!({})).await;
    let review_id = review["id"].as_i64().unwrap();

    let response = send(
        &app,
        json_request(
            "PUT",
            &format!("/api/v1/reviews/{}", review_id),
            Some(&bob),
            &json!({ "rating": 1.0, "comment": "Vandalism.", "mood_scores": {} }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = send(
        &app,
        auth_request("DELETE", &format!("/api/v1/reviews/{}", review_id), &bob),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_can_delete_any_review() {
    let (app, pool) = setup_app().await;
    let alice = signup(&app, "alice").await;
    let bob = signup(&app, "bob").await;
    promote_to_admin(&pool, "bob").await;

    let review = post_review(&app, &alice, MATRIX, 8.0, json!({ "1": 5 })).await;
    let review_id = review["id"].as_i64().unwrap();

    let response = send(
        &app,
        auth_request("DELETE", &format!("/api/v1/reviews/{}", review_id), &bob),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, get_request(&format!("/api/v1/movies/{}", MATRIX))).await;
    let body = extract_json(response.into_body()).await;
    assert!(body["reviews"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_review_rejects_out_of_range_values() {
    let (app, _pool) = setup_app().await;
    let token = signup(&app, "alice").await;

    let response = send(
        &app,
        json_request(
            "POST",
            &format!("/api/v1/movies/{}/reviews", MATRIX),
            Some(&token),
            &json!({ "rating": 11.0, "comment": "Too high.", "mood_scores": {} }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(
        &app,
        json_request(
            "POST",
            &format!("/api/v1/movies/{}/reviews", MATRIX),
            Some(&token),
            &json!({ "rating": 7.0, "comment": "Fine.", "mood_scores": { "1": 6 } }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ============================================================================
// Recommendations
// ============================================================================

#[tokio::test]
async fn test_recommendations_empty_without_votes() {
    let (app, _pool) = setup_app().await;

    let response = send(&app, get_request("/api/v1/recommendations/1")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["mood"]["name"], "Happy");
    assert!(body["movies"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_recommendations_unknown_mood_404() {
    let (app, _pool) = setup_app().await;

    let response = send(&app, get_request("/api/v1/recommendations/999")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_recommendations_rank_by_weighted_score() {
    let (app, _pool) = setup_app().await;
    let alice = signup(&app, "alice").await;
    let bob = signup(&app, "bob").await;
    let cara = signup(&app, "cara").await;

    // Mood 3: Matrix gets 5 and 5, Princess Bride gets a single 3
    post_review(&app, &alice, MATRIX, 9.0, json!({ "3": 5 })).await;
    post_review(&app, &bob, MATRIX, 8.0, json!({ "3": 5 })).await;
    post_review(&app, &cara, PRINCESS_BRIDE, 7.0, json!({ "3": 3 })).await;

    let response = send(&app, get_request("/api/v1/recommendations/3")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["mood"]["id"], 3);
    let movies = body["movies"].as_array().unwrap();
    assert_eq!(movies.len(), 2);

    // Global mean C = 13/3; with m = 1:
    //   Matrix          (2/3)*5 + (1/3)*C = 43/9
    //   Princess Bride  (1/2)*3 + (1/2)*C = 11/3
    assert_eq!(movies[0]["tmdb_id"], MATRIX);
    assert_eq!(movies[0]["votes"], 2);
    let top = movies[0]["score"].as_f64().unwrap();
    assert!((top - 43.0 / 9.0).abs() < 1e-9);

    assert_eq!(movies[1]["tmdb_id"], PRINCESS_BRIDE);
    let second = movies[1]["score"].as_f64().unwrap();
    assert!((second - 11.0 / 3.0).abs() < 1e-9);
}

// ============================================================================
// Favorites, Bookmarks and Lists
// ============================================================================

#[tokio::test]
async fn test_favorite_toggle_involution() {
    let (app, _pool) = setup_app().await;
    let token = signup(&app, "alice").await;
    let uri = format!("/api/v1/movies/{}/favorite", MATRIX);

    let response = send(&app, auth_request("POST", &uri, &token)).await;
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "added");

    let response = send(
        &app,
        auth_request("GET", &format!("/api/v1/movies/{}", MATRIX), &token),
    )
    .await;
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["is_favorited"], true);
    assert_eq!(body["is_bookmarked"], false);

    // Toggling again undoes the first toggle
    let response = send(&app, auth_request("POST", &uri, &token)).await;
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "removed");

    let response = send(
        &app,
        auth_request("GET", &format!("/api/v1/movies/{}", MATRIX), &token),
    )
    .await;
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["is_favorited"], false);
}

#[tokio::test]
async fn test_private_list_hidden_from_strangers() {
    let (app, _pool) = setup_app().await;
    let alice = signup(&app, "alice").await;
    let bob = signup(&app, "bob").await;

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/v1/lists",
            Some(&alice),
            &json!({ "name": "Comfort movies", "is_public": false }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = extract_json(response.into_body()).await;
    let list_id = body["id"].as_i64().unwrap();

    let uri = format!("/api/v1/lists/{}", list_id);
    let response = send(&app, auth_request("GET", &uri, &alice)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, auth_request("GET", &uri, &bob)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&app, get_request(&uri)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_membership_toggle() {
    let (app, _pool) = setup_app().await;
    let token = signup(&app, "alice").await;

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/v1/lists",
            Some(&token),
            &json!({ "name": "Rewatch", "is_public": true }),
        ),
    )
    .await;
    let body = extract_json(response.into_body()).await;
    let list_id = body["id"].as_i64().unwrap();

    let toggle_uri = format!("/api/v1/lists/{}/movies/{}", list_id, MATRIX);
    let response = send(&app, auth_request("POST", &toggle_uri, &token)).await;
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "added");

    let response = send(
        &app,
        auth_request("GET", &format!("/api/v1/lists/{}", list_id), &token),
    )
    .await;
    let body = extract_json(response.into_body()).await;
    let movies = body["movies"].as_array().unwrap();
    assert_eq!(movies.len(), 1);
    assert_eq!(movies[0]["title"], "The Matrix");

    let response = send(&app, auth_request("POST", &toggle_uri, &token)).await;
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "removed");

    let response = send(
        &app,
        auth_request("GET", &format!("/api/v1/lists/{}", list_id), &token),
    )
    .await;
    let body = extract_json(response.into_body()).await;
    assert!(body["movies"].as_array().unwrap().is_empty());
}

// ============================================================================
// Admin
// ============================================================================

#[tokio::test]
async fn test_admin_routes_require_admin_flag() {
    let (app, pool) = setup_app().await;
    let token = signup(&app, "alice").await;

    let response = send(&app, auth_request("GET", "/api/v1/admin/dashboard", &token)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    promote_to_admin(&pool, "alice").await;

    let response = send(&app, auth_request("GET", "/api/v1/admin/dashboard", &token)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["user_count"], 1);
    assert_eq!(body["mood_count"], 8);
}

#[tokio::test]
async fn test_admin_movie_listing_and_delete_cascade() {
    let (app, pool) = setup_app().await;
    let alice = signup(&app, "alice").await;
    let admin = signup(&app, "root").await;
    promote_to_admin(&pool, "root").await;

    post_review(&app, &alice, MATRIX, 8.0, json!({ "1": 4 })).await;

    let response = send(&app, auth_request("GET", "/api/v1/admin/movies?q=matrix", &admin)).await;
    let body = extract_json(response.into_body()).await;
    let movies = body.as_array().unwrap();
    assert_eq!(movies.len(), 1);
    assert_eq!(movies[0]["review_count"], 1);
    let movie_id = movies[0]["id"].as_i64().unwrap();

    let response = send(
        &app,
        auth_request("DELETE", &format!("/api/v1/admin/movies/{}", movie_id), &admin),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Reviews went with the movie
    let response = send(&app, get_request(&format!("/api/v1/movies/{}", MATRIX))).await;
    let body = extract_json(response.into_body()).await;
    assert!(body["reviews"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_admin_mood_crud() {
    let (app, pool) = setup_app().await;
    let admin = signup(&app, "root").await;
    promote_to_admin(&pool, "root").await;

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/v1/admin/moods",
            Some(&admin),
            &json!({ "name": "Nostalgic" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = extract_json(response.into_body()).await;
    let mood_id = body["id"].as_i64().unwrap();

    // Seeded names stay unique
    let response = send(
        &app,
        json_request(
            "POST",
            "/api/v1/admin/moods",
            Some(&admin),
            &json!({ "name": "Happy" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = send(
        &app,
        json_request(
            "PUT",
            &format!("/api/v1/admin/moods/{}", mood_id),
            Some(&admin),
            &json!({ "name": "Wistful" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["name"], "Wistful");

    let response = send(
        &app,
        auth_request("DELETE", &format!("/api/v1/admin/moods/{}", mood_id), &admin),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, auth_request("GET", "/api/v1/admin/moods", &admin)).await;
    let body = extract_json(response.into_body()).await;
    assert_eq!(body.as_array().unwrap().len(), 8);
}
