use crate::error::AppResult;
use crate::models::DEFAULT_MOODS;
use sqlx::SqlitePool;

/// Idempotent table and index definitions; safe to run on every startup
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE,
        email TEXT NOT NULL,
        password_hash TEXT NOT NULL,
        password_salt TEXT NOT NULL,
        bio TEXT,
        avatar_url TEXT,
        is_admin INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS sessions (
        token TEXT PRIMARY KEY,
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        created_at TEXT NOT NULL,
        expires_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS movies (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        tmdb_id INTEGER NOT NULL UNIQUE,
        title TEXT NOT NULL,
        poster_url TEXT,
        overview TEXT,
        release_date TEXT
    )",
    "CREATE TABLE IF NOT EXISTS moods (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE
    )",
    "CREATE TABLE IF NOT EXISTS reviews (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        movie_id INTEGER NOT NULL REFERENCES movies(id) ON DELETE CASCADE,
        rating REAL NOT NULL,
        comment TEXT NOT NULL,
        created_at TEXT NOT NULL,
        UNIQUE (user_id, movie_id)
    )",
    // Sparse fact table: only positive intensities are stored
    "CREATE TABLE IF NOT EXISTS mood_scores (
        review_id INTEGER NOT NULL REFERENCES reviews(id) ON DELETE CASCADE,
        mood_id INTEGER NOT NULL REFERENCES moods(id) ON DELETE CASCADE,
        intensity INTEGER NOT NULL CHECK (intensity BETWEEN 1 AND 5),
        PRIMARY KEY (review_id, mood_id)
    )",
    "CREATE TABLE IF NOT EXISTS favorites (
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        movie_id INTEGER NOT NULL REFERENCES movies(id) ON DELETE CASCADE,
        created_at TEXT NOT NULL,
        PRIMARY KEY (user_id, movie_id)
    )",
    "CREATE TABLE IF NOT EXISTS bookmarks (
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        movie_id INTEGER NOT NULL REFERENCES movies(id) ON DELETE CASCADE,
        created_at TEXT NOT NULL,
        PRIMARY KEY (user_id, movie_id)
    )",
    "CREATE TABLE IF NOT EXISTS custom_lists (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        name TEXT NOT NULL,
        description TEXT,
        is_public INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS custom_list_movies (
        list_id INTEGER NOT NULL REFERENCES custom_lists(id) ON DELETE CASCADE,
        movie_id INTEGER NOT NULL REFERENCES movies(id) ON DELETE CASCADE,
        created_at TEXT NOT NULL,
        PRIMARY KEY (list_id, movie_id)
    )",
    "CREATE INDEX IF NOT EXISTS idx_reviews_movie ON reviews(movie_id)",
    "CREATE INDEX IF NOT EXISTS idx_reviews_user ON reviews(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_mood_scores_mood ON mood_scores(mood_id)",
    "CREATE INDEX IF NOT EXISTS idx_sessions_user ON sessions(user_id)",
];

/// Creates any missing tables and indexes
pub async fn create_schema(pool: &SqlitePool) -> AppResult<()> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}

/// Inserts the default mood set; existing rows are left untouched
pub async fn seed_default_moods(pool: &SqlitePool) -> AppResult<()> {
    for name in DEFAULT_MOODS {
        sqlx::query("INSERT OR IGNORE INTO moods (name) VALUES (?)")
            .bind(name)
            .execute(pool)
            .await?;
    }
    Ok(())
}
