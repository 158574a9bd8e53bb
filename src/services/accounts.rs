use crate::{
    error::{AppError, AppResult},
    models::{User, UserReview},
};
use chrono::{Duration, Utc};
use rand::Rng;
use sha2::{Digest, Sha256};
use sqlx::SqlitePool;
use uuid::Uuid;

const MIN_PASSWORD_LEN: usize = 8;
const MAX_USERNAME_LEN: usize = 150;

/// Salted password hash, 64 hex characters
pub fn hash_password(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn generate_salt() -> String {
    format!("{:032x}", rand::thread_rng().gen::<u128>())
}

fn validate_credentials(username: &str, email: &str, password: &str) -> AppResult<()> {
    let username = username.trim();
    if username.is_empty() || username.len() > MAX_USERNAME_LEN {
        return Err(AppError::InvalidInput("Invalid username".to_string()));
    }
    if !email.contains('@') {
        return Err(AppError::InvalidInput("Invalid email address".to_string()));
    }
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::InvalidInput(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

/// Creates an account and signs the new user in
pub async fn signup(
    pool: &SqlitePool,
    session_ttl_seconds: i64,
    username: &str,
    email: &str,
    password: &str,
) -> AppResult<(User, String)> {
    validate_credentials(username, email, password)?;
    let username = username.trim();

    let taken: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE username = ?")
        .bind(username)
        .fetch_optional(pool)
        .await?;
    if taken.is_some() {
        return Err(AppError::Duplicate("Username already taken".to_string()));
    }

    let salt = generate_salt();
    let hash = hash_password(password, &salt);

    let user_id = sqlx::query(
        "INSERT INTO users (username, email, password_hash, password_salt, created_at)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(username)
    .bind(email)
    .bind(&hash)
    .bind(&salt)
    .bind(Utc::now())
    .execute(pool)
    .await?
    .last_insert_rowid();

    let user = get_user(pool, user_id).await?;
    let token = create_session(pool, user_id, session_ttl_seconds).await?;

    tracing::info!(username = %user.username, "Account created");

    Ok((user, token))
}

/// Verifies credentials and starts a session
pub async fn login(
    pool: &SqlitePool,
    session_ttl_seconds: i64,
    username: &str,
    password: &str,
) -> AppResult<(User, String)> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, username, email, password_hash, password_salt, bio, avatar_url,
                is_admin, created_at
         FROM users WHERE username = ?",
    )
    .bind(username.trim())
    .fetch_optional(pool)
    .await?;

    // Same response for a missing user and a wrong password
    let user = user.ok_or_else(invalid_credentials)?;
    if hash_password(password, &user.password_salt) != user.password_hash {
        return Err(invalid_credentials());
    }

    let token = create_session(pool, user.id, session_ttl_seconds).await?;

    tracing::info!(username = %user.username, "Login");

    Ok((user, token))
}

fn invalid_credentials() -> AppError {
    AppError::Unauthorized("Invalid username or password".to_string())
}

async fn create_session(
    pool: &SqlitePool,
    user_id: i64,
    ttl_seconds: i64,
) -> AppResult<String> {
    let token = Uuid::new_v4().to_string();
    let now = Utc::now();

    sqlx::query(
        "INSERT INTO sessions (token, user_id, created_at, expires_at) VALUES (?, ?, ?, ?)",
    )
    .bind(&token)
    .bind(user_id)
    .bind(now)
    .bind(now + Duration::seconds(ttl_seconds))
    .execute(pool)
    .await?;

    Ok(token)
}

/// Removes the presented session; expired rows are swept opportunistically
pub async fn logout(pool: &SqlitePool, token: &str) -> AppResult<()> {
    sqlx::query("DELETE FROM sessions WHERE token = ? OR expires_at <= ?")
        .bind(token)
        .bind(Utc::now())
        .execute(pool)
        .await?;

    Ok(())
}

/// Resolves a bearer token to its user, if the session is still live
pub async fn user_for_token(pool: &SqlitePool, token: &str) -> AppResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        "SELECT u.id, u.username, u.email, u.password_hash, u.password_salt, u.bio,
                u.avatar_url, u.is_admin, u.created_at
         FROM users u
         JOIN sessions s ON s.user_id = u.id
         WHERE s.token = ? AND s.expires_at > ?",
    )
    .bind(token)
    .bind(Utc::now())
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn get_user(pool: &SqlitePool, user_id: i64) -> AppResult<User> {
    sqlx::query_as::<_, User>(
        "SELECT id, username, email, password_hash, password_salt, bio, avatar_url,
                is_admin, created_at
         FROM users WHERE id = ?",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))
}

pub async fn get_user_by_username(pool: &SqlitePool, username: &str) -> AppResult<User> {
    sqlx::query_as::<_, User>(
        "SELECT id, username, email, password_hash, password_salt, bio, avatar_url,
                is_admin, created_at
         FROM users WHERE username = ?",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("User '{}' not found", username)))
}

pub async fn update_profile(
    pool: &SqlitePool,
    user_id: i64,
    email: Option<&str>,
    bio: Option<&str>,
    avatar_url: Option<&str>,
) -> AppResult<User> {
    if let Some(email) = email {
        if !email.contains('@') {
            return Err(AppError::InvalidInput("Invalid email address".to_string()));
        }
        sqlx::query("UPDATE users SET email = ? WHERE id = ?")
            .bind(email)
            .bind(user_id)
            .execute(pool)
            .await?;
    }
    if let Some(bio) = bio {
        sqlx::query("UPDATE users SET bio = ? WHERE id = ?")
            .bind(bio)
            .bind(user_id)
            .execute(pool)
            .await?;
    }
    if let Some(avatar_url) = avatar_url {
        sqlx::query("UPDATE users SET avatar_url = ? WHERE id = ?")
            .bind(avatar_url)
            .bind(user_id)
            .execute(pool)
            .await?;
    }

    get_user(pool, user_id).await
}

/// A user's most recent reviews with their movies, for profile pages
pub async fn recent_reviews(
    pool: &SqlitePool,
    user_id: i64,
    limit: i64,
) -> AppResult<Vec<UserReview>> {
    let reviews = sqlx::query_as::<_, UserReview>(
        "SELECT r.id, m.tmdb_id, m.title, m.poster_url, r.rating, r.comment, r.created_at
         FROM reviews r
         JOIN movies m ON m.id = r.movie_id
         WHERE r.user_id = ?
         ORDER BY r.created_at DESC
         LIMIT ?",
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(reviews)
}
