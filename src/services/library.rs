use crate::{
    error::{AppError, AppResult},
    models::{CustomList, ListSummary, Movie},
};
use chrono::Utc;
use serde::Serialize;
use sqlx::SqlitePool;

/// Outcome of an idempotent add-or-remove toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleState {
    Added,
    Removed,
}

/// The two (user, movie) link tables sharing the toggle behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Favorite,
    Bookmark,
}

impl LinkKind {
    fn table(self) -> &'static str {
        match self {
            LinkKind::Favorite => "favorites",
            LinkKind::Bookmark => "bookmarks",
        }
    }
}

/// Toggles a favorite/bookmark link: removes it when present, adds it when
/// absent. Applying the toggle twice restores the original state.
pub async fn toggle(
    pool: &SqlitePool,
    kind: LinkKind,
    user_id: i64,
    movie_id: i64,
) -> AppResult<ToggleState> {
    let delete = format!(
        "DELETE FROM {} WHERE user_id = ? AND movie_id = ?",
        kind.table()
    );
    let removed = sqlx::query(&delete)
        .bind(user_id)
        .bind(movie_id)
        .execute(pool)
        .await?
        .rows_affected();

    if removed > 0 {
        return Ok(ToggleState::Removed);
    }

    let insert = format!(
        "INSERT INTO {} (user_id, movie_id, created_at) VALUES (?, ?, ?)",
        kind.table()
    );
    sqlx::query(&insert)
        .bind(user_id)
        .bind(movie_id)
        .bind(Utc::now())
        .execute(pool)
        .await?;

    Ok(ToggleState::Added)
}

pub async fn is_linked(
    pool: &SqlitePool,
    kind: LinkKind,
    user_id: i64,
    movie_id: i64,
) -> AppResult<bool> {
    let sql = format!(
        "SELECT COUNT(*) FROM {} WHERE user_id = ? AND movie_id = ?",
        kind.table()
    );
    let count: i64 = sqlx::query_scalar(&sql)
        .bind(user_id)
        .bind(movie_id)
        .fetch_one(pool)
        .await?;

    Ok(count > 0)
}

/// A user's linked movies, newest link first
pub async fn linked_movies(
    pool: &SqlitePool,
    kind: LinkKind,
    user_id: i64,
    limit: i64,
) -> AppResult<Vec<Movie>> {
    let sql = format!(
        "SELECT m.id, m.tmdb_id, m.title, m.poster_url, m.overview, m.release_date
         FROM {} l
         JOIN movies m ON m.id = l.movie_id
         WHERE l.user_id = ?
         ORDER BY l.created_at DESC
         LIMIT ?",
        kind.table()
    );
    let movies = sqlx::query_as::<_, Movie>(&sql)
        .bind(user_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;

    Ok(movies)
}

// ============================================================================
// Custom Lists
// ============================================================================

pub async fn create_list(
    pool: &SqlitePool,
    user_id: i64,
    name: &str,
    description: Option<&str>,
    is_public: bool,
) -> AppResult<CustomList> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::InvalidInput("List name cannot be empty".to_string()));
    }

    let list_id = sqlx::query(
        "INSERT INTO custom_lists (user_id, name, description, is_public, created_at)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(user_id)
    .bind(name)
    .bind(description)
    .bind(is_public)
    .bind(Utc::now())
    .execute(pool)
    .await?
    .last_insert_rowid();

    get_list_row(pool, list_id).await
}

async fn get_list_row(pool: &SqlitePool, list_id: i64) -> AppResult<CustomList> {
    sqlx::query_as::<_, CustomList>(
        "SELECT id, user_id, name, description, is_public, created_at
         FROM custom_lists WHERE id = ?",
    )
    .bind(list_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("List {} not found", list_id)))
}

/// All lists owned by a user, or only the public ones for other viewers
pub async fn lists_for_user(
    pool: &SqlitePool,
    user_id: i64,
    public_only: bool,
) -> AppResult<Vec<ListSummary>> {
    let sql = if public_only {
        "SELECT cl.id, cl.name, cl.description, cl.is_public,
                COUNT(clm.movie_id) AS movie_count
         FROM custom_lists cl
         LEFT JOIN custom_list_movies clm ON clm.list_id = cl.id
         WHERE cl.user_id = ? AND cl.is_public = 1
         GROUP BY cl.id
         ORDER BY cl.created_at DESC"
    } else {
        "SELECT cl.id, cl.name, cl.description, cl.is_public,
                COUNT(clm.movie_id) AS movie_count
         FROM custom_lists cl
         LEFT JOIN custom_list_movies clm ON clm.list_id = cl.id
         WHERE cl.user_id = ?
         GROUP BY cl.id
         ORDER BY cl.created_at DESC"
    };

    let lists = sqlx::query_as::<_, ListSummary>(sql)
        .bind(user_id)
        .fetch_all(pool)
        .await?;

    Ok(lists)
}

/// A list with its movies. Private lists exist only for their owner; other
/// viewers get a not-found rather than a hint that the list exists.
pub async fn get_list(
    pool: &SqlitePool,
    viewer_id: Option<i64>,
    list_id: i64,
) -> AppResult<(CustomList, Vec<Movie>)> {
    let list = get_list_row(pool, list_id).await?;
    if !list.is_public && viewer_id != Some(list.user_id) {
        return Err(AppError::NotFound(format!("List {} not found", list_id)));
    }

    let movies = sqlx::query_as::<_, Movie>(
        "SELECT m.id, m.tmdb_id, m.title, m.poster_url, m.overview, m.release_date
         FROM custom_list_movies clm
         JOIN movies m ON m.id = clm.movie_id
         WHERE clm.list_id = ?
         ORDER BY clm.created_at DESC",
    )
    .bind(list_id)
    .fetch_all(pool)
    .await?;

    Ok((list, movies))
}

async fn owned_list(pool: &SqlitePool, user_id: i64, list_id: i64) -> AppResult<CustomList> {
    let list = get_list_row(pool, list_id).await?;
    if list.user_id != user_id {
        return Err(AppError::Forbidden(
            "You can only modify your own lists".to_string(),
        ));
    }
    Ok(list)
}

pub async fn update_list(
    pool: &SqlitePool,
    user_id: i64,
    list_id: i64,
    name: &str,
    description: Option<&str>,
    is_public: bool,
) -> AppResult<CustomList> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::InvalidInput("List name cannot be empty".to_string()));
    }

    owned_list(pool, user_id, list_id).await?;

    sqlx::query("UPDATE custom_lists SET name = ?, description = ?, is_public = ? WHERE id = ?")
        .bind(name)
        .bind(description)
        .bind(is_public)
        .bind(list_id)
        .execute(pool)
        .await?;

    get_list_row(pool, list_id).await
}

pub async fn delete_list(pool: &SqlitePool, user_id: i64, list_id: i64) -> AppResult<()> {
    owned_list(pool, user_id, list_id).await?;

    sqlx::query("DELETE FROM custom_lists WHERE id = ?")
        .bind(list_id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Toggles a movie's membership in an owned list
pub async fn toggle_list_movie(
    pool: &SqlitePool,
    user_id: i64,
    list_id: i64,
    movie_id: i64,
) -> AppResult<ToggleState> {
    owned_list(pool, user_id, list_id).await?;

    let removed = sqlx::query("DELETE FROM custom_list_movies WHERE list_id = ? AND movie_id = ?")
        .bind(list_id)
        .bind(movie_id)
        .execute(pool)
        .await?
        .rows_affected();

    if removed > 0 {
        return Ok(ToggleState::Removed);
    }

    sqlx::query("INSERT INTO custom_list_movies (list_id, movie_id, created_at) VALUES (?, ?, ?)")
        .bind(list_id)
        .bind(movie_id)
        .bind(Utc::now())
        .execute(pool)
        .await?;

    Ok(ToggleState::Added)
}
