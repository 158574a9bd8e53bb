use crate::{
    error::{AppError, AppResult},
    models::{CatalogMovie, CatalogMovieDetails, Genre, Movie},
    services::providers::CatalogProvider,
};
use chrono::NaiveDate;
use sqlx::SqlitePool;
use std::sync::Arc;

/// Catalog access for handlers
///
/// Wraps the configured provider and applies the error policy: list lookups
/// degrade to empty results and detail lookups to `None`, with the failure
/// logged. Handlers never see a catalog outage as a server error.

/// Searches by text (optionally narrowed to a genre client-side, since the
/// catalog's text search cannot filter by genre) or falls back to discovery
/// when only genre/year filters are given.
pub async fn search(
    provider: Arc<dyn CatalogProvider>,
    query: Option<&str>,
    genre_id: Option<i64>,
    year: Option<i32>,
) -> Vec<CatalogMovie> {
    let query = query.map(str::trim).filter(|q| !q.is_empty());

    let result = match query {
        Some(q) => provider.search_movies(q, year).await.map(|movies| {
            match genre_id {
                Some(genre) => movies
                    .into_iter()
                    .filter(|m| m.genre_ids.contains(&genre))
                    .collect(),
                None => movies,
            }
        }),
        None if genre_id.is_some() || year.is_some() => {
            provider.discover_movies(genre_id, year).await
        }
        None => Ok(Vec::new()),
    };

    result.unwrap_or_else(|e| {
        tracing::warn!(error = %e, provider = provider.name(), "Catalog search failed");
        Vec::new()
    })
}

pub async fn popular(provider: Arc<dyn CatalogProvider>) -> Vec<CatalogMovie> {
    provider.popular_movies().await.unwrap_or_else(|e| {
        tracing::warn!(error = %e, provider = provider.name(), "Popular lookup failed");
        Vec::new()
    })
}

pub async fn releases_between(
    provider: Arc<dyn CatalogProvider>,
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<CatalogMovie> {
    provider.movies_in_range(start, end).await.unwrap_or_else(|e| {
        tracing::warn!(error = %e, provider = provider.name(), "Release calendar lookup failed");
        Vec::new()
    })
}

pub async fn genres(provider: Arc<dyn CatalogProvider>) -> Vec<Genre> {
    provider.movie_genres().await.unwrap_or_else(|e| {
        tracing::warn!(error = %e, provider = provider.name(), "Genre lookup failed");
        Vec::new()
    })
}

pub async fn details(
    provider: Arc<dyn CatalogProvider>,
    tmdb_id: i64,
) -> Option<CatalogMovieDetails> {
    match provider.movie_details(tmdb_id).await {
        Ok(details) => Some(details),
        Err(e) => {
            tracing::warn!(
                error = %e,
                tmdb_id,
                provider = provider.name(),
                "Detail lookup failed"
            );
            None
        }
    }
}

/// Finds the local row for a catalog movie, materializing it on first use.
/// Reviews, favorites, bookmarks and list entries all go through here.
pub async fn ensure_movie(
    pool: &SqlitePool,
    provider: Arc<dyn CatalogProvider>,
    tmdb_id: i64,
) -> AppResult<Movie> {
    if let Some(movie) = find_movie(pool, tmdb_id).await? {
        return Ok(movie);
    }

    let details = provider.movie_details(tmdb_id).await.map_err(|e| match e {
        AppError::NotFound(_) => e,
        other => {
            tracing::warn!(error = %other, tmdb_id, "Catalog lookup failed while storing movie");
            AppError::NotFound(format!("Movie {} not found", tmdb_id))
        }
    })?;

    sqlx::query(
        "INSERT INTO movies (tmdb_id, title, poster_url, overview, release_date)
         VALUES (?, ?, ?, ?, ?)
         ON CONFLICT(tmdb_id) DO NOTHING",
    )
    .bind(details.tmdb_id)
    .bind(&details.title)
    .bind(&details.poster_url)
    .bind(&details.overview)
    .bind(details.release_date)
    .execute(pool)
    .await?;

    find_movie(pool, tmdb_id)
        .await?
        .ok_or_else(|| AppError::Internal(format!("Movie {} missing after insert", tmdb_id)))
}

pub async fn find_movie(pool: &SqlitePool, tmdb_id: i64) -> AppResult<Option<Movie>> {
    let movie = sqlx::query_as::<_, Movie>(
        "SELECT id, tmdb_id, title, poster_url, overview, release_date
         FROM movies WHERE tmdb_id = ?",
    )
    .bind(tmdb_id)
    .fetch_optional(pool)
    .await?;

    Ok(movie)
}

/// Locally stored movies carrying at least one positive score for a mood,
/// optionally narrowed by title substring and release year
pub async fn local_movies_for_mood(
    pool: &SqlitePool,
    mood_id: i64,
    title_query: Option<&str>,
    year: Option<i32>,
) -> AppResult<Vec<Movie>> {
    let mut sql = String::from(
        "SELECT DISTINCT m.id, m.tmdb_id, m.title, m.poster_url, m.overview, m.release_date
         FROM movies m
         JOIN reviews r ON r.movie_id = m.id
         JOIN mood_scores ms ON ms.review_id = r.id
         WHERE ms.mood_id = ?",
    );
    let title_query = title_query.map(str::trim).filter(|q| !q.is_empty());
    if title_query.is_some() {
        sql.push_str(" AND m.title LIKE ?");
    }
    if year.is_some() {
        sql.push_str(" AND strftime('%Y', m.release_date) = ?");
    }
    sql.push_str(" ORDER BY m.title");

    let mut query = sqlx::query_as::<_, Movie>(&sql).bind(mood_id);
    if let Some(q) = title_query {
        query = query.bind(format!("%{}%", q));
    }
    if let Some(year) = year {
        query = query.bind(year.to_string());
    }

    Ok(query.fetch_all(pool).await?)
}
