/// Movie catalog provider abstraction
///
/// Pluggable source for external catalog data (TMDb today). Handlers never
/// call a provider directly; they go through `services::catalog`, which
/// applies the degrade-to-empty policy on provider failures.
use crate::{
    error::AppResult,
    models::{CatalogMovie, CatalogMovieDetails, Genre},
};
use chrono::NaiveDate;

pub mod tmdb;

pub use tmdb::TmdbProvider;

/// Trait for movie catalog providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Search movies by free text, optionally narrowed to a release year
    async fn search_movies(&self, query: &str, year: Option<i32>)
        -> AppResult<Vec<CatalogMovie>>;

    /// Discover movies by genre and/or release year, most popular first
    async fn discover_movies(
        &self,
        genre_id: Option<i64>,
        year: Option<i32>,
    ) -> AppResult<Vec<CatalogMovie>>;

    /// Full detail for a single movie
    async fn movie_details(&self, tmdb_id: i64) -> AppResult<CatalogMovieDetails>;

    /// Popular movies, first page
    async fn popular_movies(&self) -> AppResult<Vec<CatalogMovie>>;

    /// Regional releases within a date range, ascending by release date
    async fn movies_in_range(&self, start: NaiveDate, end: NaiveDate)
        -> AppResult<Vec<CatalogMovie>>;

    /// The catalog's movie genre list
    async fn movie_genres(&self) -> AppResult<Vec<Genre>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
