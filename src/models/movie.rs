use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A movie stored locally once a user has reviewed, favorited or listed it
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Movie {
    pub id: i64,
    /// Identifier in the external catalog
    pub tmdb_id: i64,
    pub title: String,
    pub poster_url: Option<String>,
    pub overview: Option<String>,
    pub release_date: Option<NaiveDate>,
}

/// A genre as reported by the catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

/// Catalog search/discovery entry returned to the client
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CatalogMovie {
    pub tmdb_id: i64,
    pub title: String,
    pub poster_url: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub overview: Option<String>,
    pub vote_average: f64,
    pub genre_ids: Vec<i64>,
}

/// Full catalog detail for one movie
#[derive(Debug, Clone, Serialize)]
pub struct CatalogMovieDetails {
    pub tmdb_id: i64,
    pub title: String,
    pub poster_url: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub overview: Option<String>,
    pub vote_average: f64,
    pub runtime: Option<i64>,
    pub genres: Vec<Genre>,
}

// ============================================================================
// TMDb API Types
// ============================================================================

/// Raw movie entry from TMDb list endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovie {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub genre_ids: Vec<i64>,
}

impl TmdbMovie {
    /// Converts to a client-facing entry, expanding the poster path against
    /// the configured image base
    pub fn into_catalog(self, image_base: &str) -> CatalogMovie {
        CatalogMovie {
            tmdb_id: self.id,
            title: self.title,
            poster_url: self.poster_path.map(|p| format!("{}{}", image_base, p)),
            release_date: parse_release_date(self.release_date.as_deref()),
            overview: self.overview,
            vote_average: self.vote_average,
            genre_ids: self.genre_ids,
        }
    }
}

/// Raw detail response from TMDb
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovieDetails {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub runtime: Option<i64>,
    #[serde(default)]
    pub genres: Vec<Genre>,
}

impl TmdbMovieDetails {
    pub fn into_catalog(self, image_base: &str) -> CatalogMovieDetails {
        CatalogMovieDetails {
            tmdb_id: self.id,
            title: self.title,
            poster_url: self.poster_path.map(|p| format!("{}{}", image_base, p)),
            release_date: parse_release_date(self.release_date.as_deref()),
            overview: self.overview,
            vote_average: self.vote_average,
            runtime: self.runtime,
            genres: self.genres,
        }
    }
}

/// Parses TMDb's `YYYY-MM-DD` date strings, tolerating empty values
pub fn parse_release_date(raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}
