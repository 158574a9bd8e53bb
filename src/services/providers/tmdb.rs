/// TMDb catalog provider
///
/// Thin transport layer over the TMDb v3 REST API. Conversion to client-facing
/// types lives on the models; filtering rules mirror what each endpoint is
/// used for: search, discovery and popular listings drop posterless entries,
/// the release calendar keeps them but requires a release date.
use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{CatalogMovie, CatalogMovieDetails, Genre, TmdbMovie, TmdbMovieDetails},
    services::providers::CatalogProvider,
};
use chrono::NaiveDate;
use reqwest::Client as HttpClient;
use serde::Deserialize;

/// Popular listing is trimmed to a single screenful
const POPULAR_LIMIT: usize = 10;

#[derive(Debug, Deserialize)]
struct TmdbListResponse {
    #[serde(default)]
    results: Vec<TmdbMovie>,
}

#[derive(Debug, Deserialize)]
struct TmdbGenreResponse {
    #[serde(default)]
    genres: Vec<Genre>,
}

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    image_base_url: String,
    language: String,
    region: String,
}

impl TmdbProvider {
    pub fn new(config: &Config) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key: config.tmdb_api_key.clone(),
            api_url: config.tmdb_api_url.clone(),
            image_base_url: config.tmdb_image_base_url.clone(),
            language: config.tmdb_language.clone(),
            region: config.tmdb_region.clone(),
        }
    }

    /// Issues a GET against a list endpoint and converts the results
    async fn fetch_list(&self, path: &str, params: &[(&str, String)]) -> AppResult<Vec<CatalogMovie>> {
        let url = format!("{}{}", self.api_url, path);
        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("language", self.language.as_str()),
            ])
            .query(params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDb returned status {}: {}",
                status, body
            )));
        }

        let list: TmdbListResponse = response.json().await?;
        Ok(list
            .results
            .into_iter()
            .map(|movie| movie.into_catalog(&self.image_base_url))
            .collect())
    }
}

#[async_trait::async_trait]
impl CatalogProvider for TmdbProvider {
    async fn search_movies(
        &self,
        query: &str,
        year: Option<i32>,
    ) -> AppResult<Vec<CatalogMovie>> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        let mut params = vec![
            ("query", query.to_string()),
            ("include_adult", "false".to_string()),
        ];
        if let Some(year) = year {
            params.push(("primary_release_year", year.to_string()));
        }

        let movies = self.fetch_list("/search/movie", &params).await?;
        let movies: Vec<CatalogMovie> = movies
            .into_iter()
            .filter(|m| m.poster_url.is_some())
            .collect();

        tracing::info!(
            query = %query,
            results = movies.len(),
            provider = "tmdb",
            "Movie search completed"
        );

        Ok(movies)
    }

    async fn discover_movies(
        &self,
        genre_id: Option<i64>,
        year: Option<i32>,
    ) -> AppResult<Vec<CatalogMovie>> {
        let mut params = vec![
            ("sort_by", "popularity.desc".to_string()),
            ("include_adult", "false".to_string()),
            ("page", "1".to_string()),
        ];
        if let Some(genre_id) = genre_id {
            params.push(("with_genres", genre_id.to_string()));
        }
        if let Some(year) = year {
            params.push(("primary_release_year", year.to_string()));
        }

        let movies = self.fetch_list("/discover/movie", &params).await?;
        Ok(movies
            .into_iter()
            .filter(|m| m.poster_url.is_some())
            .collect())
    }

    async fn movie_details(&self, tmdb_id: i64) -> AppResult<CatalogMovieDetails> {
        let url = format!("{}/movie/{}", self.api_url, tmdb_id);
        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("language", self.language.as_str()),
            ])
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!(
                "Movie {} not found in catalog",
                tmdb_id
            )));
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDb returned status {}: {}",
                status, body
            )));
        }

        let details: TmdbMovieDetails = response.json().await?;
        Ok(details.into_catalog(&self.image_base_url))
    }

    async fn popular_movies(&self) -> AppResult<Vec<CatalogMovie>> {
        let params = vec![("page", "1".to_string())];
        let movies = self.fetch_list("/movie/popular", &params).await?;

        Ok(movies
            .into_iter()
            .take(POPULAR_LIMIT)
            .filter(|m| m.poster_url.is_some())
            .collect())
    }

    async fn movies_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<CatalogMovie>> {
        // release_date.* honors the regional release, unlike primary_release_date;
        // release types 2|3 are limited and theatrical runs.
        let params = vec![
            ("region", self.region.clone()),
            ("sort_by", "release_date.asc".to_string()),
            ("release_date.gte", start.format("%Y-%m-%d").to_string()),
            ("release_date.lte", end.format("%Y-%m-%d").to_string()),
            ("with_release_type", "2|3".to_string()),
            ("include_adult", "false".to_string()),
        ];

        let movies = self.fetch_list("/discover/movie", &params).await?;
        Ok(movies
            .into_iter()
            .filter(|m| m.release_date.is_some())
            .collect())
    }

    async fn movie_genres(&self) -> AppResult<Vec<Genre>> {
        let url = format!("{}/genre/movie/list", self.api_url);
        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("language", self.language.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDb returned status {}: {}",
                status, body
            )));
        }

        let genres: TmdbGenreResponse = response.json().await?;
        Ok(genres.genres)
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
