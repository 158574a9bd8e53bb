use crate::{
    error::{AppError, AppResult},
    models::{Mood, Movie},
};
use chrono::NaiveDate;
use serde::Serialize;
use sqlx::SqlitePool;

/// Recommendation lists are truncated to one page
pub const PAGE_SIZE: usize = 20;

/// Prior used when a mood has no votes anywhere: the midpoint of the 0 to 5
/// intensity scale
pub const NEUTRAL_INTENSITY: f64 = 2.5;

/// A movie ranked for one mood
#[derive(Debug, Clone, Serialize)]
pub struct ScoredMovie {
    #[serde(flatten)]
    pub movie: Movie,
    pub votes: i64,
    pub mean_intensity: f64,
    pub score: f64,
}

/// Bayesian weighted rating (IMDB-style): blends a movie's own mean intensity
/// with the mood-wide mean, weighted by how many votes the movie has.
///
/// `score = (v / (v + m)) * R + (m / (v + m)) * C`
pub fn weighted_rating(votes: i64, mean_intensity: f64, min_votes: i64, global_mean: f64) -> f64 {
    let v = votes as f64;
    let m = min_votes as f64;
    (v / (v + m)) * mean_intensity + (m / (v + m)) * global_mean
}

#[derive(sqlx::FromRow)]
struct CandidateRow {
    id: i64,
    tmdb_id: i64,
    title: String,
    poster_url: Option<String>,
    overview: Option<String>,
    release_date: Option<NaiveDate>,
    votes: i64,
    mean_intensity: f64,
}

/// Ranks movies for a mood by credibility-weighted mood intensity, best
/// first. Candidates need at least `min_votes` positive scores for the mood;
/// a mood nobody has voted for yields an empty list.
pub async fn recommend_for_mood(
    pool: &SqlitePool,
    mood_id: i64,
    min_votes: i64,
) -> AppResult<(Mood, Vec<ScoredMovie>)> {
    let mood = sqlx::query_as::<_, Mood>("SELECT id, name FROM moods WHERE id = ?")
        .bind(mood_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Mood {} not found", mood_id)))?;

    let global_mean: Option<f64> =
        sqlx::query_scalar("SELECT AVG(intensity) FROM mood_scores WHERE mood_id = ?")
            .bind(mood_id)
            .fetch_one(pool)
            .await?;
    let global_mean = global_mean.unwrap_or(NEUTRAL_INTENSITY);

    // Ascending id keeps the pre-sort order deterministic; the stable sort
    // below preserves it between equal scores.
    let candidates = sqlx::query_as::<_, CandidateRow>(
        "SELECT m.id, m.tmdb_id, m.title, m.poster_url, m.overview, m.release_date,
                COUNT(ms.intensity) AS votes, AVG(ms.intensity) AS mean_intensity
         FROM movies m
         JOIN reviews r ON r.movie_id = m.id
         JOIN mood_scores ms ON ms.review_id = r.id
         WHERE ms.mood_id = ?
         GROUP BY m.id
         HAVING COUNT(ms.intensity) >= ?
         ORDER BY m.id",
    )
    .bind(mood_id)
    .bind(min_votes)
    .fetch_all(pool)
    .await?;

    let mut scored: Vec<ScoredMovie> = candidates
        .into_iter()
        .map(|row| {
            let score = weighted_rating(row.votes, row.mean_intensity, min_votes, global_mean);
            ScoredMovie {
                movie: Movie {
                    id: row.id,
                    tmdb_id: row.tmdb_id,
                    title: row.title,
                    poster_url: row.poster_url,
                    overview: row.overview,
                    release_date: row.release_date,
                },
                votes: row.votes,
                mean_intensity: row.mean_intensity,
                score,
            }
        })
        .collect();

    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    scored.truncate(PAGE_SIZE);

    tracing::debug!(
        mood = %mood.name,
        candidates = scored.len(),
        global_mean,
        "Recommendations computed"
    );

    Ok((mood, scored))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, create_schema, seed_default_moods};
    use chrono::Utc;

    #[test]
    fn test_weighted_rating_literal_case() {
        // Four votes averaging 4.0 against a global mean of 3.0 with m = 1:
        // (16 + 3) / 5 = 3.8
        let score = weighted_rating(4, 4.0, 1, 3.0);
        assert!((score - 3.8).abs() < 1e-9);
    }

    #[test]
    fn test_weighted_rating_single_vote_shrinks_halfway() {
        let score = weighted_rating(1, 5.0, 1, 2.5);
        assert!((score - 3.75).abs() < 1e-9);
    }

    #[test]
    fn test_weighted_rating_many_votes_approach_own_mean() {
        let few = weighted_rating(2, 4.0, 1, 1.0);
        let many = weighted_rating(200, 4.0, 1, 1.0);
        assert!(many > few);
        assert!((many - 4.0).abs() < 0.05);
    }

    async fn seed_fixture(pool: &SqlitePool) {
        let now = Utc::now();
        for name in ["alice", "bob", "cara", "dan"] {
            sqlx::query(
                "INSERT INTO users (username, email, password_hash, password_salt, created_at)
                 VALUES (?, ?, 'h', 's', ?)",
            )
            .bind(name)
            .bind(format!("{}@example.com", name))
            .bind(now)
            .execute(pool)
            .await
            .unwrap();
        }
        for (tmdb_id, title) in [(100, "First"), (200, "Second"), (300, "Third")] {
            sqlx::query("INSERT INTO movies (tmdb_id, title) VALUES (?, ?)")
                .bind(tmdb_id)
                .bind(title)
                .execute(pool)
                .await
                .unwrap();
        }
    }

    async fn add_scored_review(
        pool: &SqlitePool,
        user_id: i64,
        movie_id: i64,
        mood_id: i64,
        intensity: i64,
    ) {
        let review_id: i64 = sqlx::query_scalar(
            "INSERT INTO reviews (user_id, movie_id, rating, comment, created_at)
             VALUES (?, ?, 7.0, 'x', ?) RETURNING id",
        )
        .bind(user_id)
        .bind(movie_id)
        .bind(Utc::now())
        .fetch_one(pool)
        .await
        .unwrap();

        sqlx::query("INSERT INTO mood_scores (review_id, mood_id, intensity) VALUES (?, ?, ?)")
            .bind(review_id)
            .bind(mood_id)
            .bind(intensity)
            .execute(pool)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_mood_without_votes_yields_empty_list() {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        create_schema(&pool).await.unwrap();
        seed_default_moods(&pool).await.unwrap();
        seed_fixture(&pool).await;

        let (mood, scored) = recommend_for_mood(&pool, 1, 1).await.unwrap();
        assert_eq!(mood.id, 1);
        assert!(scored.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_mood_is_not_found() {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        create_schema(&pool).await.unwrap();
        seed_default_moods(&pool).await.unwrap();

        let err = recommend_for_mood(&pool, 999, 1).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_scores_match_formula_and_order() {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        create_schema(&pool).await.unwrap();
        seed_default_moods(&pool).await.unwrap();
        seed_fixture(&pool).await;

        // Movie 1: one vote of 5. Movie 2: three votes of 4.
        // Global mean = (5 + 12) / 4 = 4.25.
        add_scored_review(&pool, 1, 1, 1, 5).await;
        add_scored_review(&pool, 1, 2, 1, 4).await;
        add_scored_review(&pool, 2, 2, 1, 4).await;
        add_scored_review(&pool, 3, 2, 1, 4).await;

        let (_, scored) = recommend_for_mood(&pool, 1, 1).await.unwrap();
        assert_eq!(scored.len(), 2);

        let first = &scored[0];
        let second = &scored[1];
        assert_eq!(first.movie.id, 1);
        assert!((first.score - weighted_rating(1, 5.0, 1, 4.25)).abs() < 1e-9);
        assert_eq!(second.movie.id, 2);
        assert!((second.score - weighted_rating(3, 4.0, 1, 4.25)).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_min_votes_excludes_sparse_movies() {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        create_schema(&pool).await.unwrap();
        seed_default_moods(&pool).await.unwrap();
        seed_fixture(&pool).await;

        add_scored_review(&pool, 1, 1, 1, 5).await;
        add_scored_review(&pool, 1, 2, 1, 4).await;
        add_scored_review(&pool, 2, 2, 1, 4).await;

        let (_, scored) = recommend_for_mood(&pool, 1, 2).await.unwrap();
        assert_eq!(scored.len(), 1);
        assert_eq!(scored[0].movie.id, 2);
        assert_eq!(scored[0].votes, 2);
    }

    #[tokio::test]
    async fn test_equal_scores_keep_id_order() {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        create_schema(&pool).await.unwrap();
        seed_default_moods(&pool).await.unwrap();
        seed_fixture(&pool).await;

        // Identical vote profiles for movies 1 and 2
        add_scored_review(&pool, 1, 1, 1, 3).await;
        add_scored_review(&pool, 2, 2, 1, 3).await;

        let (_, scored) = recommend_for_mood(&pool, 1, 1).await.unwrap();
        assert_eq!(scored.len(), 2);
        assert_eq!(scored[0].movie.id, 1);
        assert_eq!(scored[1].movie.id, 2);
        assert!((scored[0].score - scored[1].score).abs() < 1e-9);
    }
}
