pub mod list;
pub mod mood;
pub mod movie;
pub mod review;
pub mod user;

pub use list::{CustomList, ListSummary};
pub use mood::{emoji_for, Mood, MoodSummary, DEFAULT_MOODS};
pub use movie::{
    parse_release_date, CatalogMovie, CatalogMovieDetails, Genre, Movie, TmdbMovie,
    TmdbMovieDetails,
};
pub use review::{Review, ReviewWithAuthor, ScoredMood, UserReview};
pub use user::{Profile, User};
