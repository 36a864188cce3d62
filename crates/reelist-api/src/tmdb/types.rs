use serde::Deserialize;

use reelist_core::models::CastMember;

use crate::traits::{Genre, MovieDetail, MovieSummary};

// ── Response types ──────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TmdbMovie {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub original_title: String,
    pub release_date: Option<String>,
    pub poster_path: Option<String>,
    pub overview: Option<String>,
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
}

#[derive(Debug, Deserialize)]
pub struct TmdbGenre {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct TmdbCredits {
    #[serde(default)]
    pub cast: Vec<CastMember>,
}

#[derive(Debug, Deserialize)]
pub struct TmdbSearchResponse {
    #[serde(default)]
    pub results: Vec<TmdbSearchItem>,
}

#[derive(Debug, Deserialize)]
pub struct TmdbSearchItem {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    pub release_date: Option<String>,
    pub poster_path: Option<String>,
    pub overview: Option<String>,
}

/// Error body TMDB returns alongside non-2xx statuses.
#[derive(Debug, Deserialize)]
pub struct TmdbStatus {
    pub status_message: String,
}

// ── Conversions ──────────────────────────────────────────────────

/// Poster size used on result cards and for `poster_thumbnail`.
pub const POSTER_THUMBNAIL: &str = "w185";
/// Poster size used for `poster_large`.
pub const POSTER_LARGE: &str = "w780";

/// Build a poster URL from the image base, a size token, and the catalog path fragment.
pub fn poster_url(image_base: &str, size: &str, poster_path: &str) -> String {
    format!("{}/{size}{poster_path}", image_base.trim_end_matches('/'))
}

impl From<TmdbMovie> for MovieDetail {
    fn from(movie: TmdbMovie) -> Self {
        Self {
            id: movie.id,
            title: movie.title,
            original_title: movie.original_title,
            release_date: movie.release_date.filter(|d| !d.is_empty()),
            poster_path: movie.poster_path.filter(|p| !p.is_empty()),
            overview: movie.overview,
            genres: movie
                .genres
                .into_iter()
                .map(|g| Genre {
                    id: g.id,
                    name: g.name,
                })
                .collect(),
        }
    }
}

impl TmdbSearchItem {
    pub fn into_summary(self, image_base: &str) -> MovieSummary {
        MovieSummary {
            id: self.id,
            title: self.title,
            release_date: self.release_date.filter(|d| !d.is_empty()),
            poster_url: self
                .poster_path
                .filter(|p| !p.is_empty())
                .map(|p| poster_url(image_base, POSTER_THUMBNAIL, &p)),
            overview: self.overview,
        }
    }
}
