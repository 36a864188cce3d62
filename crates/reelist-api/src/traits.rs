//! Trait definitions for the external services the watchlist depends on.
//!
//! The catalog and persistence clients implement these traits so the
//! runtime can be tested against in-memory fakes.

use std::future::Future;

use reelist_core::models::{CastMember, MovieCard, MovieRecord, RecordPatch, StoredMovie};

/// A remote movie metadata and search service.
pub trait MovieCatalog: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Full detail for one movie.
    fn get_movie(&self, movie_id: u64)
        -> impl Future<Output = Result<MovieDetail, Self::Error>> + Send;

    /// Billed cast for one movie, in billing order.
    fn get_movie_cast(
        &self,
        movie_id: u64,
    ) -> impl Future<Output = Result<Vec<CastMember>, Self::Error>> + Send;

    /// Search movies by title.
    fn search_movies(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<MovieSummary>, Self::Error>> + Send;
}

/// A per-user store of watchlist records.
pub trait MovieStore: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Persist a new record and return it with its assigned key.
    fn add_movie(
        &self,
        movie: &MovieRecord,
    ) -> impl Future<Output = Result<StoredMovie, Self::Error>> + Send;

    /// Every record owned by `uid`.
    fn get_movies(&self, uid: &str)
        -> impl Future<Output = Result<Vec<StoredMovie>, Self::Error>> + Send;

    /// Apply a partial update to one of `uid`'s records.
    fn update_movie(
        &self,
        uid: &str,
        key: &str,
        patch: &RecordPatch,
    ) -> impl Future<Output = Result<StoredMovie, Self::Error>> + Send;
}

/// A genre as the catalog reports it.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

/// Full movie detail from the catalog.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MovieDetail {
    pub id: u64,
    pub title: String,
    pub original_title: String,
    pub release_date: Option<String>,
    pub poster_path: Option<String>,
    pub overview: Option<String>,
    pub genres: Vec<Genre>,
}

/// One catalog search hit.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MovieSummary {
    pub id: u64,
    pub title: String,
    pub release_date: Option<String>,
    pub poster_url: Option<String>,
    pub overview: Option<String>,
}

impl From<&MovieSummary> for MovieCard {
    fn from(summary: &MovieSummary) -> Self {
        Self {
            movie_id: Some(summary.id),
            key: None,
            title: summary.title.clone(),
            year: summary.release_date.clone().unwrap_or_default(),
            poster_url: summary.poster_url.clone(),
            watched: None,
            rating: None,
            favorite: None,
        }
    }
}
