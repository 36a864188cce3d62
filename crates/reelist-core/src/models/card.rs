use serde::{Deserialize, Serialize};

use super::StoredMovie;

/// What the page renders for one movie, whether it came from the catalog or a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieCard {
    /// Catalog id, present on search results so the "add" affordance can carry it.
    pub movie_id: Option<u64>,
    /// Persistence key, present on list entries.
    pub key: Option<String>,
    pub title: String,
    pub year: String,
    pub poster_url: Option<String>,
    pub watched: Option<bool>,
    pub rating: Option<u8>,
    pub favorite: Option<bool>,
}

impl From<&StoredMovie> for MovieCard {
    fn from(stored: &StoredMovie) -> Self {
        Self {
            movie_id: None,
            key: Some(stored.key.clone()),
            title: stored.movie.title.clone(),
            year: stored.movie.year.clone(),
            poster_url: stored.movie.poster_thumbnail.clone(),
            watched: Some(stored.movie.watched),
            rating: Some(stored.movie.rating),
            favorite: Some(stored.movie.favorite),
        }
    }
}
