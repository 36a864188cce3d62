use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Highest rating a user can give a movie.
pub const MAX_RATING: u8 = 5;

/// One credited cast member, as returned by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastMember {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub character: Option<String>,
    #[serde(default)]
    pub order: Option<u32>,
    #[serde(default)]
    pub profile_path: Option<String>,
}

/// A movie on a user's watchlist, persisted verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub title: String,
    /// Release date string as provided by the catalog.
    pub year: String,
    pub genre: Vec<String>,
    pub actors: Vec<CastMember>,
    pub poster_thumbnail: Option<String>,
    pub poster_large: Option<String>,
    pub rating: u8,
    pub favorite: bool,
    #[serde(default)]
    pub watched: bool,
    pub time_stamp: DateTime<Utc>,
    pub uid: String,
}

impl MovieRecord {
    /// Whether the record belongs in the given list view.
    pub fn in_list(&self, list: ListKind) -> bool {
        match list {
            ListKind::Watched => self.watched,
            ListKind::Unwatched => !self.watched,
        }
    }

    /// Apply a partial update. Ratings above [`MAX_RATING`] are clamped.
    pub fn apply(&mut self, patch: &RecordPatch) {
        if let Some(watched) = patch.watched {
            self.watched = watched;
        }
        if let Some(rating) = patch.rating {
            self.rating = rating.min(MAX_RATING);
        }
        if let Some(favorite) = patch.favorite {
            self.favorite = favorite;
        }
    }
}

/// A record together with the key the persistence service assigned to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredMovie {
    pub key: String,
    #[serde(flatten)]
    pub movie: MovieRecord,
}

/// Fields a user can change after a movie is added.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watched: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorite: Option<bool>,
}

impl RecordPatch {
    pub fn is_empty(&self) -> bool {
        self.watched.is_none() && self.rating.is_none() && self.favorite.is_none()
    }
}

/// The two personal lists a user can browse and search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    Watched,
    Unwatched,
}

impl std::fmt::Display for ListKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Watched => write!(f, "Watched"),
            Self::Unwatched => write!(f, "Unwatched"),
        }
    }
}
