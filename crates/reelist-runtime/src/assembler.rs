//! Builds a watchlist record from the catalog's detail and cast lookups.

use chrono::{DateTime, Utc};
use thiserror::Error;

use reelist_api::tmdb::types::{poster_url, POSTER_LARGE, POSTER_THUMBNAIL};
use reelist_api::traits::{MovieCatalog, MovieDetail};
use reelist_core::models::{CastMember, MovieRecord};

use crate::session::Session;

#[derive(Debug, Error)]
pub enum AssembleError {
    #[error("sign in to add movies to your watchlist")]
    SignedOut,

    #[error("catalog lookup for movie {movie_id} failed: {message}")]
    Catalog { movie_id: u64, message: String },
}

/// Merge catalog detail and cast with the owner's id into a new record.
pub fn build_movie_record(
    detail: MovieDetail,
    cast: Vec<CastMember>,
    uid: &str,
    image_base: &str,
    now: DateTime<Utc>,
) -> MovieRecord {
    let poster = |size| {
        detail
            .poster_path
            .as_deref()
            .map(|path| poster_url(image_base, size, path))
    };

    MovieRecord {
        poster_thumbnail: poster(POSTER_THUMBNAIL),
        poster_large: poster(POSTER_LARGE),
        genre: detail.genres.iter().map(|g| g.name.clone()).collect(),
        title: detail.original_title,
        year: detail.release_date.unwrap_or_default(),
        actors: cast,
        rating: 0,
        favorite: false,
        watched: false,
        time_stamp: now,
        uid: uid.to_string(),
    }
}

/// Fetch detail and cast concurrently and assemble a record for the
/// session's current user.
///
/// The user is read once, before either lookup starts. If either lookup
/// fails no record is produced.
pub async fn assemble_record<C: MovieCatalog>(
    catalog: &C,
    session: &Session,
    image_base: &str,
    movie_id: u64,
    now: DateTime<Utc>,
) -> Result<MovieRecord, AssembleError> {
    let user = session.current_user().ok_or(AssembleError::SignedOut)?;

    let (detail, cast) = futures::try_join!(
        catalog.get_movie(movie_id),
        catalog.get_movie_cast(movie_id)
    )
    .map_err(|e| {
        tracing::warn!(movie_id, "catalog lookup failed: {e}");
        AssembleError::Catalog {
            movie_id,
            message: e.to_string(),
        }
    })?;

    Ok(build_movie_record(detail, cast, &user.uid, image_base, now))
}
