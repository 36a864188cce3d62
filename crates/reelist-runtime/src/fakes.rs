//! In-memory catalog and store used by the runtime tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use thiserror::Error;
use tokio::sync::oneshot;

use reelist_api::traits::{Genre, MovieCatalog, MovieDetail, MovieStore, MovieSummary};
use reelist_core::models::{CastMember, MovieRecord, RecordPatch, StoredMovie};

#[derive(Debug, Error)]
#[error("{0}")]
pub struct FakeError(pub String);

pub fn alien_detail() -> MovieDetail {
    MovieDetail {
        id: 348,
        title: "Alien".into(),
        original_title: "Alien".into(),
        release_date: Some("1979-05-25".into()),
        poster_path: Some("/alien.jpg".into()),
        overview: None,
        genres: vec![
            Genre {
                id: 27,
                name: "Horror".into(),
            },
            Genre {
                id: 878,
                name: "Science Fiction".into(),
            },
        ],
    }
}

pub fn alien_cast() -> Vec<CastMember> {
    vec![
        CastMember {
            id: 10205,
            name: "Sigourney Weaver".into(),
            character: Some("Ripley".into()),
            order: Some(0),
            profile_path: None,
        },
        CastMember {
            id: 4139,
            name: "Tom Skerritt".into(),
            character: Some("Dallas".into()),
            order: Some(1),
            profile_path: None,
        },
    ]
}

pub fn summary(id: u64, title: &str) -> MovieSummary {
    MovieSummary {
        id,
        title: title.into(),
        release_date: None,
        poster_url: None,
        overview: None,
    }
}

#[derive(Default)]
pub struct FakeCatalog {
    movies: HashMap<u64, (MovieDetail, Vec<CastMember>)>,
    results: HashMap<String, Vec<MovieSummary>>,
    gates: Mutex<HashMap<String, oneshot::Receiver<()>>>,
    fail_cast: bool,
    lookups: AtomicUsize,
}

impl FakeCatalog {
    pub fn with_alien() -> Self {
        let mut catalog = Self::default();
        catalog.movies.insert(348, (alien_detail(), alien_cast()));
        catalog
    }

    pub fn with_movie(mut self, detail: MovieDetail, cast: Vec<CastMember>) -> Self {
        self.movies.insert(detail.id, (detail, cast));
        self
    }

    pub fn failing_cast(mut self) -> Self {
        self.fail_cast = true;
        self
    }

    pub fn with_results(mut self, query: &str, results: Vec<MovieSummary>) -> Self {
        self.results.insert(query.into(), results);
        self
    }

    /// Hold the response to `query` until the returned sender fires.
    pub fn gate(&self, query: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(query.into(), rx);
        tx
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl MovieCatalog for FakeCatalog {
    type Error = FakeError;

    async fn get_movie(&self, movie_id: u64) -> Result<MovieDetail, FakeError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.movies
            .get(&movie_id)
            .map(|(detail, _)| detail.clone())
            .ok_or_else(|| FakeError(format!("movie {movie_id} not found")))
    }

    async fn get_movie_cast(&self, movie_id: u64) -> Result<Vec<CastMember>, FakeError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.fail_cast {
            return Err(FakeError("credits unavailable".into()));
        }
        self.movies
            .get(&movie_id)
            .map(|(_, cast)| cast.clone())
            .ok_or_else(|| FakeError(format!("movie {movie_id} not found")))
    }

    async fn search_movies(&self, query: &str) -> Result<Vec<MovieSummary>, FakeError> {
        let gate = self.gates.lock().unwrap().remove(query);
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        Ok(self.results.get(query).cloned().unwrap_or_default())
    }
}

#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<Vec<StoredMovie>>,
    fetch_gate: Mutex<Option<oneshot::Receiver<()>>>,
    fail: bool,
}

impl MemoryStore {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn rows(&self) -> Vec<StoredMovie> {
        self.rows.lock().unwrap().clone()
    }

    pub fn seed(&self, movie: MovieRecord) -> StoredMovie {
        let mut rows = self.rows.lock().unwrap();
        let stored = StoredMovie {
            key: format!("-K{}", rows.len()),
            movie,
        };
        rows.push(stored.clone());
        stored
    }

    /// Hold the next `get_movies` response until the returned sender fires.
    pub fn gate_fetch(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.fetch_gate.lock().unwrap() = Some(rx);
        tx
    }

    fn check(&self) -> Result<(), FakeError> {
        if self.fail {
            Err(FakeError("PERMISSION_DENIED: Permission denied".into()))
        } else {
            Ok(())
        }
    }
}

impl MovieStore for MemoryStore {
    type Error = FakeError;

    async fn add_movie(&self, movie: &MovieRecord) -> Result<StoredMovie, FakeError> {
        self.check()?;
        Ok(self.seed(movie.clone()))
    }

    async fn get_movies(&self, uid: &str) -> Result<Vec<StoredMovie>, FakeError> {
        self.check()?;
        let gate = self.fetch_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.movie.uid == uid)
            .cloned()
            .collect())
    }

    async fn update_movie(
        &self,
        uid: &str,
        key: &str,
        patch: &RecordPatch,
    ) -> Result<StoredMovie, FakeError> {
        self.check()?;
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|r| r.key == key && r.movie.uid == uid)
            .ok_or_else(|| FakeError(format!("movie {key} not found")))?;
        row.movie.apply(patch);
        Ok(row.clone())
    }
}
