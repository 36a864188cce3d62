use std::path::Path;

use tokio::sync::{mpsc, oneshot};

use reelist_api::traits::MovieStore;
use reelist_core::error::ReelistError;
use reelist_core::models::{MovieRecord, RecordPatch, StoredMovie};
use reelist_core::storage::Storage;

/// Async handle to a SQLite store owned by a dedicated thread.
#[derive(Clone)]
pub struct DbHandle {
    tx: mpsc::UnboundedSender<DbCommand>,
}

enum DbCommand {
    InsertMovie {
        movie: Box<MovieRecord>,
        reply: oneshot::Sender<Result<StoredMovie, ReelistError>>,
    },
    MoviesForUser {
        uid: String,
        reply: oneshot::Sender<Result<Vec<StoredMovie>, ReelistError>>,
    },
    UpdateMovie {
        uid: String,
        key: String,
        patch: RecordPatch,
        reply: oneshot::Sender<Result<StoredMovie, ReelistError>>,
    },
}

impl DbHandle {
    pub fn open(path: &Path) -> Result<Self, ReelistError> {
        Self::spawn(Storage::open(path)?)
    }

    pub fn open_memory() -> Result<Self, ReelistError> {
        Self::spawn(Storage::open_memory()?)
    }

    fn spawn(storage: Storage) -> Result<Self, ReelistError> {
        let (tx, rx) = mpsc::unbounded_channel();

        std::thread::Builder::new()
            .name("db-actor".into())
            .spawn(move || actor_loop(storage, rx))
            .inspect_err(|e| tracing::error!("Failed to spawn DB thread: {e}"))?;

        Ok(Self { tx })
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<Result<T, ReelistError>>) -> DbCommand,
    ) -> Result<T, ReelistError> {
        let (reply, rx) = oneshot::channel();
        let _ = self.tx.send(make(reply));
        rx.await
            .unwrap_or_else(|_| Err(ReelistError::Config("DB actor closed".into())))
    }
}

impl MovieStore for DbHandle {
    type Error = ReelistError;

    async fn add_movie(&self, movie: &MovieRecord) -> Result<StoredMovie, ReelistError> {
        let movie = Box::new(movie.clone());
        self.request(|reply| DbCommand::InsertMovie { movie, reply })
            .await
    }

    async fn get_movies(&self, uid: &str) -> Result<Vec<StoredMovie>, ReelistError> {
        let uid = uid.to_string();
        self.request(|reply| DbCommand::MoviesForUser { uid, reply })
            .await
    }

    async fn update_movie(
        &self,
        uid: &str,
        key: &str,
        patch: &RecordPatch,
    ) -> Result<StoredMovie, ReelistError> {
        let (uid, key, patch) = (uid.to_string(), key.to_string(), patch.clone());
        self.request(|reply| DbCommand::UpdateMovie {
            uid,
            key,
            patch,
            reply,
        })
        .await
    }
}

fn actor_loop(storage: Storage, mut rx: mpsc::UnboundedReceiver<DbCommand>) {
    while let Some(cmd) = rx.blocking_recv() {
        match cmd {
            DbCommand::InsertMovie { movie, reply } => {
                let _ = reply.send(storage.insert_movie(&movie));
            }
            DbCommand::MoviesForUser { uid, reply } => {
                let _ = reply.send(storage.movies_for_user(&uid));
            }
            DbCommand::UpdateMovie {
                uid,
                key,
                patch,
                reply,
            } => {
                let _ = reply.send(storage.update_movie(&uid, &key, &patch));
            }
        }
    }
    tracing::debug!("DB actor stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn movie(title: &str) -> MovieRecord {
        MovieRecord {
            title: title.into(),
            year: "1986-07-18".into(),
            genre: vec!["Action".into()],
            actors: vec![],
            poster_thumbnail: None,
            poster_large: None,
            rating: 0,
            favorite: false,
            watched: false,
            time_stamp: Utc::now(),
            uid: "u1".into(),
        }
    }

    #[tokio::test]
    async fn test_round_trip_through_actor() {
        let db = DbHandle::open_memory().unwrap();
        let stored = db.add_movie(&movie("Aliens")).await.unwrap();

        let rows = db.get_movies("u1").await.unwrap();
        assert_eq!(rows, vec![stored.clone()]);

        let patch = RecordPatch {
            rating: Some(4),
            favorite: Some(true),
            ..Default::default()
        };
        let updated = db.update_movie("u1", &stored.key, &patch).await.unwrap();
        assert_eq!(updated.movie.rating, 4);
        assert!(updated.movie.favorite);
    }

    #[tokio::test]
    async fn test_on_disk_store() {
        let dir = tempfile::tempdir().unwrap();
        let db = DbHandle::open(&dir.path().join("reelist.db")).unwrap();
        db.add_movie(&movie("Heat")).await.unwrap();
        assert_eq!(db.get_movies("u1").await.unwrap().len(), 1);
        assert!(db.get_movies("u2").await.unwrap().is_empty());
    }
}
