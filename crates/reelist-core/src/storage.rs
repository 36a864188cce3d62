use std::path::Path;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::ReelistError;
use crate::models::{MovieRecord, RecordPatch, StoredMovie};

const SCHEMA_V1: &str = include_str!("../../../migrations/001_initial.sql");

/// SQLite-backed local watchlist store.
pub struct Storage {
    conn: Connection,
}

impl Storage {
    /// Open (or create) the database at the given path and run migrations.
    pub fn open(path: &Path) -> Result<Self, ReelistError> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        run_migrations(&conn)?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, ReelistError> {
        let conn = Connection::open_in_memory()?;
        run_migrations(&conn)?;
        Ok(Self { conn })
    }

    /// Insert a record, returning it with its assigned key.
    pub fn insert_movie(&self, movie: &MovieRecord) -> Result<StoredMovie, ReelistError> {
        let payload = serde_json::to_string(movie)?;
        self.conn.execute(
            "INSERT INTO movies (uid, title, watched, payload, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                movie.uid,
                movie.title,
                movie.watched as i32,
                payload,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(StoredMovie {
            key: self.conn.last_insert_rowid().to_string(),
            movie: movie.clone(),
        })
    }

    /// All records owned by `uid`, oldest first.
    pub fn movies_for_user(&self, uid: &str) -> Result<Vec<StoredMovie>, ReelistError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, payload FROM movies WHERE uid = ?1 ORDER BY id")?;
        let rows = stmt
            .query_map(params![uid], |row| {
                Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
            })?
            .filter_map(|r| r.ok())
            .filter_map(|(id, payload)| row_to_stored(id, &payload))
            .collect();
        Ok(rows)
    }

    /// Get one record by key, scoped to its owner.
    pub fn get_movie(&self, uid: &str, key: &str) -> Result<Option<StoredMovie>, ReelistError> {
        let Ok(id) = key.parse::<i64>() else {
            return Ok(None);
        };
        let payload: Option<String> = self
            .conn
            .query_row(
                "SELECT payload FROM movies WHERE id = ?1 AND uid = ?2",
                params![id, uid],
                |row| row.get(0),
            )
            .optional()?;
        Ok(payload.and_then(|p| row_to_stored(id, &p)))
    }

    /// Apply a partial update to one of the user's records.
    pub fn update_movie(
        &self,
        uid: &str,
        key: &str,
        patch: &RecordPatch,
    ) -> Result<StoredMovie, ReelistError> {
        let not_found = || ReelistError::NotFound(format!("movie {key}"));
        let id: i64 = key.parse().map_err(|_| not_found())?;
        let mut stored = self.get_movie(uid, key)?.ok_or_else(not_found)?;
        stored.movie.apply(patch);
        let payload = serde_json::to_string(&stored.movie)?;
        self.conn.execute(
            "UPDATE movies SET watched = ?1, payload = ?2 WHERE id = ?3 AND uid = ?4",
            params![stored.movie.watched as i32, payload, id, uid],
        )?;
        Ok(stored)
    }
}

// ── Migrations ──────────────────────────────────────────────────

/// Run schema migrations using `PRAGMA user_version` for version tracking.
fn run_migrations(conn: &Connection) -> Result<(), ReelistError> {
    let version: i32 = conn
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .unwrap_or(0);

    if version < 1 {
        conn.execute_batch(SCHEMA_V1)?;
        conn.pragma_update(None, "user_version", 1)?;
    }
    Ok(())
}

fn row_to_stored(id: i64, payload: &str) -> Option<StoredMovie> {
    match serde_json::from_str::<MovieRecord>(payload) {
        Ok(movie) => Some(StoredMovie {
            key: id.to_string(),
            movie,
        }),
        Err(e) => {
            tracing::warn!(id, "skipping unreadable movie row: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CastMember;

    fn test_movie(title: &str, uid: &str) -> MovieRecord {
        MovieRecord {
            title: title.into(),
            year: "1979-05-25".into(),
            genre: vec!["Horror".into(), "Science Fiction".into()],
            actors: vec![CastMember {
                id: 10205,
                name: "Sigourney Weaver".into(),
                character: Some("Ripley".into()),
                order: Some(0),
                profile_path: None,
            }],
            poster_thumbnail: Some("https://image.tmdb.org/t/p/w185/alien.jpg".into()),
            poster_large: Some("https://image.tmdb.org/t/p/w780/alien.jpg".into()),
            rating: 0,
            favorite: false,
            watched: false,
            time_stamp: Utc::now(),
            uid: uid.into(),
        }
    }

    #[test]
    fn test_insert_and_list_by_user() {
        let db = Storage::open_memory().unwrap();
        let stored = db.insert_movie(&test_movie("Alien", "u1")).unwrap();
        db.insert_movie(&test_movie("Heat", "u2")).unwrap();
        db.insert_movie(&test_movie("Aliens", "u1")).unwrap();

        let rows = db.movies_for_user("u1").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], stored);
        assert_eq!(rows[1].movie.title, "Aliens");
        assert_eq!(rows[0].movie.actors[0].name, "Sigourney Weaver");

        assert!(db.movies_for_user("nobody").unwrap().is_empty());
    }

    #[test]
    fn test_update_is_scoped_to_owner() {
        let db = Storage::open_memory().unwrap();
        let stored = db.insert_movie(&test_movie("Alien", "u1")).unwrap();
        let patch = RecordPatch {
            watched: Some(true),
            ..Default::default()
        };

        assert!(matches!(
            db.update_movie("u2", &stored.key, &patch),
            Err(ReelistError::NotFound(_))
        ));

        let updated = db.update_movie("u1", &stored.key, &patch).unwrap();
        assert!(updated.movie.watched);
        let fetched = db.get_movie("u1", &stored.key).unwrap().unwrap();
        assert!(fetched.movie.watched);
    }

    #[test]
    fn test_unknown_key() {
        let db = Storage::open_memory().unwrap();
        assert!(db.get_movie("u1", "42").unwrap().is_none());
        assert!(db.get_movie("u1", "-Kfirebase").unwrap().is_none());
    }

    #[test]
    fn test_reopen_on_disk_keeps_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reelist.db");
        {
            let db = Storage::open(&path).unwrap();
            db.insert_movie(&test_movie("Alien", "u1")).unwrap();
        }
        let db = Storage::open(&path).unwrap();
        assert_eq!(db.movies_for_user("u1").unwrap().len(), 1);
    }
}
