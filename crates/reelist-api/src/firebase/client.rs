use reqwest::Client;
use url::Url;

use reelist_core::models::{MovieRecord, RecordPatch, StoredMovie};

use super::error::FirebaseError;
use super::types::{into_stored_movies, CollectionResponse, ErrorBody, PushResponse};
use crate::traits::MovieStore;

/// Firebase Realtime Database REST client for one collection of movie records.
pub struct FirebaseClient {
    base: Url,
    collection: String,
    auth_token: Option<String>,
    http: Client,
}

impl FirebaseClient {
    pub fn new(
        database_url: &str,
        collection: String,
        auth_token: Option<String>,
    ) -> Result<Self, FirebaseError> {
        Ok(Self {
            base: Url::parse(database_url)?,
            collection,
            auth_token,
            http: Client::new(),
        })
    }

    /// URL of the collection (`/movies.json`) or of one record (`/movies/{key}.json`).
    fn endpoint(&self, key: Option<&str>) -> Result<Url, FirebaseError> {
        let mut url = self.base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?;
            segments.pop_if_empty();
            match key {
                Some(key) => {
                    segments.push(&self.collection).push(&format!("{key}.json"));
                }
                None => {
                    segments.push(&format!("{}.json", self.collection));
                }
            }
        }
        if let Some(token) = &self.auth_token {
            url.query_pairs_mut().append_pair("auth", token);
        }
        Ok(url)
    }

    /// Check the HTTP response, turning Firebase's `{"error": ...}` body into a code+message pair.
    async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, FirebaseError> {
        if resp.status().is_success() {
            Ok(resp)
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            tracing::warn!(status, %message, "Firebase API error");
            Err(FirebaseError::Api { status, message })
        }
    }

    /// Fetch a single record by key.
    async fn get_movie(&self, key: &str) -> Result<Option<MovieRecord>, FirebaseError> {
        let resp = self.http.get(self.endpoint(Some(key))?).send().await?;
        let resp = Self::check_response(resp).await?;
        resp.json()
            .await
            .map_err(|e| FirebaseError::Parse(e.to_string()))
    }
}

impl MovieStore for FirebaseClient {
    type Error = FirebaseError;

    async fn add_movie(&self, movie: &MovieRecord) -> Result<StoredMovie, FirebaseError> {
        let resp = self
            .http
            .post(self.endpoint(None)?)
            .json(movie)
            .send()
            .await?;

        let resp = Self::check_response(resp).await?;
        let pushed: PushResponse = resp
            .json()
            .await
            .map_err(|e| FirebaseError::Parse(e.to_string()))?;

        tracing::info!(key = %pushed.name, title = %movie.title, "added movie");
        Ok(StoredMovie {
            key: pushed.name,
            movie: movie.clone(),
        })
    }

    async fn get_movies(&self, uid: &str) -> Result<Vec<StoredMovie>, FirebaseError> {
        // Filter values are JSON literals, so the uid must be quoted.
        let equal_to = serde_json::to_string(uid).map_err(|e| FirebaseError::Parse(e.to_string()))?;
        let resp = self
            .http
            .get(self.endpoint(None)?)
            .query(&[("orderBy", "\"uid\""), ("equalTo", equal_to.as_str())])
            .send()
            .await?;

        let resp = Self::check_response(resp).await?;
        let body: CollectionResponse = resp
            .json()
            .await
            .map_err(|e| FirebaseError::Parse(e.to_string()))?;

        Ok(into_stored_movies(body))
    }

    async fn update_movie(
        &self,
        uid: &str,
        key: &str,
        patch: &RecordPatch,
    ) -> Result<StoredMovie, FirebaseError> {
        let mut movie = self
            .get_movie(key)
            .await?
            .filter(|m| m.uid == uid)
            .ok_or_else(|| FirebaseError::NotFound(format!("movie {key}")))?;

        let resp = self
            .http
            .patch(self.endpoint(Some(key))?)
            .json(patch)
            .send()
            .await?;
        Self::check_response(resp).await?;

        movie.apply(patch);
        Ok(StoredMovie {
            key: key.to_string(),
            movie,
        })
    }
}
