use reqwest::Client;

use reelist_core::models::CastMember;

use super::error::TmdbError;
use super::types::{TmdbCredits, TmdbMovie, TmdbSearchResponse, TmdbStatus};
use crate::traits::{MovieCatalog, MovieDetail, MovieSummary};

/// TMDB v3 REST client.
pub struct TmdbClient {
    api_key: String,
    base_url: String,
    image_base_url: String,
    http: Client,
}

impl TmdbClient {
    pub fn new(api_key: String, base_url: String, image_base_url: String) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            image_base_url,
            http: Client::new(),
        }
    }

    /// Prefix used to build poster URLs for this catalog.
    pub fn image_base_url(&self) -> &str {
        &self.image_base_url
    }

    /// Check the HTTP response for errors, surfacing TMDB's status message on failure.
    async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, TmdbError> {
        if resp.status().is_success() {
            Ok(resp)
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<TmdbStatus>(&body)
                .map(|s| s.status_message)
                .unwrap_or(body);
            tracing::warn!(status, "TMDB API error");
            Err(TmdbError::Api { status, message })
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, TmdbError> {
        let resp = self
            .http
            .get(format!("{}{path}", self.base_url))
            .query(&[("api_key", self.api_key.as_str())])
            .query(query)
            .send()
            .await?;

        let resp = Self::check_response(resp).await?;
        resp.json()
            .await
            .map_err(|e| TmdbError::Parse(e.to_string()))
    }
}

impl MovieCatalog for TmdbClient {
    type Error = TmdbError;

    async fn get_movie(&self, movie_id: u64) -> Result<MovieDetail, TmdbError> {
        tracing::debug!(movie_id, "fetching movie detail");
        let movie: TmdbMovie = self.get_json(&format!("/movie/{movie_id}"), &[]).await?;
        Ok(movie.into())
    }

    async fn get_movie_cast(&self, movie_id: u64) -> Result<Vec<CastMember>, TmdbError> {
        tracing::debug!(movie_id, "fetching movie credits");
        let credits: TmdbCredits = self
            .get_json(&format!("/movie/{movie_id}/credits"), &[])
            .await?;
        Ok(credits.cast)
    }

    async fn search_movies(&self, query: &str) -> Result<Vec<MovieSummary>, TmdbError> {
        tracing::debug!(query, "searching catalog");
        let body: TmdbSearchResponse = self.get_json("/search/movie", &[("query", query)]).await?;
        Ok(body
            .results
            .into_iter()
            .map(|item| item.into_summary(&self.image_base_url))
            .collect())
    }
}
