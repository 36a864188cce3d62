use std::collections::BTreeMap;

use serde::Deserialize;

use reelist_core::models::{MovieRecord, StoredMovie};

/// Body returned by a `POST` (push) request.
#[derive(Debug, Deserialize)]
pub struct PushResponse {
    pub name: String,
}

/// Error body returned with non-2xx statuses.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Result of a filtered collection query: `null` or an object keyed by push key.
pub type CollectionResponse = Option<BTreeMap<String, serde_json::Value>>;

/// Convert a collection query into records, skipping entries that do not parse.
///
/// Push keys sort chronologically, so the result is in insertion order.
pub fn into_stored_movies(collection: CollectionResponse) -> Vec<StoredMovie> {
    collection
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(key, value)| match serde_json::from_value::<MovieRecord>(value) {
            Ok(movie) => Some(StoredMovie { key, movie }),
            Err(e) => {
                tracing::warn!(%key, "skipping unreadable record: {e}");
                None
            }
        })
        .collect()
}
