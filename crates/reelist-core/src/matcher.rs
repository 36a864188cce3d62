use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

use crate::models::{MovieRecord, StoredMovie};
use crate::normalize::normalize;

/// Results are ranked by score, best first.
pub const SHOULD_SORT: bool = true;
/// Queries longer than this many characters are truncated before matching.
pub const MAX_PATTERN_LENGTH: usize = 32;
/// Queries shorter than this (after normalization) match nothing.
pub const MIN_MATCH_CHAR_LENGTH: usize = 1;
/// Minimum score, relative to the query matched against itself, to keep a result.
pub const MIN_SCORE_RATIO: f64 = 0.5;

/// Anything that exposes the `title` field the search runs against.
pub trait Titled {
    fn title(&self) -> &str;
}

impl Titled for MovieRecord {
    fn title(&self) -> &str {
        &self.title
    }
}

impl Titled for StoredMovie {
    fn title(&self) -> &str {
        &self.movie.title
    }
}

/// One search hit with its confidence (0.0–1.0).
#[derive(Debug, Clone)]
pub struct Scored<T> {
    pub item: T,
    pub score: f64,
}

/// Approximate search over the `title` of each item.
///
/// Returns only items whose relative score reaches [`MIN_SCORE_RATIO`],
/// sorted by score and then by shorter title.
pub fn search_titles<T: Titled + Clone>(query: &str, items: &[T]) -> Vec<Scored<T>> {
    let pattern: String = normalize(query).chars().take(MAX_PATTERN_LENGTH).collect();
    if pattern.chars().count() < MIN_MATCH_CHAR_LENGTH || items.is_empty() {
        return Vec::new();
    }

    let matcher = SkimMatcherV2::default();
    let max_possible = matcher
        .fuzzy_match(&pattern, &pattern)
        .unwrap_or(1)
        .max(1);

    let mut hits: Vec<Scored<T>> = items
        .iter()
        .filter_map(|item| {
            let score = matcher.fuzzy_match(&normalize(item.title()), &pattern)?;
            let confidence = score as f64 / max_possible as f64;
            (confidence >= MIN_SCORE_RATIO).then(|| Scored {
                item: item.clone(),
                score: confidence.min(1.0),
            })
        })
        .collect();

    if SHOULD_SORT {
        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| char_len(&a.item).cmp(&char_len(&b.item)))
        });
    }

    tracing::debug!(query, hits = hits.len(), candidates = items.len(), "title search");
    hits
}

fn char_len<T: Titled>(item: &T) -> usize {
    item.title().chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn movie(title: &str) -> MovieRecord {
        MovieRecord {
            title: title.into(),
            year: String::new(),
            genre: vec![],
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

    fn titles(hits: &[Scored<MovieRecord>]) -> Vec<&str> {
        hits.iter().map(|h| h.item.title.as_str()).collect()
    }

    #[test]
    fn test_alien_matches_alien_and_aliens() {
        let list = vec![movie("Predator"), movie("Aliens"), movie("Alien")];
        let hits = search_titles("alien", &list);
        assert_eq!(titles(&hits), vec!["Alien", "Aliens"]);
        assert!(hits.iter().all(|h| h.score > 0.0 && h.score <= 1.0));
    }

    #[test]
    fn test_ties_prefer_fewer_characters() {
        // "abéé" is longer in bytes but shorter in characters.
        let list = vec![movie("abcde"), movie("abéé")];
        let hits = search_titles("ab", &list);
        assert_eq!(titles(&hits), vec!["abéé", "abcde"]);
    }

    #[test]
    fn test_no_approximate_match_is_empty() {
        let list = vec![movie("Alien"), movie("Aliens"), movie("Predator")];
        assert!(search_titles("xyz123", &list).is_empty());
    }

    #[test]
    fn test_matches_title_field_case_insensitively() {
        let list = vec![movie("BLADE RUNNER"), movie("Heat")];
        let hits = search_titles("blade runner", &list);
        assert_eq!(titles(&hits), vec!["BLADE RUNNER"]);
    }

    #[test]
    fn test_blank_query_matches_nothing() {
        let list = vec![movie("Alien")];
        assert!(search_titles("", &list).is_empty());
        assert!(search_titles("   ", &list).is_empty());
        assert!(search_titles("?!", &list).is_empty());
    }

    #[test]
    fn test_empty_list() {
        let list: Vec<MovieRecord> = vec![];
        assert!(search_titles("alien", &list).is_empty());
    }

    #[test]
    fn test_long_query_is_truncated() {
        let title = "The Assassination of Jesse James by the Coward Robert Ford";
        let list = vec![movie(title)];
        let hits = search_titles(title, &list);
        assert_eq!(titles(&hits), vec![title]);
    }
}
