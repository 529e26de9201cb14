//! Producer credits inferred from filenames.
//!
//! Every producer name and alias becomes a search term. Terms are tried
//! longest first, in two passes over the lower-cased filename stem:
//!
//! 1. whole-word matches (every occurrence)
//! 2. plain substring matches (first occurrence only)
//!
//! A match is only accepted when it does not overlap a range an earlier match
//! already consumed, so "Max Martin" wins over "Martin" in the same span.
//! Aliases restricted to artists only count when the song has one of them.
//!
//! The greedy order is not a global optimum; it is kept as-is so results stay
//! stable for existing catalogs.

use std::collections::BTreeSet;
use std::ops::Range;

use regex::Regex;
use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::db;
use crate::error::Result;
use crate::model::Producer;

/// One searchable spelling of a producer.
#[derive(Debug, Clone)]
struct SearchTerm {
    term: String,
    producer_id: i64,
    /// Empty for producer names and unrestricted aliases
    scope: Vec<i64>,
    word: Option<Regex>,
}

impl SearchTerm {
    fn new(term: &str, producer_id: i64, scope: Vec<i64>) -> Self {
        let term = term.to_lowercase();
        let word = match Regex::new(&format!(r"\b{}\b", regex::escape(&term))) {
            Ok(re) => Some(re),
            Err(e) => {
                warn!("Skipping word match for {:?}: {}", term, e);
                None
            }
        };
        Self {
            term,
            producer_id,
            scope,
            word,
        }
    }

    fn in_context(&self, song_artist_ids: &[i64]) -> bool {
        self.scope.is_empty() || self.scope.iter().any(|id| song_artist_ids.contains(id))
    }
}

/// A producer attributed to a span of the search text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProducerMatch {
    pub producer_id: i64,
    pub range: Range<usize>,
}

/// Matches filenames against a producer dictionary.
#[derive(Debug, Clone, Default)]
pub struct ProducerMatcher {
    terms: Vec<SearchTerm>,
}

impl ProducerMatcher {
    pub fn new(producers: &[Producer]) -> Self {
        let mut terms = Vec::new();
        for producer in producers {
            terms.push(SearchTerm::new(&producer.name, producer.id, Vec::new()));
            for alias in &producer.aliases {
                terms.push(SearchTerm::new(
                    &alias.alias,
                    producer.id,
                    alias.artist_ids.clone(),
                ));
            }
        }

        // An empty term would match everywhere.
        terms.retain(|t| !t.term.trim().is_empty());
        // Stable: equal lengths keep dictionary order.
        terms.sort_by(|a, b| b.term.len().cmp(&a.term.len()));

        Self { terms }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Producer ids credited by `filename` for a song by `song_artist_ids`.
    pub fn match_filename(&self, filename: &str, song_artist_ids: &[i64]) -> BTreeSet<i64> {
        self.find_matches(&search_text(filename), song_artist_ids)
            .into_iter()
            .map(|m| m.producer_id)
            .collect()
    }

    /// Accepted matches in acceptance order.
    pub fn find_matches(&self, text: &str, song_artist_ids: &[i64]) -> Vec<ProducerMatch> {
        let mut accepted: Vec<ProducerMatch> = Vec::new();
        let in_context: Vec<&SearchTerm> = self
            .terms
            .iter()
            .filter(|t| t.in_context(song_artist_ids))
            .collect();

        for term in &in_context {
            let Some(word) = &term.word else { continue };
            for found in word.find_iter(text) {
                accept(&mut accepted, term.producer_id, found.range());
            }
        }

        for term in &in_context {
            if let Some(start) = text.find(&term.term) {
                accept(&mut accepted, term.producer_id, start..start + term.term.len());
            }
        }

        accepted
    }
}

fn accept(accepted: &mut Vec<ProducerMatch>, producer_id: i64, range: Range<usize>) {
    let overlaps = accepted
        .iter()
        .any(|m| range.start < m.range.end && range.end > m.range.start);
    if !overlaps {
        accepted.push(ProducerMatch { producer_id, range });
    }
}

/// Lower-cased filename without its extension.
///
/// The extension is the text after the last dot, provided it is non-empty
/// and contains no `/`.
pub fn search_text(filename: &str) -> String {
    let stem = match filename.rfind('.') {
        Some(dot) if dot + 1 < filename.len() && !filename[dot + 1..].contains('/') => {
            &filename[..dot]
        }
        _ => filename,
    };
    stem.to_lowercase()
}

/// Load the producer dictionary from the catalog.
pub async fn load_matcher(pool: &SqlitePool) -> Result<ProducerMatcher> {
    let producers = db::get_producers_with_aliases(pool).await?;
    let matcher = ProducerMatcher::new(&producers);
    if matcher.is_empty() {
        debug!("No producer names or aliases in the catalog");
    } else {
        debug!(
            "Loaded {} producers as {} search terms",
            producers.len(),
            matcher.len()
        );
    }
    Ok(matcher)
}

/// Match a filename against the catalog's current producer dictionary.
pub async fn match_producers_from_filename(
    pool: &SqlitePool,
    filename: &str,
    song_artist_ids: &[i64],
) -> Result<BTreeSet<i64>> {
    let matcher = load_matcher(pool).await?;
    Ok(matcher.match_filename(filename, song_artist_ids))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ProducerAlias;
    use crate::test_utils::{insert_alias, insert_artist, insert_producer, temp_db};
    use proptest::prelude::*;

    fn producer(id: i64, name: &str, aliases: &[(&str, Vec<i64>)]) -> Producer {
        Producer {
            id,
            name: name.to_string(),
            aliases: aliases
                .iter()
                .enumerate()
                .map(|(i, (alias, scope))| ProducerAlias {
                    id: id * 100 + i as i64,
                    alias: alias.to_string(),
                    artist_ids: scope.clone(),
                })
                .collect(),
        }
    }

    fn ids(values: &[i64]) -> BTreeSet<i64> {
        values.iter().copied().collect()
    }

    #[test]
    fn test_search_text_strips_extension() {
        assert_eq!(search_text("Song - Max Martin.mp3"), "song - max martin");
        assert_eq!(search_text("archive.tar.gz"), "archive.tar");
        assert_eq!(search_text("noext"), "noext");
        assert_eq!(search_text("trailing."), "trailing.");
        assert_eq!(search_text("dir.v2/file"), "dir.v2/file");
    }

    #[test]
    fn test_longest_term_wins() {
        let matcher = ProducerMatcher::new(&[
            producer(1, "Martin", &[]),
            producer(2, "Max Martin", &[]),
        ]);
        assert_eq!(matcher.match_filename("Song - Max Martin.mp3", &[]), ids(&[2]));
    }

    #[test]
    fn test_separate_occurrences_both_match() {
        let matcher = ProducerMatcher::new(&[
            producer(1, "Martin", &[]),
            producer(2, "Max Martin", &[]),
        ]);
        assert_eq!(
            matcher.match_filename("Max Martin x Martin.flac", &[]),
            ids(&[1, 2])
        );
    }

    #[test]
    fn test_scoped_alias() {
        let matcher = ProducerMatcher::new(&[producer(1, "Shellback", &[("shb", vec![5])])]);
        assert!(matcher.match_filename("Track (prod. SHB).mp3", &[7]).is_empty());
        assert_eq!(matcher.match_filename("Track (prod. SHB).mp3", &[5, 9]), ids(&[1]));
        assert!(matcher.match_filename("Track (prod. SHB).mp3", &[]).is_empty());
    }

    #[test]
    fn test_global_alias() {
        let matcher = ProducerMatcher::new(&[producer(3, "Metro Boomin", &[("metro", vec![])])]);
        assert_eq!(matcher.match_filename("Intro metro.wav", &[42]), ids(&[3]));
    }

    #[test]
    fn test_substring_pass_catches_glued_tags() {
        let matcher = ProducerMatcher::new(&[producer(4, "Prodtag", &[])]);
        assert_eq!(matcher.match_filename("SongNameProdTag.mp3", &[]), ids(&[4]));
    }

    #[test]
    fn test_word_pass_takes_span_before_substring_pass() {
        // "ace" as a word claims its span; "grace" only appears glued.
        let matcher = ProducerMatcher::new(&[producer(1, "ace", &[]), producer(2, "grace", &[])]);
        let matches = matcher.find_matches("ace gracefully", &[]);
        assert_eq!(matches[0], ProducerMatch { producer_id: 1, range: 0..3 });
        assert_eq!(matches[1], ProducerMatch { producer_id: 2, range: 4..9 });
    }

    #[test]
    fn test_empty_terms_are_ignored() {
        let matcher = ProducerMatcher::new(&[producer(1, "", &[("  ", vec![])])]);
        assert!(matcher.is_empty());
        assert!(matcher.match_filename("anything.mp3", &[]).is_empty());
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        let matcher = ProducerMatcher::new(&[producer(1, "D.J. (X)", &[])]);
        assert_eq!(matcher.match_filename("beat d.j. (x) mix.mp3", &[]), ids(&[1]));
        assert!(matcher.match_filename("beat dxjx mix.mp3", &[]).is_empty());
    }

    #[tokio::test]
    async fn test_match_from_catalog() {
        let (pool, _dir) = temp_db().await;
        let artist = insert_artist(&pool, "Ava").await;
        let max = insert_producer(&pool, "Max Martin").await;
        insert_alias(&pool, max, "mm", &[artist]).await;
        let other = insert_producer(&pool, "Martin").await;

        let found = match_producers_from_filename(&pool, "Hit (prod. MM).mp3", &[artist])
            .await
            .unwrap();
        assert_eq!(found, ids(&[max]));

        let found = match_producers_from_filename(&pool, "Hit - Martin.mp3", &[])
            .await
            .unwrap();
        assert_eq!(found, ids(&[other]));
    }

    fn arb_producers() -> impl Strategy<Value = Vec<Producer>> {
        prop::collection::vec(
            ("[a-c]{1,4}", prop::collection::vec(("[a-c]{1,3}", prop::collection::vec(1i64..4, 0..2)), 0..3)),
            1..5,
        )
        .prop_map(|entries| {
            entries
                .into_iter()
                .enumerate()
                .map(|(i, (name, aliases))| {
                    let aliases: Vec<(&str, Vec<i64>)> =
                        aliases.iter().map(|(a, s)| (a.as_str(), s.clone())).collect();
                    producer(i as i64 + 1, &name, &aliases)
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_accepted_ranges_never_overlap(
            producers in arb_producers(),
            text in "[a-c ]{0,24}",
            artists in prop::collection::vec(1i64..4, 0..3),
        ) {
            let matcher = ProducerMatcher::new(&producers);
            let matches = matcher.find_matches(&text, &artists);
            for (i, a) in matches.iter().enumerate() {
                for b in &matches[i + 1..] {
                    prop_assert!(a.range.end <= b.range.start || b.range.end <= a.range.start);
                }
            }
        }

        #[test]
        fn prop_out_of_scope_aliases_never_match(
            name in "[x-z]{3}",
            alias in "[a-c]{1,3}",
            text in "[a-c ]{0,24}",
        ) {
            let matcher = ProducerMatcher::new(&[producer(1, &name, &[(alias.as_str(), vec![9])])]);
            prop_assert!(matcher.match_filename(&text, &[1, 2]).is_empty());
        }
    }
}
