//! Ranking that merges fuzzy matches, spelling tolerance and selection
//! history into one ordered list.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use crate::cache::QueryCache;
use crate::config::RankingConfig;
use crate::distance::EditDistance;
use crate::index::PathIndex;
use crate::matcher::FuzzyMatcher;
use crate::normalize::fold;
use crate::result::{MatchSource, SearchMatch};

/// Base score of a spelling-fallback hit before distance and length
/// penalties. Sits well above any fuzzy score.
const TYPO_BASE_SCORE: i64 = 10_000;
const TYPO_DISTANCE_PENALTY: i64 = 100;

/// Candidate before boosts are applied.
#[derive(Debug, Clone, Copy)]
struct Seed {
    score: i64,
    source: MatchSource,
}

/// Searches one fixed corpus.
///
/// The corpus is folded once at construction and never changes; build a new
/// searcher to re-index. Attach the same [`QueryCache`] to the replacement
/// to keep the selection history.
#[derive(Debug)]
pub struct Searcher {
    index: PathIndex,
    matcher: FuzzyMatcher,
    ranking: RankingConfig,
    cache: Option<Arc<QueryCache>>,
}

impl Searcher {
    /// Indexes `paths` with a fresh cache and default ranking.
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_cache(paths, Arc::new(QueryCache::new()))
    }

    /// Indexes `paths` sharing an existing cache.
    pub fn with_cache<I, S>(paths: I, cache: Arc<QueryCache>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_config(paths, RankingConfig::default(), Some(cache))
    }

    /// Indexes `paths` with no selection history at all. Searches then rely
    /// on fuzzy and spelling signals only.
    pub fn without_cache<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_config(paths, RankingConfig::default(), None)
    }

    /// Indexes `paths` with explicit ranking settings.
    pub fn with_config<I, S>(
        paths: I,
        ranking: RankingConfig,
        cache: Option<Arc<QueryCache>>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let index = PathIndex::new(paths);
        tracing::debug!(paths = index.len(), "built path index");

        Self {
            matcher: FuzzyMatcher::with_config(&ranking),
            index,
            ranking,
            cache,
        }
    }

    /// Best matching paths for `query`, at most `max_results` of them.
    pub fn search(&self, query: &str) -> Vec<String> {
        self.search_matches(query)
            .into_iter()
            .map(|m| m.path)
            .collect()
    }

    /// Like [`search`](Self::search) but keeps scores and provenance.
    pub fn search_matches(&self, query: &str) -> Vec<SearchMatch> {
        let query = fold(query);
        if query.is_empty() || self.index.is_empty() {
            return Vec::new();
        }
        let query_len = query.chars().count();
        let query_words: Vec<&str> = query
            .split_whitespace()
            .filter(|w| w.chars().count() >= 2)
            .collect();

        let boosts = self
            .cache
            .as_ref()
            .map(|cache| cache.boost_scores(&query))
            .unwrap_or_default();

        let mut distance = EditDistance::new();
        let mut seeds: HashMap<usize, Seed> = HashMap::new();

        let fuzzy = self.matcher.find(&query, self.index.normalized_full());
        let bonus_limit = self.ranking.word_bonus_limit.unwrap_or(usize::MAX);
        for (rank, hit) in fuzzy.iter().enumerate() {
            let mut score = hit.score;
            if rank < bonus_limit {
                score += self.word_bonus(&query_words, hit.index, &mut distance);
            }
            seeds.insert(
                hit.index,
                Seed {
                    score,
                    source: MatchSource::Fuzzy,
                },
            );
        }

        if seeds.len() < self.ranking.fallback_threshold && query_len > 1 {
            self.spelling_fallback(&query, query_len, &query_words, &mut seeds, &mut distance);
        }

        for (path, &boost) in &boosts {
            if boost <= 0 {
                continue;
            }
            if let Some(index) = self.index.position(path) {
                seeds.entry(index).or_insert(Seed {
                    score: boost,
                    source: MatchSource::Cache,
                });
            }
        }

        let mut ranked: Vec<SearchMatch> = seeds
            .into_iter()
            .filter_map(|(index, seed)| {
                let path = self.index.path(index)?;
                let boost = match boosts.get(path) {
                    // A cache-only seed already carries its boost.
                    Some(&boost) if seed.score != boost => boost,
                    _ => 0,
                };
                Some(SearchMatch {
                    path: path.to_string(),
                    index,
                    score: seed.score + boost,
                    boost,
                    source: seed.source,
                })
            })
            .collect();

        ranked.sort_unstable();
        ranked.truncate(self.ranking.max_results);

        tracing::trace!(
            query = %query,
            fuzzy = fuzzy.len(),
            boosted = boosts.len(),
            returned = ranked.len(),
            "search complete"
        );

        ranked
    }

    /// Scores every file name whose opening characters are within a few
    /// edits of the query. Only replaces a seed it beats.
    fn spelling_fallback(
        &self,
        query: &str,
        query_len: usize,
        query_words: &[&str],
        seeds: &mut HashMap<usize, Seed>,
        distance: &mut EditDistance,
    ) {
        let threshold = (query_len / 3 + 1).max(3);

        for index in 0..self.index.len() {
            let (name, name_len) = self.index.name(index);
            if name_len < query_len {
                continue;
            }

            let mut best = distance.distance(query, char_prefix(name, query_len));
            if name_len > query_len {
                best = best.min(distance.distance(query, char_prefix(name, query_len + 1)));
            }
            if best >= threshold {
                continue;
            }

            let score = TYPO_BASE_SCORE - TYPO_DISTANCE_PENALTY * best as i64
                - ((name_len - query_len) / 2) as i64
                + self.word_bonus(query_words, index, distance);

            match seeds.entry(index) {
                Entry::Occupied(mut slot) => {
                    if score > slot.get().score {
                        slot.insert(Seed {
                            score,
                            source: MatchSource::Typo,
                        });
                    }
                }
                Entry::Vacant(slot) => {
                    slot.insert(Seed {
                        score,
                        source: MatchSource::Typo,
                    });
                }
            }
        }
    }

    /// `word_bonus` for every query word that equals, or is one edit away
    /// from, a word of the candidate's file name.
    fn word_bonus(&self, query_words: &[&str], index: usize, distance: &mut EditDistance) -> i64 {
        if query_words.is_empty() {
            return 0;
        }
        let (name, _) = self.index.name(index);

        let matched = query_words
            .iter()
            .filter(|query_word| {
                name.split_whitespace()
                    .filter(|w| w.chars().count() >= 2)
                    .any(|name_word| words_match(query_word, name_word, distance))
            })
            .count();

        self.ranking.word_bonus * matched as i64
    }

    /// Records that `path` was chosen for `query`. No-op without a cache.
    pub fn record_selection(&self, query: &str, path: &str) {
        if let Some(cache) = &self.cache {
            cache.record_selection(query, path);
        }
    }

    /// The attached cache, if any.
    pub fn cache(&self) -> Option<&Arc<QueryCache>> {
        self.cache.as_ref()
    }

    /// Forgets all selection history in the attached cache.
    pub fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.clear();
        }
    }

    /// The folded corpus.
    pub fn index(&self) -> &PathIndex {
        &self.index
    }

    /// Ranking settings in effect.
    pub fn ranking(&self) -> &RankingConfig {
        &self.ranking
    }

    /// Returns the number of indexed paths.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns whether the corpus is empty.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

fn words_match(query_word: &str, name_word: &str, distance: &mut EditDistance) -> bool {
    if query_word == name_word {
        return true;
    }
    query_word.chars().count() >= 3
        && name_word.chars().count() >= 3
        && distance.distance(query_word, name_word) <= 1
}

/// The first `n` characters of `s`, or all of it when shorter.
fn char_prefix(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((end, _)) => &s[..end],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Vec<&'static str> {
        vec![
            "/p/main.go",
            "/p/main_test.go",
            "/p/main_server.go",
            "/p/config.yaml",
        ]
    }

    #[test]
    fn test_char_prefix() {
        assert_eq!(char_prefix("main.go", 4), "main");
        assert_eq!(char_prefix("đường", 2), "đư");
        assert_eq!(char_prefix("ab", 5), "ab");
        assert_eq!(char_prefix("ab", 0), "");
    }

    #[test]
    fn test_words_match() {
        let mut distance = EditDistance::new();
        assert!(words_match("main", "main", &mut distance));
        assert!(!words_match("mian", "main", &mut distance));
        assert!(words_match("mainn", "main", &mut distance));
        assert!(!words_match("ab", "ac", &mut distance));
    }

    #[test]
    fn test_empty_query_and_empty_corpus() {
        let searcher = Searcher::new(corpus());
        assert!(searcher.search("").is_empty());
        assert!(searcher.search("   ").is_empty());

        let empty = Searcher::new(Vec::<String>::new());
        assert!(empty.search("main").is_empty());
    }

    #[test]
    fn test_typo_scores() {
        let searcher = Searcher::without_cache(corpus());
        let matches = searcher.search_matches("main");

        let score_of = |path: &str| {
            matches
                .iter()
                .find(|m| m.path == path)
                .map(|m| (m.score, m.source))
        };
        assert_eq!(score_of("/p/main.go"), Some((9999, MatchSource::Typo)));
        assert_eq!(score_of("/p/main_test.go"), Some((9996, MatchSource::Typo)));
        assert_eq!(score_of("/p/main_server.go"), Some((9995, MatchSource::Typo)));
        assert_eq!(matches[0].path, "/p/main.go");
    }

    #[test]
    fn test_selection_boost_reorders() {
        let searcher = Searcher::new(corpus());
        for _ in 0..3 {
            searcher.record_selection("main", "/p/main_server.go");
        }

        let matches = searcher.search_matches("main");
        assert_eq!(matches[0].path, "/p/main_server.go");
        assert_eq!(matches[0].score, 9995 + 15_000);
        assert_eq!(matches[0].boost, 15_000);
        assert!(matches[0].boosted());
    }

    #[test]
    fn test_cache_only_result_is_not_double_counted() {
        let searcher = Searcher::new(corpus());
        searcher.record_selection("settings", "/p/config.yaml");

        let matches = searcher.search_matches("settings");
        let hit = matches
            .iter()
            .find(|m| m.path == "/p/config.yaml")
            .expect("cached file surfaces");
        assert_eq!(hit.source, MatchSource::Cache);
        assert_eq!(hit.score, 5000);
        assert_eq!(hit.boost, 0);
    }

    #[test]
    fn test_cached_path_outside_corpus_is_ignored() {
        let cache = Arc::new(QueryCache::new());
        cache.record_selection("main", "/elsewhere/main.go");

        let searcher = Searcher::with_cache(corpus(), cache);
        assert!(!searcher.search("main").contains(&"/elsewhere/main.go".to_string()));
    }

    #[test]
    fn test_word_bonus_prefers_whole_words() {
        let searcher = Searcher::without_cache(vec![
            "/music/ve mua thu.mp3",
            "/music/vemuathu_remix.mp3",
        ]);

        let results = searcher.search("ve mua thu");
        assert_eq!(results[0], "/music/ve mua thu.mp3");
    }

    #[test]
    fn test_word_bonus_limit() {
        let fuzzy_only = RankingConfig {
            fallback_threshold: 0,
            ..Default::default()
        };
        let limited = RankingConfig {
            word_bonus_limit: Some(0),
            ..fuzzy_only.clone()
        };

        let searcher = Searcher::with_config(vec!["/docs/report final"], limited, None);
        let limited = searcher.search_matches("report final")[0].score;

        let searcher = Searcher::with_config(vec!["/docs/report final"], fuzzy_only, None);
        let full = searcher.search_matches("report final")[0].score;

        assert_eq!(full - limited, 2 * 3000);
    }

    #[test]
    fn test_max_results() {
        let paths: Vec<String> = (0..50).map(|i| format!("/src/file_{i}.rs")).collect();
        let ranking = RankingConfig {
            max_results: 7,
            ..Default::default()
        };
        let searcher = Searcher::with_config(paths, ranking, None);

        assert_eq!(searcher.search("file").len(), 7);
    }

    #[test]
    fn test_clear_cache() {
        let searcher = Searcher::new(corpus());
        searcher.record_selection("main", "/p/main_server.go");
        searcher.clear_cache();

        assert!(searcher.cache().is_some_and(|c| c.is_empty()));
        assert_eq!(searcher.search("main")[0], "/p/main.go");
    }

    #[test]
    fn test_without_cache_ignores_selections() {
        let searcher = Searcher::without_cache(corpus());
        searcher.record_selection("main", "/p/main_server.go");

        assert!(searcher.cache().is_none());
        assert_eq!(searcher.search("main")[0], "/p/main.go");
    }
}
