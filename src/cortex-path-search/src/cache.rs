//! Selection history that feeds back into ranking.
//!
//! Every time a user picks a file for a query, the pick is recorded under
//! the folded query text. Later searches turn that history into a boost for
//! the same file, scaled by how closely the new query resembles each
//! remembered one. Both the number of queries and the number of files per
//! query are bounded.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::config::CacheConfig;
use crate::normalize::fold;
use crate::similarity::query_similarity;

/// Maximum character-length gap between the current query and a remembered
/// one before the remembered one is skipped by [`QueryCache::cached_files`].
const CACHED_FILES_LENGTH_WINDOW: usize = 5;

/// A file remembered under one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// Path as it was recorded.
    pub file_path: String,

    /// How many times the file was selected for the query. Always ≥ 1.
    pub select_count: u32,
}

/// Counters describing the cache contents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of remembered queries.
    pub queries: usize,

    /// Number of (query, file) entries across all queries.
    pub entries: usize,

    /// Sum of all selection counts.
    pub selections: u64,
}

#[derive(Debug, Default)]
struct CacheState {
    buckets: HashMap<String, Vec<CacheEntry>>,
    /// Least recently used first.
    order: Vec<String>,
    config: CacheConfig,
}

/// Thread-safe, bounded store of past selections keyed by folded query.
///
/// Mutations take the write lock; every getter takes the read lock, so any
/// number of searches can read boosts concurrently. Share it between
/// searchers with an `Arc` to keep learned behavior across re-indexing.
#[derive(Debug, Default)]
pub struct QueryCache {
    state: RwLock<CacheState>,
}

impl QueryCache {
    /// Creates an empty cache with default bounds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty cache with custom bounds.
    pub fn with_config(mut config: CacheConfig) -> Self {
        config.max_per_query = config.max_per_query.max(1);
        Self {
            state: RwLock::new(CacheState {
                config,
                ..Default::default()
            }),
        }
    }

    /// Records that `file_path` was chosen for `query`.
    ///
    /// Empty inputs are ignored, as are queries that fold to nothing.
    pub fn record_selection(&self, query: &str, file_path: &str) {
        if query.is_empty() || file_path.is_empty() {
            return;
        }
        let key = fold(query);
        if key.is_empty() {
            return;
        }

        let mut state = self.state.write();
        let max_per_query = state.config.max_per_query;

        let bucket = state.buckets.entry(key.clone()).or_default();
        if let Some(entry) = bucket.iter_mut().find(|e| e.file_path == file_path) {
            entry.select_count = entry.select_count.saturating_add(1);
        } else {
            if bucket.len() >= max_per_query {
                if let Some(evicted) = evict_least_selected(bucket) {
                    tracing::debug!(
                        query = %key,
                        path = %evicted.file_path,
                        "evicted least selected cache entry"
                    );
                }
            }
            bucket.push(CacheEntry {
                file_path: file_path.to_string(),
                select_count: 1,
            });
        }

        move_to_back(&mut state.order, &key);
        state.evict_queries();
    }

    /// Boost per file path for `query`, combining every remembered query
    /// with non-zero similarity. The strongest contribution wins.
    pub fn boost_scores(&self, query: &str) -> HashMap<String, i64> {
        let mut boosts = HashMap::new();
        let query = fold(query);
        if query.is_empty() {
            return boosts;
        }

        let state = self.state.read();
        for (key, bucket) in &state.buckets {
            let similarity = query_similarity(&query, key);
            if similarity <= 0 {
                continue;
            }
            for entry in bucket {
                let boost =
                    state.config.boost_score * similarity * i64::from(entry.select_count) / 100;
                boosts
                    .entry(entry.file_path.clone())
                    .and_modify(|b: &mut i64| *b = (*b).max(boost))
                    .or_insert(boost);
            }
        }

        boosts
    }

    /// Most recently used queries first.
    pub fn recent_queries(&self, limit: usize) -> Vec<String> {
        let state = self.state.read();
        state.order.iter().rev().take(limit).cloned().collect()
    }

    /// Files previously chosen for `query` or for similar queries, best
    /// first. Exact-query picks score `100 * count`, similar-query picks
    /// `similarity * count`; each path keeps its best score.
    pub fn cached_files(&self, query: &str, limit: usize) -> Vec<String> {
        let query = fold(query);
        if query.is_empty() || limit == 0 {
            return Vec::new();
        }
        let query_len = query.chars().count();

        let state = self.state.read();
        let mut scores: HashMap<&str, i64> = HashMap::new();

        if let Some(bucket) = state.buckets.get(&query) {
            for entry in bucket {
                keep_best(
                    &mut scores,
                    &entry.file_path,
                    100 * i64::from(entry.select_count),
                );
            }
        }

        for (key, bucket) in &state.buckets {
            if *key == query || key.chars().count().abs_diff(query_len) > CACHED_FILES_LENGTH_WINDOW
            {
                continue;
            }
            let similarity = query_similarity(&query, key);
            if similarity <= 0 {
                continue;
            }
            for entry in bucket {
                keep_best(
                    &mut scores,
                    &entry.file_path,
                    similarity * i64::from(entry.select_count),
                );
            }
        }

        let mut ranked: Vec<(&str, i64)> = scores.into_iter().collect();
        ranked.sort_unstable_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
        ranked
            .into_iter()
            .take(limit)
            .map(|(path, _)| path.to_string())
            .collect()
    }

    /// Every remembered file, most recently touched query first, then by
    /// total selections across all queries.
    pub fn all_recent_files(&self, limit: usize) -> Vec<String> {
        if limit == 0 {
            return Vec::new();
        }

        let state = self.state.read();
        // (most recent position in the order list, cumulative selections)
        let mut files: HashMap<&str, (usize, u64)> = HashMap::new();
        for (position, key) in state.order.iter().enumerate() {
            let Some(bucket) = state.buckets.get(key) else {
                continue;
            };
            for entry in bucket {
                let slot = files
                    .entry(entry.file_path.as_str())
                    .or_insert((position, 0));
                slot.0 = slot.0.max(position);
                slot.1 += u64::from(entry.select_count);
            }
        }

        let mut ranked: Vec<(&str, (usize, u64))> = files.into_iter().collect();
        ranked.sort_unstable_by(|(path_a, (pos_a, count_a)), (path_b, (pos_b, count_b))| {
            pos_b
                .cmp(pos_a)
                .then(count_b.cmp(count_a))
                .then(path_a.cmp(path_b))
        });
        ranked
            .into_iter()
            .take(limit)
            .map(|(path, _)| path.to_string())
            .collect()
    }

    /// Changes the query bound, evicting least recently used queries now.
    pub fn set_max_queries(&self, max: usize) {
        let mut state = self.state.write();
        state.config.max_queries = max;
        state.evict_queries();
    }

    /// Changes the base boost applied by [`boost_scores`](Self::boost_scores).
    pub fn set_boost_score(&self, score: i64) {
        self.state.write().config.boost_score = score;
    }

    /// Changes the per-query bound, trimming oversized buckets now.
    pub fn set_max_per_query(&self, max: usize) {
        let mut state = self.state.write();
        let max = max.max(1);
        state.config.max_per_query = max;
        for bucket in state.buckets.values_mut() {
            while bucket.len() > max {
                if evict_least_selected(bucket).is_none() {
                    break;
                }
            }
        }
    }

    /// Number of remembered queries.
    pub fn len(&self) -> usize {
        self.state.read().buckets.len()
    }

    /// Returns whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.state.read().buckets.is_empty()
    }

    /// Forgets every selection. Bounds are kept.
    pub fn clear(&self) {
        let mut state = self.state.write();
        state.buckets.clear();
        state.order.clear();
    }

    /// Returns cache statistics.
    pub fn stats(&self) -> CacheStats {
        let state = self.state.read();
        let mut stats = CacheStats {
            queries: state.buckets.len(),
            ..Default::default()
        };
        for bucket in state.buckets.values() {
            stats.entries += bucket.len();
            stats.selections += bucket
                .iter()
                .map(|e| u64::from(e.select_count))
                .sum::<u64>();
        }
        stats
    }

    /// Current bounds and boost.
    pub fn config(&self) -> CacheConfig {
        self.state.read().config.clone()
    }
}

impl CacheState {
    fn evict_queries(&mut self) {
        let excess = self.order.len().saturating_sub(self.config.max_queries);
        if excess == 0 {
            return;
        }
        for key in self.order.drain(..excess) {
            self.buckets.remove(&key);
            tracing::debug!(query = %key, "evicted least recently used query");
        }
    }
}

fn keep_best<'a>(scores: &mut HashMap<&'a str, i64>, path: &'a str, score: i64) {
    let best = scores.entry(path).or_insert(score);
    *best = (*best).max(score);
}

/// Removes the entry with the lowest count; the earliest one on ties.
fn evict_least_selected(bucket: &mut Vec<CacheEntry>) -> Option<CacheEntry> {
    let (idx, _) = bucket
        .iter()
        .enumerate()
        .min_by_key(|(_, e)| e.select_count)?;
    Some(bucket.remove(idx))
}

fn move_to_back(order: &mut Vec<String>, key: &str) {
    match order.iter().position(|k| k == key) {
        Some(pos) => {
            let key = order.remove(pos);
            order.push(key);
        }
        None => order.push(key.to_string()),
    }
}
