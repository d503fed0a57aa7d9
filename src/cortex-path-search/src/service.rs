//! Async handle that owns a swappable index and a long-lived cache.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::RwLock;

use crate::cache::QueryCache;
use crate::config::SearchConfig;
use crate::error::{SearchError, SearchResult};
use crate::result::{CacheInfo, SearchOutcome};
use crate::searcher::Searcher;
use crate::walk;

const CACHED_FILES_LIMIT: usize = 5;
const RECENT_QUERIES_LIMIT: usize = 10;
const RECENT_FILES_LIMIT: usize = 5;

/// Path search over a directory with selection history that survives
/// re-indexing.
///
/// Cloning yields another handle to the same index and cache.
///
/// # Example
///
/// ```no_run
/// use cortex_path_search::PathSearch;
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let search = PathSearch::new("/path/to/project");
///     search.build_index().await?;
///
///     let outcome = search.search("main").await;
///     for hit in &outcome.results {
///         println!("{}: {}", hit.score, hit.path);
///     }
///     if let Some(first) = outcome.results.first() {
///         search.record_selection("main", &first.path);
///     }
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct PathSearch {
    /// Configuration for walking and ranking.
    config: SearchConfig,

    /// Selection history, shared by every searcher this handle builds.
    cache: Arc<QueryCache>,

    /// Current searcher; `None` until the first index is built.
    searcher: Arc<RwLock<Option<Arc<Searcher>>>>,

    /// Set while a directory walk is in flight.
    building: Arc<AtomicBool>,
}

/// Clears the building flag however the build ends.
struct BuildGuard<'a>(&'a AtomicBool);

impl Drop for BuildGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl PathSearch {
    /// Creates a handle with default configuration.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_config(SearchConfig::new(root))
    }

    /// Creates a handle with a fresh cache built from `config.cache_config`.
    pub fn with_config(config: SearchConfig) -> Self {
        let cache = Arc::new(QueryCache::with_config(config.cache_config.clone()));
        Self::with_cache(config, cache)
    }

    /// Creates a handle around an existing cache.
    pub fn with_cache(config: SearchConfig, cache: Arc<QueryCache>) -> Self {
        Self {
            config,
            cache,
            searcher: Arc::new(RwLock::new(None)),
            building: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Returns the root directory being searched.
    pub fn root(&self) -> &Path {
        &self.config.root
    }

    /// Returns the current configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Walks the root directory and swaps in a searcher over the result.
    ///
    /// Searches keep using the previous index until the new one is ready.
    /// Returns the number of indexed paths.
    pub async fn build_index(&self) -> SearchResult<usize> {
        if self.building.swap(true, Ordering::AcqRel) {
            return Err(SearchError::IndexBuilding);
        }
        let _guard = BuildGuard(&self.building);

        let config = self.config.clone();
        let cache = Arc::clone(&self.cache);
        let searcher = tokio::task::spawn_blocking(move || -> SearchResult<Searcher> {
            let paths = walk::collect_paths(&config)?;
            Ok(Searcher::with_config(paths, config.ranking, Some(cache)))
        })
        .await
        .map_err(SearchError::task_failed)
        .and_then(|built| built)
        .inspect_err(|e| tracing::warn!("Index build failed: {}", e))?;

        Ok(self.install(searcher).await)
    }

    /// Swaps in a searcher over a caller-supplied corpus.
    pub async fn index_paths<I, S>(&self, paths: I) -> SearchResult<usize>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let paths: Vec<String> = paths.into_iter().map(Into::into).collect();
        let ranking = self.config.ranking.clone();
        let cache = Arc::clone(&self.cache);
        let searcher = tokio::task::spawn_blocking(move || {
            Searcher::with_config(paths, ranking, Some(cache))
        })
        .await
        .map_err(SearchError::task_failed)?;

        Ok(self.install(searcher).await)
    }

    async fn install(&self, searcher: Searcher) -> usize {
        let count = searcher.len();
        *self.searcher.write().await = Some(Arc::new(searcher));
        tracing::debug!(root = %self.config.root.display(), files = count, "index swapped");
        count
    }

    /// Searches the current index.
    ///
    /// Files chosen before for this or a similar query are listed in
    /// `cached_files` and left out of `results`. Both are empty before the
    /// first index is built.
    pub async fn search(&self, query: &str) -> SearchOutcome {
        let Some(searcher) = self.searcher().await else {
            return SearchOutcome::default();
        };

        let cached_files = self.cache.cached_files(query, CACHED_FILES_LIMIT);
        let results = searcher
            .search_matches(query)
            .into_iter()
            .filter(|m| !cached_files.contains(&m.path))
            .take(self.config.ranking.max_results)
            .collect();

        SearchOutcome {
            cached_files,
            results,
        }
    }

    /// Records that `path` was chosen for `query`.
    pub fn record_selection(&self, query: &str, path: &str) {
        self.cache.record_selection(query, path);
    }

    /// Summary of the selection history.
    pub fn cache_info(&self) -> CacheInfo {
        CacheInfo {
            size: self.cache.len(),
            recent_queries: self.cache.recent_queries(RECENT_QUERIES_LIMIT),
            recent_files: self.cache.all_recent_files(RECENT_FILES_LIMIT),
        }
    }

    /// The shared selection history.
    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }

    /// Forgets all selection history.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// The current searcher, if an index has been built.
    pub async fn searcher(&self) -> Option<Arc<Searcher>> {
        self.searcher.read().await.clone()
    }

    /// Returns whether an index has been built.
    pub async fn is_indexed(&self) -> bool {
        self.searcher.read().await.is_some()
    }

    /// Returns the number of indexed paths.
    pub async fn file_count(&self) -> usize {
        self.searcher
            .read()
            .await
            .as_ref()
            .map_or(0, |searcher| searcher.len())
    }
}
