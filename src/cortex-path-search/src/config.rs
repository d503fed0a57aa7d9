//! Configuration types for path search.

use std::path::PathBuf;

/// Bounds and weights for the [`QueryCache`](crate::QueryCache).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of distinct queries remembered.
    /// The least recently used query is dropped first.
    pub max_queries: usize,

    /// Maximum number of selected files remembered per query.
    /// The least selected file is dropped first.
    pub max_per_query: usize,

    /// Base boost multiplied by query similarity and selection count.
    pub boost_score: i64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_queries: 100,
            max_per_query: 5,
            boost_score: 5000,
        }
    }
}

/// Tuning knobs for ranking in [`Searcher`](crate::Searcher).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankingConfig {
    /// Maximum number of results returned by a search.
    pub max_results: usize,

    /// Corpus size at which fuzzy matching switches to the parallel path.
    pub parallel_threshold: usize,

    /// Upper bound on worker chunks for parallel fuzzy matching.
    pub max_workers: usize,

    /// Score added per query word found in a candidate's file name.
    pub word_bonus: i64,

    /// Only the best `n` fuzzy matches receive the word bonus.
    /// `None` applies it to every match.
    pub word_bonus_limit: Option<usize>,

    /// The typo fallback runs while fewer than this many candidates
    /// have been collected.
    pub fallback_threshold: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            max_results: 20,
            parallel_threshold: 1000,
            max_workers: 16,
            word_bonus: 3000,
            word_bonus_limit: None,
            fallback_threshold: 20,
        }
    }
}

/// Configuration for [`PathSearch`](crate::PathSearch), covering the
/// directory walk that produces the corpus as well as ranking and caching.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Root directory to walk.
    pub root: PathBuf,

    /// Maximum depth to traverse into subdirectories.
    /// `None` means unlimited depth.
    pub max_depth: Option<usize>,

    /// Whether to follow symbolic links.
    pub follow_symlinks: bool,

    /// Whether to respect .gitignore files.
    pub respect_gitignore: bool,

    /// Whether to include hidden files (starting with .).
    pub include_hidden: bool,

    /// Directories to skip by name.
    pub exclude_dirs: Vec<String>,

    /// Extra gitignore-style patterns to skip.
    pub ignore_patterns: Vec<String>,

    /// Ranking configuration handed to every searcher built from this config.
    pub ranking: RankingConfig,

    /// Cache configuration.
    pub cache_config: CacheConfig,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            max_depth: None,
            follow_symlinks: false,
            respect_gitignore: true,
            include_hidden: false,
            exclude_dirs: vec![
                ".git".to_string(),
                ".hg".to_string(),
                ".svn".to_string(),
                "node_modules".to_string(),
                "target".to_string(),
                "__pycache__".to_string(),
                ".venv".to_string(),
            ],
            ignore_patterns: Vec::new(),
            ranking: RankingConfig::default(),
            cache_config: CacheConfig::default(),
        }
    }
}

impl SearchConfig {
    /// Creates a new configuration with the specified root directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Default::default()
        }
    }

    /// Creates a builder for constructing a configuration.
    pub fn builder(root: impl Into<PathBuf>) -> SearchConfigBuilder {
        SearchConfigBuilder::new(root)
    }

    /// Checks if a directory should be skipped.
    pub fn should_exclude_dir(&self, name: &str) -> bool {
        self.exclude_dirs.iter().any(|d| d == name)
    }
}

/// Builder for creating `SearchConfig` instances.
#[derive(Debug)]
pub struct SearchConfigBuilder {
    config: SearchConfig,
}

impl SearchConfigBuilder {
    /// Creates a new builder with the specified root directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            config: SearchConfig::new(root),
        }
    }

    /// Sets the maximum traversal depth.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.config.max_depth = Some(depth);
        self
    }

    /// Sets whether to follow symbolic links.
    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.config.follow_symlinks = follow;
        self
    }

    /// Sets whether to respect .gitignore files.
    pub fn respect_gitignore(mut self, respect: bool) -> Self {
        self.config.respect_gitignore = respect;
        self
    }

    /// Sets whether to include hidden files.
    pub fn include_hidden(mut self, include: bool) -> Self {
        self.config.include_hidden = include;
        self
    }

    /// Sets directories to skip.
    pub fn exclude_dirs(mut self, dirs: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.config.exclude_dirs = dirs.into_iter().map(Into::into).collect();
        self
    }

    /// Adds a single ignore pattern.
    pub fn add_ignore_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.config.ignore_patterns.push(pattern.into());
        self
    }

    /// Sets the maximum number of results per search.
    pub fn max_results(mut self, max: usize) -> Self {
        self.config.ranking.max_results = max;
        self
    }

    /// Sets the corpus size that enables parallel fuzzy matching.
    pub fn parallel_threshold(mut self, threshold: usize) -> Self {
        self.config.ranking.parallel_threshold = threshold;
        self
    }

    /// Sets the worker cap for parallel fuzzy matching.
    pub fn max_workers(mut self, workers: usize) -> Self {
        self.config.ranking.max_workers = workers;
        self
    }

    /// Restricts the word bonus to the best `limit` fuzzy matches.
    pub fn word_bonus_limit(mut self, limit: usize) -> Self {
        self.config.ranking.word_bonus_limit = Some(limit);
        self
    }

    /// Sets the number of remembered queries.
    pub fn cache_max_queries(mut self, max: usize) -> Self {
        self.config.cache_config.max_queries = max;
        self
    }

    /// Sets the number of remembered files per query.
    pub fn cache_max_per_query(mut self, max: usize) -> Self {
        self.config.cache_config.max_per_query = max;
        self
    }

    /// Sets the base cache boost.
    pub fn boost_score(mut self, score: i64) -> Self {
        self.config.cache_config.boost_score = score;
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> SearchConfig {
        self.config
    }
}
