#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::missing_errors_doc,
    clippy::uninlined_format_args
)]
//! Cortex Path Search - diacritic-aware fuzzy path finder that learns from
//! selections.
//!
//! Queries and paths are folded (lowercased, Vietnamese and other combining
//! diacritics stripped) before matching, so `duong` finds `Đường.txt`. Each
//! search combines three signals:
//!
//! - a greedy subsequence match that favors word starts and contiguity,
//! - a spelling fallback that compares the query to file name prefixes by
//!   edit distance, so `mian` still finds `main.go`,
//! - a boost from a bounded [`QueryCache`] of earlier selections, shared
//!   between similar queries.
//!
//! [`Searcher`] is the synchronous core over a fixed corpus. [`PathSearch`]
//! wraps it with directory walking via the `ignore` crate and an index that
//! can be rebuilt in the background while the cache carries over.
//!
//! # Example
//!
//! ```
//! use cortex_path_search::Searcher;
//!
//! let searcher = Searcher::new(["/p/main.go", "/p/main_test.go", "/p/main_server.go"]);
//! assert_eq!(searcher.search("mian")[0], "/p/main.go");
//!
//! for _ in 0..3 {
//!     searcher.record_selection("main", "/p/main_server.go");
//! }
//! assert_eq!(searcher.search("main")[0], "/p/main_server.go");
//! ```

mod cache;
mod config;
mod distance;
mod error;
mod index;
mod matcher;
mod normalize;
mod result;
mod searcher;
mod service;
mod similarity;
mod walk;

pub use cache::{CacheEntry, CacheStats, QueryCache};
pub use config::{CacheConfig, RankingConfig, SearchConfig, SearchConfigBuilder};
pub use distance::{EditDistance, levenshtein};
pub use error::{SearchError, SearchResult};
pub use index::{PathIndex, file_name};
pub use matcher::{FuzzyMatch, FuzzyMatcher};
pub use normalize::{fold, fold_char, normalize};
pub use result::{CacheInfo, MatchSource, SearchMatch, SearchOutcome};
pub use searcher::Searcher;
pub use service::PathSearch;
pub use similarity::query_similarity;
pub use walk::collect_paths;

/// Re-export anyhow for convenience
pub use anyhow;
