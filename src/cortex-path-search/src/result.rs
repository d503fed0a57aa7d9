//! Search result types.

use std::cmp::Ordering;

/// Signal that first placed a path in the candidate set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchSource {
    /// Query characters appear in order in the folded path.
    Fuzzy,

    /// File name starts with something within edit distance of the query.
    Typo,

    /// Only present because it was selected for a similar query before.
    Cache,
}

impl MatchSource {
    /// Returns a human-readable description of the source.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Fuzzy => "fuzzy match",
            Self::Typo => "spelling fallback",
            Self::Cache => "selection history",
        }
    }
}

/// A single ranked path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchMatch {
    /// The path as it was indexed.
    pub path: String,

    /// Position of the path in the indexed corpus.
    pub index: usize,

    /// Final score, boost included (higher is better).
    pub score: i64,

    /// Cache boost that contributed to `score`, or 0.
    pub boost: i64,

    /// Signal that seeded this match.
    pub source: MatchSource,
}

impl SearchMatch {
    /// Returns whether selection history raised this match.
    pub fn boosted(&self) -> bool {
        self.boost > 0
    }
}

impl PartialOrd for SearchMatch {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SearchMatch {
    fn cmp(&self, other: &Self) -> Ordering {
        // Higher score first, then shorter path, then corpus order
        other
            .score
            .cmp(&self.score)
            .then_with(|| self.path.len().cmp(&other.path.len()))
            .then_with(|| self.index.cmp(&other.index))
    }
}

/// Response of [`PathSearch::search`](crate::PathSearch::search).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Files previously chosen for this or a similar query.
    pub cached_files: Vec<String>,

    /// Ranked matches, excluding anything already in `cached_files`.
    pub results: Vec<SearchMatch>,
}

/// Snapshot of the selection history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheInfo {
    /// Number of remembered queries.
    pub size: usize,

    /// Most recent queries, newest first.
    pub recent_queries: Vec<String>,

    /// Most recently selected files.
    pub recent_files: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(path: &str, index: usize, score: i64) -> SearchMatch {
        SearchMatch {
            path: path.to_string(),
            index,
            score,
            boost: 0,
            source: MatchSource::Fuzzy,
        }
    }

    #[test]
    fn test_search_match_ordering() {
        let mut matches = [
            m("another.rs", 0, 50),
            m("very/long/path.rs", 1, 100),
            m("short.rs", 2, 100),
            m("other.rs", 3, 100),
        ];
        matches.sort();

        // Higher score first
        assert_eq!(matches[0].score, 100);
        assert_eq!(matches[3].score, 50);

        // Same score: shorter path first, then earlier index
        assert_eq!(matches[0].path, "short.rs");
        assert_eq!(matches[1].path, "other.rs");
        assert_eq!(matches[2].path, "very/long/path.rs");
    }

    #[test]
    fn test_boosted() {
        let mut hit = m("a.rs", 0, 10);
        assert!(!hit.boosted());
        hit.boost = 5000;
        assert!(hit.boosted());
    }

    #[test]
    fn test_source_description() {
        assert_eq!(MatchSource::Fuzzy.description(), "fuzzy match");
        assert_eq!(MatchSource::Cache.description(), "selection history");
    }
}
