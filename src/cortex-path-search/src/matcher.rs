//! Greedy subsequence matching with word-start preference.
//!
//! A pattern matches a target when every pattern character appears in the
//! target in order. Each pattern character is placed by a single forward
//! scan: a match at a word start is taken immediately, otherwise the first
//! plain match is kept while the scan looks ahead for a word start. The
//! placement is not globally optimal, which keeps scoring cheap and stable.

use rayon::prelude::*;

use crate::config::RankingConfig;
use crate::normalize::fold_char;

const WORD_START_SCORE: i64 = 80;
const PLAIN_SCORE: i64 = 10;
const ADJACENT_BONUS: i64 = 40;

const SEPARATORS: [char; 7] = [' ', '/', '\\', '_', '-', '.', ':'];

/// A target that matched, identified by its position in the input slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FuzzyMatch {
    /// Index into the targets passed to [`FuzzyMatcher::find`].
    pub index: usize,

    /// Match quality; higher is better. May be negative for long targets.
    pub score: i64,
}

/// Subsequence matcher that runs sequentially for small corpora and
/// partitions the work across threads for large ones.
#[derive(Debug, Clone)]
pub struct FuzzyMatcher {
    parallel_threshold: usize,
    max_workers: usize,
}

impl Default for FuzzyMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl FuzzyMatcher {
    /// Creates a matcher with the default parallelism settings.
    pub fn new() -> Self {
        Self::with_config(&RankingConfig::default())
    }

    /// Creates a matcher using the parallelism settings of `config`.
    pub fn with_config(config: &RankingConfig) -> Self {
        Self {
            parallel_threshold: config.parallel_threshold,
            max_workers: config.max_workers.max(1),
        }
    }

    /// Scores a single target. Returns `None` when `pattern` is not a
    /// subsequence of `target` or is empty.
    pub fn score(&self, pattern: &str, target: &str) -> Option<i64> {
        self.score_with_indices(pattern, target)
            .map(|(score, _)| score)
    }

    /// Scores a single target and returns the matched character positions,
    /// useful for highlighting.
    pub fn score_with_indices(&self, pattern: &str, target: &str) -> Option<(i64, Vec<usize>)> {
        let pattern = fold_pattern(pattern);
        if pattern.is_empty() {
            return None;
        }

        let mut scratch = Scratch::default();
        let score = scratch.score(&pattern, target)?;
        Some((score, scratch.positions))
    }

    /// Checks if a pattern matches a target at all.
    pub fn matches(&self, pattern: &str, target: &str) -> bool {
        self.score(pattern, target).is_some()
    }

    /// Matches `pattern` against every target, picking the parallel path
    /// once the corpus reaches the configured threshold.
    ///
    /// Results are sorted by score descending, then by index.
    pub fn find<S>(&self, pattern: &str, targets: &[S]) -> Vec<FuzzyMatch>
    where
        S: AsRef<str> + Sync,
    {
        if targets.len() >= self.parallel_threshold {
            self.find_parallel(pattern, targets)
        } else {
            self.find_sequential(pattern, targets)
        }
    }

    /// Matches every target on the calling thread.
    pub fn find_sequential<S>(&self, pattern: &str, targets: &[S]) -> Vec<FuzzyMatch>
    where
        S: AsRef<str>,
    {
        let pattern = fold_pattern(pattern);
        if pattern.is_empty() {
            return Vec::new();
        }

        let mut results = match_chunk(&pattern, targets, 0);
        sort_matches(&mut results);
        results
    }

    /// Splits the targets into at most `max_workers` contiguous chunks,
    /// matches each chunk independently, then merges the results.
    ///
    /// Scores are identical to [`find_sequential`](Self::find_sequential).
    pub fn find_parallel<S>(&self, pattern: &str, targets: &[S]) -> Vec<FuzzyMatch>
    where
        S: AsRef<str> + Sync,
    {
        let pattern = fold_pattern(pattern);
        if pattern.is_empty() || targets.is_empty() {
            return Vec::new();
        }

        let workers = self.max_workers.min(targets.len());
        let chunk_size = targets.len().div_ceil(workers);
        tracing::debug!(
            targets = targets.len(),
            workers,
            chunk_size,
            "dispatching parallel fuzzy match"
        );

        let chunks: Vec<Vec<FuzzyMatch>> = targets
            .par_chunks(chunk_size)
            .enumerate()
            .map(|(chunk, slice)| match_chunk(&pattern, slice, chunk * chunk_size))
            .collect();

        let mut results: Vec<FuzzyMatch> = chunks.into_iter().flatten().collect();
        sort_matches(&mut results);
        results
    }
}

fn fold_pattern(pattern: &str) -> Vec<char> {
    pattern.chars().map(fold_char).collect()
}

fn sort_matches(results: &mut [FuzzyMatch]) {
    results.sort_unstable_by(|a, b| b.score.cmp(&a.score).then(a.index.cmp(&b.index)));
}

fn match_chunk<S: AsRef<str>>(pattern: &[char], targets: &[S], offset: usize) -> Vec<FuzzyMatch> {
    let mut scratch = Scratch::default();
    targets
        .iter()
        .enumerate()
        .filter_map(|(i, target)| {
            scratch
                .score(pattern, target.as_ref())
                .map(|score| FuzzyMatch {
                    index: offset + i,
                    score,
                })
        })
        .collect()
}

/// Per-thread buffers reused across targets.
#[derive(Debug, Default)]
struct Scratch {
    chars: Vec<char>,
    positions: Vec<usize>,
}

impl Scratch {
    fn score(&mut self, pattern: &[char], target: &str) -> Option<i64> {
        self.chars.clear();
        self.chars.extend(target.chars());
        if pattern.len() > self.chars.len() {
            return None;
        }

        // The word-start preference can skip past characters a later
        // pattern character needs; plain leftmost placement then decides
        // whether the target matches at all.
        if !self.place(pattern, true) && !self.place(pattern, false) {
            return None;
        }

        let mut score = 0;
        let mut previous: Option<usize> = None;
        for &pos in &self.positions {
            score += if is_word_start(&self.chars, pos) {
                WORD_START_SCORE
            } else {
                PLAIN_SCORE
            };
            if previous.is_some_and(|p| p + 1 == pos) {
                score += ADJACENT_BONUS;
            }
            previous = Some(pos);
        }

        Some(score - (self.chars.len() - pattern.len()) as i64)
    }

    fn place(&mut self, pattern: &[char], prefer_word_start: bool) -> bool {
        self.positions.clear();
        let mut from = 0;

        for &wanted in pattern {
            let mut plain = None;
            let mut chosen = None;

            for pos in from..self.chars.len() {
                if fold_char(self.chars[pos]) != wanted {
                    continue;
                }
                if !prefer_word_start || is_word_start(&self.chars, pos) {
                    chosen = Some(pos);
                    break;
                }
                if plain.is_none() {
                    plain = Some(pos);
                }
            }

            match chosen.or(plain) {
                Some(pos) => {
                    self.positions.push(pos);
                    from = pos + 1;
                }
                None => return false,
            }
        }

        true
    }
}

fn is_word_start(chars: &[char], pos: usize) -> bool {
    if pos == 0 {
        return true;
    }
    let previous = chars[pos - 1];
    SEPARATORS.contains(&previous) || (chars[pos].is_uppercase() && previous.is_lowercase())
}
