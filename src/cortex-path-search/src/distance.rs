//! Levenshtein edit distance over Unicode scalar values.

/// Edit distance calculator that keeps its scratch buffers between calls.
///
/// Callers scoring many candidates against one query (the typo fallback
/// in [`Searcher`](crate::Searcher)) hold one of these for the whole pass
/// instead of allocating per comparison.
#[derive(Debug, Default, Clone)]
pub struct EditDistance {
    row: Vec<usize>,
    left: Vec<char>,
    right: Vec<char>,
}

impl EditDistance {
    /// Creates a calculator with empty buffers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Minimum number of single-character insertions, deletions and
    /// substitutions turning `pattern` into `candidate`.
    ///
    /// Inputs are compared character by character; callers fold case and
    /// diacritics beforehand.
    pub fn distance(&mut self, pattern: &str, candidate: &str) -> usize {
        self.left.clear();
        self.left.extend(pattern.chars());
        self.right.clear();
        self.right.extend(candidate.chars());

        // The metric is symmetric, so the row tracks the shorter side.
        if self.left.len() > self.right.len() {
            std::mem::swap(&mut self.left, &mut self.right);
        }

        single_row(&self.left, &self.right, &mut self.row)
    }
}

/// One-off edit distance. Prefer [`EditDistance`] in loops.
pub fn levenshtein(pattern: &str, candidate: &str) -> usize {
    EditDistance::new().distance(pattern, candidate)
}

fn single_row(short: &[char], long: &[char], row: &mut Vec<usize>) -> usize {
    row.clear();
    row.extend(0..=short.len());

    for (i, &lc) in long.iter().enumerate() {
        // row[j] holds the distance between short[..j] and long[..i];
        // `diagonal` is the value row[j] had before this pass overwrote it.
        let mut diagonal = row[0];
        row[0] = i + 1;

        for (j, &sc) in short.iter().enumerate() {
            let above = row[j + 1];
            let substitution = diagonal + usize::from(sc != lc);
            row[j + 1] = (above + 1).min(row[j] + 1).min(substitution);
            diagonal = above;
        }
    }

    row[short.len()]
}
