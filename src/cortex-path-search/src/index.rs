//! Immutable, pre-folded view of a path corpus.

use std::collections::HashMap;

use crate::normalize::fold;

/// Folded forms of every corpus path, built once and never mutated.
///
/// All per-path vectors share indexing with `originals`.
#[derive(Debug, Clone, Default)]
pub struct PathIndex {
    /// Paths exactly as supplied.
    originals: Vec<String>,

    /// `fold("<file name> <path>")`, so name characters are matched first.
    normalized_full: Vec<String>,

    /// `fold(<file name>)`.
    normalized_names: Vec<String>,

    /// Character count of each folded file name.
    name_lengths: Vec<usize>,

    /// Original path to its first index.
    by_path: HashMap<String, usize>,
}

impl PathIndex {
    /// Folds every path in `paths`. Order is preserved and duplicates are
    /// kept; lookups by path resolve to the first occurrence.
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let originals: Vec<String> = paths.into_iter().map(Into::into).collect();
        let len = originals.len();

        let mut normalized_full = Vec::with_capacity(len);
        let mut normalized_names = Vec::with_capacity(len);
        let mut name_lengths = Vec::with_capacity(len);
        let mut by_path = HashMap::with_capacity(len);

        for (i, path) in originals.iter().enumerate() {
            let name = file_name(path);
            let folded_name = fold(name);

            normalized_full.push(fold(&format!("{name} {path}")));
            name_lengths.push(folded_name.chars().count());
            normalized_names.push(folded_name);
            by_path.entry(path.clone()).or_insert(i);
        }

        Self {
            originals,
            normalized_full,
            normalized_names,
            name_lengths,
            by_path,
        }
    }

    /// Returns the number of indexed paths.
    pub fn len(&self) -> usize {
        self.originals.len()
    }

    /// Returns whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.originals.is_empty()
    }

    /// Original path at `index`.
    pub fn path(&self, index: usize) -> Option<&str> {
        self.originals.get(index).map(String::as_str)
    }

    /// First index holding `path`.
    pub fn position(&self, path: &str) -> Option<usize> {
        self.by_path.get(path).copied()
    }

    /// All original paths in corpus order.
    pub fn originals(&self) -> &[String] {
        &self.originals
    }

    /// Folded `"<file name> <path>"` strings, matched by the fuzzy pass.
    pub fn normalized_full(&self) -> &[String] {
        &self.normalized_full
    }

    /// Folded file names.
    pub fn normalized_names(&self) -> &[String] {
        &self.normalized_names
    }

    /// Folded file name at `index` together with its character count.
    pub(crate) fn name(&self, index: usize) -> (&str, usize) {
        (&self.normalized_names[index], self.name_lengths[index])
    }
}

/// Last component of `path`, accepting both `/` and `\` separators.
///
/// Trailing separators are ignored. A path made only of separators is
/// returned unchanged.
pub fn file_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches(['/', '\\']);
    if trimmed.is_empty() {
        return path;
    }
    match trimmed.rfind(['/', '\\']) {
        Some(pos) => &trimmed[pos + 1..],
        None => trimmed,
    }
}
