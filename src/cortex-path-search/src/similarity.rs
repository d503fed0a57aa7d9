//! Query-to-query similarity used to share cache boosts between related
//! queries.

use std::collections::HashSet;

use crate::distance::levenshtein;

/// Scores how related two folded queries are, from 0 (unrelated) to 100
/// (identical).
///
/// `current` is the query being typed, `cached` is one stored in the cache.
/// The first tier that applies wins:
///
/// | relation                                  | score                          |
/// |-------------------------------------------|--------------------------------|
/// | identical                                 | 100                            |
/// | `cached` extends `current`                | 70 + 30 * len(current)/len(cached) |
/// | `current` extends `cached` (len ≥ 2)      | 50 + 30 * len(cached)/len(current) |
/// | `cached` contains `current` (len ≥ 2)     | 80                             |
/// | `current` contains `cached` (len ≥ 2)     | 60                             |
/// | shared words of two or more chars         | 50 + 15 per word               |
/// | both ≥ 3 chars and within typo distance   | 60 - 10 * distance             |
///
/// Lengths count characters. The result is never negative.
pub fn query_similarity(current: &str, cached: &str) -> i64 {
    if current == cached {
        return 100;
    }

    let current_len = current.chars().count() as i64;
    let cached_len = cached.chars().count() as i64;

    if cached.starts_with(current) {
        // `current` is a strict prefix here, so `cached_len` is non-zero.
        return 70 + 30 * current_len / cached_len;
    }
    if current.starts_with(cached) && cached_len >= 2 {
        return 50 + 30 * cached_len / current_len;
    }
    if current_len >= 2 && cached.contains(current) {
        return 80;
    }
    if cached_len >= 2 && current.contains(cached) {
        return 60;
    }

    let common = common_words(current, cached);
    if common > 0 {
        return 50 + 15 * common as i64;
    }

    if current_len >= 3 && cached_len >= 3 {
        let max_len = current_len.max(cached_len);
        let allowed = 2.max(max_len * 30 / 100);
        let distance = levenshtein(current, cached) as i64;
        if distance <= allowed {
            return (60 - distance * 10).max(0);
        }
    }

    0
}

fn common_words(a: &str, b: &str) -> usize {
    let words: HashSet<&str> = a.split_whitespace().filter(|w| w.chars().count() >= 2).collect();
    b.split_whitespace()
        .filter(|w| w.chars().count() >= 2)
        .collect::<HashSet<&str>>()
        .intersection(&words)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical() {
        assert_eq!(query_similarity("main", "main"), 100);
        assert_eq!(query_similarity("", ""), 100);
    }

    #[test]
    fn test_prefix_tiers() {
        // "mai" typed, "main" cached: 70 + 30 * 3 / 4.
        assert_eq!(query_similarity("mai", "main"), 92);
        // "main server" typed, "main" cached: 50 + 30 * 4 / 11.
        assert_eq!(query_similarity("main server", "main"), 60);
        // Single-character cached prefix is too weak to count.
        assert_eq!(query_similarity("main", "m"), 0);
    }

    #[test]
    fn test_empty_current_extends_to_anything() {
        assert_eq!(query_similarity("", "main"), 70);
    }

    #[test]
    fn test_containment_tiers() {
        assert_eq!(query_similarity("server", "main server"), 80);
        assert_eq!(query_similarity("my main file", "main"), 60);
        assert_eq!(query_similarity("x", "xyz abc"), 70 + 30 / 7);
    }

    #[test]
    fn test_common_words() {
        assert_eq!(query_similarity("main config", "config main"), 80);
        assert_eq!(query_similarity("user api", "api docs"), 65);
    }

    #[test]
    fn test_typo_tier() {
        // "mian" vs "main": distance 2, allowed 2.
        assert_eq!(query_similarity("mian", "main"), 40);
        assert_eq!(query_similarity("cofnig", "config"), 40);
        assert_eq!(query_similarity("abc", "xyz"), 0);
    }

    #[test]
    fn test_unrelated() {
        assert_eq!(query_similarity("readme", "server"), 0);
        assert_eq!(query_similarity("a", "b"), 0);
    }

    #[test]
    fn test_counts_characters() {
        // 3 chars typed, 5 chars cached, multi-byte throughout.
        assert_eq!(query_similarity("đườ", "đường"), 70 + 30 * 3 / 5);
    }
}
