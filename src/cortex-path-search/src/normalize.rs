//! Unicode folding for path and query text.
//!
//! Folding strips combining marks (Vietnamese tone marks, acute accents and
//! friends) and maps the Vietnamese stroked `đ`/`Đ`, which carry no combining
//! mark, onto `d`/`D`. The letters `y` and `i` are deliberately kept apart, so
//! `kỷ` and `kỉ` stay distinguishable after folding.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::{decompose_canonical, is_combining_mark};

/// Strips diacritics from `s`, leaving case untouched.
///
/// The result is idempotent: `normalize(&normalize(s)) == normalize(s)`.
pub fn normalize(s: &str) -> String {
    if s.is_ascii() {
        return s.to_string();
    }

    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .nfc()
        .map(fold_stroke)
        .collect()
}

/// Lowercases and strips diacritics. This is the canonical comparable form
/// used for indexed paths and cache keys.
pub fn fold(s: &str) -> String {
    if s.is_ascii() {
        return s.to_ascii_lowercase();
    }

    // Lowercasing first so marks introduced by case mapping (`İ` -> `i̇`)
    // are stripped too.
    normalize(&s.to_lowercase())
}

/// Folds a single character to its lowercase base letter.
///
/// Combining marks fold to themselves.
pub fn fold_char(c: char) -> char {
    if c.is_ascii() {
        return c.to_ascii_lowercase();
    }

    let mut base = None;
    decompose_canonical(c, |d| {
        if base.is_none() && !is_combining_mark(d) {
            base = Some(d);
        }
    });

    let base = fold_stroke(base.unwrap_or(c));
    base.to_lowercase().next().unwrap_or(base)
}

fn fold_stroke(c: char) -> char {
    match c {
        'đ' => 'd',
        'Đ' => 'D',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_vietnamese() {
        let cases = [
            ("Đường", "Duong"),
            ("đường", "duong"),
            ("Nguyễn", "Nguyen"),
            ("nguyễn", "nguyen"),
            ("Huệ", "Hue"),
            ("café", "cafe"),
            ("quy định", "quy dinh"),
            ("qui định", "qui dinh"),
            ("Sơn Tùng", "Son Tung"),
            ("Báo cáo tháng 1", "Bao cao thang 1"),
            ("Hello World", "Hello World"),
            ("Python", "Python"),
            ("", ""),
        ];

        for (input, expected) in cases {
            assert_eq!(normalize(input), expected, "normalize({input:?})");
        }
    }

    #[test]
    fn test_normalize_keeps_y_and_i_apart() {
        let pairs = [
            ("kỷ niệm", "kỉ niệm", "ky niem", "ki niem"),
            ("lý do", "lí do", "ly do", "li do"),
            ("vật lý", "vật lí", "vat ly", "vat li"),
        ];

        for (a, b, expect_a, expect_b) in pairs {
            assert_eq!(normalize(a), expect_a);
            assert_eq!(normalize(b), expect_b);
            assert_ne!(normalize(a), normalize(b));
        }
    }

    #[test]
    fn test_normalize_preserves_case() {
        assert_eq!(normalize("ĐÀ NẴNG"), "DA NANG");
    }

    #[test]
    fn test_fold() {
        assert_eq!(fold("Đừng Hỏi Em"), "dung hoi em");
        assert_eq!(fold("README.md"), "readme.md");
        assert_eq!(fold("İstanbul"), "istanbul");
    }

    #[test]
    fn test_fold_char() {
        assert_eq!(fold_char('A'), 'a');
        assert_eq!(fold_char('Ệ'), 'e');
        assert_eq!(fold_char('đ'), 'd');
        assert_eq!(fold_char('Đ'), 'd');
        assert_eq!(fold_char('ỷ'), 'y');
        assert_eq!(fold_char('日'), '日');
    }
}
