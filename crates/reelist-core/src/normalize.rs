//! Title normalization applied to both sides of a fuzzy match.

use unicode_normalization::UnicodeNormalization;

/// Normalize a title or query for comparison.
///
/// Levels applied in order:
/// 1. Unicode NFKC + case folding
/// 2. Character transliteration
/// 3. Punctuation erasure
/// 4. Whitespace collapse
pub fn normalize(s: &str) -> String {
    let s = unicode_normalize(s);
    let s = transliterate(&s);
    let s = erase_punctuation(&s);
    collapse_whitespace(&s)
}

// ── Level 1: Unicode NFKC + case folding ──────────────────────────────

/// Apply NFKC normalization (fullwidth → ASCII, compose diacritics) and lowercase.
fn unicode_normalize(s: &str) -> String {
    s.nfkc().collect::<String>().to_lowercase()
}

// ── Level 2: Character transliteration ────────────────────────────────

/// Replace typographic characters that catalogs and users type differently.
fn transliterate(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str(" and "),
            '\u{00E6}' => result.push_str("ae"), // æ
            '\u{0153}' => result.push_str("oe"), // œ
            '\u{00DF}' => result.push_str("ss"), // ß
            '\u{2013}' | '\u{2014}' => result.push(' '),
            c => result.push(c),
        }
    }
    result
}

// ── Level 3: Punctuation erasure ──────────────────────────────────────

fn erase_punctuation(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect()
}

// ── Level 4: Whitespace collapse ──────────────────────────────────────

/// Trim and collapse multiple whitespace runs to a single space.
fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
