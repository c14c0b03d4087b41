//! Focus keyword occurrence and density.
//!
//! Matching is deliberately loose and asymmetric:
//! - single word: every whitespace token whose folded form *contains* the
//!   keyword counts once ("duvar" matches "duvarlı")
//! - phrase: non-overlapping left-to-right substring scan over the folded text
//!
//! Existing content is scored with these rules, so they stay as they are.

use contentrank_common::{fold_case, FocusKeyword};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeywordStats {
    pub occurrences: usize,
    pub word_count: usize,
    /// `occurrences / word_count * 100`, or 0 when there are no words.
    pub density: f64,
}

/// Whitespace tokens longer than one character.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace()
        .filter(|token| token.chars().count() > 1)
        .count()
}

pub fn measure(text: &str, keyword: &FocusKeyword) -> KeywordStats {
    let words = word_count(text);
    let occurrences = count_occurrences(text, keyword);
    let density = if words == 0 {
        0.0
    } else {
        occurrences as f64 / words as f64 * 100.0
    };

    KeywordStats {
        occurrences,
        word_count: words,
        density,
    }
}

fn count_occurrences(text: &str, keyword: &FocusKeyword) -> usize {
    if keyword.is_empty() {
        return 0;
    }
    let needle = keyword.as_str();
    let folded = fold_case(text);

    if keyword.is_multi_word() {
        let mut count = 0;
        let mut pos = 0;
        while let Some(idx) = folded[pos..].find(needle) {
            count += 1;
            pos += idx + needle.len();
        }
        count
    } else {
        folded
            .split_whitespace()
            .filter(|token| token.contains(needle))
            .count()
    }
}
