//! Top recurring terms. Diagnostic output only, never part of the score.

use std::collections::HashMap;

use contentrank_common::{fold_case, TermStat};

pub const TOP_TERMS_LIMIT: usize = 5;

const MIN_TERM_CHARS: usize = 3;

/// Common Turkish and English function words.
const STOP_WORDS: &[&str] = &[
    // Turkish
    "acaba", "ama", "ancak", "artık", "aslında", "ayrıca", "bazı", "belki", "ben", "benim", "beri",
    "bile", "bir", "biri", "birkaç", "birçok", "biz", "bize", "bizim", "bu", "buna", "bunda",
    "bundan", "bunlar", "bunu", "bunun", "burada", "bütün", "çok", "çünkü", "da", "daha", "de",
    "değil", "diğer", "diye", "dolayı", "en", "gibi", "göre", "hem", "hep", "her", "hiç", "için",
    "ile", "ise", "işte", "kadar", "karşı", "kendi", "ki", "kim", "mı", "mi", "mu", "mü", "nasıl",
    "ne", "neden", "nerede", "o", "olan", "olarak", "olduğu", "olduğunu", "oldukça", "olmak",
    "olması", "olur", "on", "ona", "onlar", "onu", "onun", "sadece", "siz", "sonra", "şey",
    "şu", "şöyle", "tarafından", "tüm", "üzere", "var", "ve", "veya", "ya", "yani", "yine",
    "yok", "zaten",
    // English
    "a", "about", "after", "all", "also", "an", "and", "any", "are", "as", "at", "be", "been",
    "but", "by", "can", "could", "did", "do", "does", "for", "from", "had", "has", "have", "he",
    "her", "his", "how", "if", "in", "into", "is", "it", "its", "more", "most", "not", "of",
    "on", "or", "our", "out", "she", "so", "than", "that", "the", "their", "them", "then",
    "there", "these", "they", "this", "those", "to", "up", "was", "we", "were", "what", "when",
    "which", "who", "will", "with", "would", "you", "your",
];

/// Top [`TOP_TERMS_LIMIT`] terms by raw count, density relative to the total
/// whitespace token count. Equal counts keep first-seen order.
pub fn top_terms(text: &str) -> Vec<TermStat> {
    let folded = fold_case(text);
    let mut total = 0usize;
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for token in folded.split_whitespace() {
        total += 1;
        let term = token.trim_matches(|c: char| !c.is_alphanumeric());
        if term.chars().count() < MIN_TERM_CHARS || STOP_WORDS.contains(&term) {
            continue;
        }
        match index.get(term) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                index.insert(term.to_string(), counts.len());
                counts.push((term.to_string(), 1));
            }
        }
    }

    // Stable sort: ties stay in insertion order.
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    counts
        .into_iter()
        .take(TOP_TERMS_LIMIT)
        .map(|(term, count)| TermStat {
            term,
            count,
            density: count as f64 / total as f64 * 100.0,
        })
        .collect()
}
