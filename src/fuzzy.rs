//! Keyword overlap and similarity ranking for meaning-based distractors

use std::collections::HashSet;

use strsim::{jaro_winkler, normalized_levenshtein};

/// Words ignored when extracting keywords.
pub const STOP_WORDS: [&str; 5] = ["a", "an", "the", "of", "and"];

/// Split text into lowercased words with surrounding punctuation stripped.
fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split_whitespace()
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .filter(|w| !w.is_empty())
}

/// Non-trivial words of `text`. Falls back to the first word when every word is a stop word.
pub fn keywords(text: &str) -> HashSet<String> {
    let found: HashSet<String> = tokens(text)
        .filter(|w| !STOP_WORDS.contains(&w.as_str()))
        .collect();

    if !found.is_empty() {
        return found;
    }

    tokens(text).take(1).collect()
}

/// Number of keywords shared between `candidate` and a precomputed keyword set.
pub fn shared_keywords(candidate: &str, keywords: &HashSet<String>) -> usize {
    tokens(candidate)
        .collect::<HashSet<_>>()
        .iter()
        .filter(|w| keywords.contains(*w))
        .count()
}

/// Surface similarity between two answers in `[0, 1]`.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();
    if a == b {
        return 1.0;
    }
    // Jaro-Winkler favours shared prefixes, which suits short phrases
    normalized_levenshtein(&a, &b) * 0.4 + jaro_winkler(&a, &b) * 0.6
}

/// Candidates sharing at least one keyword with `correct`, best matches first.
///
/// Ordered by shared keyword count, then by [`similarity`]. Ties keep pool order.
pub fn rank_by_keywords<'a>(correct: &str, candidates: &[&'a str]) -> Vec<&'a str> {
    let wanted = keywords(correct);
    let mut scored: Vec<(usize, f64, &'a str)> = candidates
        .iter()
        .filter_map(|&c| {
            let shared = shared_keywords(c, &wanted);
            (shared > 0).then(|| (shared, similarity(correct, c), c))
        })
        .collect();

    scored.sort_by(|a, b| {
        b.0.cmp(&a.0)
            .then_with(|| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal))
    });

    scored.into_iter().map(|(_, _, c)| c).collect()
}
