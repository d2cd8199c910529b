//! Misspelling generator for spelling-recognition distractors

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

const VOWELS: [char; 5] = ['a', 'e', 'i', 'o', 'u'];

/// Minimum lengths a perturbation must reach to be kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypoLimits {
    /// Applies when the source contains whitespace.
    pub min_len_phrase: usize,
    /// Applies to single words.
    pub min_len_word: usize,
}

impl Default for TypoLimits {
    fn default() -> Self {
        Self {
            min_len_phrase: 5,
            min_len_word: 3,
        }
    }
}

impl TypoLimits {
    fn min_len_for(&self, source: &str) -> usize {
        if source.trim().contains(char::is_whitespace) {
            self.min_len_phrase
        } else {
            self.min_len_word
        }
    }
}

/// Lowercased, whitespace-free form that perturbations operate on.
pub fn squash(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Every single-edit perturbation of `squashed`, in generation order, duplicates included.
fn perturbations(squashed: &str) -> Vec<String> {
    let chars: Vec<char> = squashed.chars().collect();
    let mut out = Vec::new();

    for i in 0..chars.len().saturating_sub(1) {
        let mut swapped = chars.clone();
        swapped.swap(i, i + 1);
        out.push(swapped.into_iter().collect());
    }

    for i in 0..chars.len() {
        let mut deleted = chars.clone();
        deleted.remove(i);
        out.push(deleted.into_iter().collect());
    }

    for i in 0..chars.len() {
        let mut doubled = chars.clone();
        doubled.insert(i, chars[i]);
        out.push(doubled.into_iter().collect());
    }

    for (i, &c) in chars.iter().enumerate() {
        if !VOWELS.contains(&c) {
            continue;
        }
        for &v in VOWELS.iter().filter(|&&v| v != c) {
            let mut substituted = chars.clone();
            substituted[i] = v;
            out.push(substituted.into_iter().collect());
        }
    }

    out
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Up to `count` distinct misspellings of `correct`, randomly chosen.
///
/// Perturbations equal to the original (ignoring case and whitespace) or shorter than the
/// applicable minimum are discarded. When `correct` starts with an uppercase letter the
/// results are capitalised to match.
pub fn typo_variants<R: Rng + ?Sized>(
    correct: &str,
    limits: TypoLimits,
    count: usize,
    rng: &mut R,
) -> Vec<String> {
    let squashed = squash(correct);
    let min_len = limits.min_len_for(correct);
    let original_lower = correct.trim().to_lowercase();

    let mut seen = HashSet::new();
    let mut candidates: Vec<String> = perturbations(&squashed)
        .into_iter()
        .filter(|p| *p != squashed && *p != original_lower)
        .filter(|p| p.chars().count() >= min_len)
        .filter(|p| seen.insert(p.clone()))
        .collect();

    candidates.shuffle(rng);
    candidates.truncate(count);

    let capitalize = correct
        .trim_start()
        .chars()
        .next()
        .is_some_and(char::is_uppercase);
    if capitalize {
        candidates = candidates.iter().map(|c| capitalize_first(c)).collect();
    }

    candidates
}
