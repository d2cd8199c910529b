//! Distractor selection and answer keying for multiple-choice questions

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{QuizError, QuizResult};
use crate::fuzzy::rank_by_keywords;
use crate::typo::{typo_variants, TypoLimits};

/// Number of wrong answers in a full option set.
pub const DISTRACTOR_COUNT: usize = 3;

/// Option label, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Label {
    A,
    B,
    C,
    D,
}

impl Label {
    pub const ALL: [Label; 4] = [Label::A, Label::B, Label::C, Label::D];

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::A => "A",
            Label::B => "B",
            Label::C => "C",
            Label::D => "D",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How wrong answers are chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Uniform draw from the pool.
    #[default]
    RandomUniform,
    /// Pool entries sharing words with the answer first, random fill after.
    KeywordSimilar,
    /// Misspellings of the answer itself, random pool fill after.
    LexicalTypo,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::RandomUniform => "random_uniform",
            Strategy::KeywordSimilar => "keyword_similar",
            Strategy::LexicalTypo => "lexical_typo",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "random_uniform" | "random" => Ok(Strategy::RandomUniform),
            "keyword_similar" | "keyword" => Ok(Strategy::KeywordSimilar),
            "lexical_typo" | "typo" => Ok(Strategy::LexicalTypo),
            other => Err(format!("Unknown distractor strategy: {}", other)),
        }
    }
}

/// What happens when fewer than three distractors can be found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strictness {
    /// Fail with [`QuizError::InsufficientCandidates`].
    Strict,
    /// Return a short option set.
    #[default]
    Lenient,
}

impl FromStr for Strictness {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "strict" => Ok(Strictness::Strict),
            "lenient" => Ok(Strictness::Lenient),
            other => Err(format!("Unknown strictness: {}", other)),
        }
    }
}

/// Labeled answers with exactly one correct label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSet {
    pub options: BTreeMap<Label, String>,
    pub correct_label: Label,
}

impl OptionSet {
    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn correct_answer(&self) -> &str {
        self.options
            .get(&self.correct_label)
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn distractors(&self) -> impl Iterator<Item = &str> {
        self.options
            .iter()
            .filter(move |(label, _)| **label != self.correct_label)
            .map(|(_, text)| text.as_str())
    }

    /// True when the set carries a full complement of distractors.
    pub fn is_complete(&self) -> bool {
        self.options.len() == DISTRACTOR_COUNT + 1
    }
}

/// Selector knobs beyond the strategy itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectorOptions {
    pub strictness: Strictness,
    pub typo_limits: TypoLimits,
}

/// Trimmed, non-empty pool entries that differ from `correct`, deduplicated ignoring case.
fn eligible<'a>(correct: &str, pool: &'a [String]) -> Vec<&'a str> {
    let correct_key = correct.trim().to_lowercase();
    let mut seen = HashSet::new();
    pool.iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .filter(|s| {
            let key = s.to_lowercase();
            key != correct_key && seen.insert(key)
        })
        .collect()
}

/// Extend `chosen` with random picks from `remaining`, skipping case-insensitive repeats.
fn fill_random<R: Rng + ?Sized>(
    chosen: &mut Vec<String>,
    remaining: &[&str],
    rng: &mut R,
) {
    let taken: HashSet<String> = chosen.iter().map(|c| c.to_lowercase()).collect();
    let mut rest: Vec<&str> = remaining
        .iter()
        .copied()
        .filter(|r| !taken.contains(&r.to_lowercase()))
        .collect();
    rest.shuffle(rng);
    let need = DISTRACTOR_COUNT.saturating_sub(chosen.len());
    chosen.extend(rest.into_iter().take(need).map(str::to_string));
}

fn pick_distractors<R: Rng + ?Sized>(
    correct: &str,
    pool: &[String],
    strategy: Strategy,
    typo_limits: TypoLimits,
    rng: &mut R,
) -> Vec<String> {
    let candidates = eligible(correct, pool);

    match strategy {
        Strategy::RandomUniform => candidates
            .choose_multiple(rng, DISTRACTOR_COUNT)
            .map(|s| s.to_string())
            .collect(),
        Strategy::KeywordSimilar => {
            let mut chosen: Vec<String> = rank_by_keywords(correct, &candidates)
                .into_iter()
                .take(DISTRACTOR_COUNT)
                .map(str::to_string)
                .collect();
            let matched: HashSet<&str> = chosen.iter().map(String::as_str).collect();
            let unmatched: Vec<&str> = candidates
                .iter()
                .copied()
                .filter(|c| !matched.contains(c))
                .collect();
            fill_random(&mut chosen, &unmatched, rng);
            chosen
        }
        Strategy::LexicalTypo => {
            let mut chosen = typo_variants(correct, typo_limits, DISTRACTOR_COUNT, rng);
            fill_random(&mut chosen, &candidates, rng);
            chosen
        }
    }
}

/// Choose up to three distractors for `correct` and shuffle them with it under labels A-D.
///
/// `pool` may contain duplicates and the correct answer itself; both are ignored. In
/// [`Strictness::Strict`] mode fewer than three distractors is an error; in
/// [`Strictness::Lenient`] mode the set is simply shorter, down to the lone correct answer
/// when the pool has nothing else to offer.
pub fn select_options<R: Rng + ?Sized>(
    correct: &str,
    pool: &[String],
    strategy: Strategy,
    opts: SelectorOptions,
    rng: &mut R,
) -> QuizResult<OptionSet> {
    let correct = correct.trim();
    if correct.is_empty() {
        return Err(QuizError::Validation(
            "Cannot build options for an empty answer".to_string(),
        ));
    }

    let distractors = pick_distractors(correct, pool, strategy, opts.typo_limits, rng);

    if distractors.len() < DISTRACTOR_COUNT && opts.strictness == Strictness::Strict {
        return Err(QuizError::InsufficientCandidates {
            answer: correct.to_string(),
            needed: DISTRACTOR_COUNT,
            available: distractors.len(),
        });
    }

    // Track the answer by position, not by text, so labeling never depends on string matching
    let mut entries: Vec<(bool, String)> = distractors.into_iter().map(|d| (false, d)).collect();
    entries.push((true, correct.to_string()));
    entries.shuffle(rng);

    let mut options = BTreeMap::new();
    let mut correct_label = Label::A;
    for (label, (is_correct, text)) in Label::ALL.into_iter().zip(entries) {
        if is_correct {
            correct_label = label;
        }
        options.insert(label, text);
    }

    Ok(OptionSet {
        options,
        correct_label,
    })
}
