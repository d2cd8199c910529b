//! Option-set invariants across strategies and pools.

use std::collections::{HashMap, HashSet};

use idiom_quiz::{select_options, Label, OptionSet, SelectorOptions, Strategy, Strictness};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

const STRATEGIES: [Strategy; 3] = [
    Strategy::RandomUniform,
    Strategy::KeywordSimilar,
    Strategy::LexicalTypo,
];

fn idiom_meanings() -> Vec<String> {
    [
        "To initiate conversation",
        "To reveal a secret",
        "To go to sleep",
        "Feeling ill",
        "Very easy",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn lowered(set: &OptionSet) -> HashSet<String> {
    set.options.values().map(|v| v.to_lowercase()).collect()
}

#[test]
fn strict_sets_are_complete_for_every_strategy() {
    let pool = idiom_meanings();
    let opts = SelectorOptions {
        strictness: Strictness::Strict,
        ..Default::default()
    };
    let mut rng = StdRng::seed_from_u64(42);

    for strategy in STRATEGIES {
        for correct in &pool {
            let set = select_options(correct, &pool, strategy, opts, &mut rng).unwrap();
            assert_eq!(set.len(), 4, "{:?} for {}", strategy, correct);
            assert_eq!(set.correct_answer(), correct);
            assert_eq!(lowered(&set).len(), 4);
            assert_eq!(
                set.options.values().filter(|v| *v == correct).count(),
                1
            );
        }
    }
}

#[test]
fn correct_label_is_uniform() {
    let pool = idiom_meanings();
    let mut rng = StdRng::seed_from_u64(2024);
    let trials = 4000;
    let mut counts: HashMap<Label, usize> = HashMap::new();

    for _ in 0..trials {
        let set = select_options(
            "Very easy",
            &pool,
            Strategy::RandomUniform,
            SelectorOptions::default(),
            &mut rng,
        )
        .unwrap();
        *counts.entry(set.correct_label).or_insert(0) += 1;
    }

    let expected = trials as f64 / 4.0;
    let chi_square: f64 = Label::ALL
        .iter()
        .map(|label| {
            let observed = *counts.get(label).unwrap_or(&0) as f64;
            (observed - expected).powi(2) / expected
        })
        .sum();

    // df = 3; 16.27 is the 0.1% critical value
    assert!(chi_square < 16.27, "chi-square {} with counts {:?}", chi_square, counts);
}

#[test]
fn hello_typos_exclude_the_word_and_respect_minimum() {
    let mut rng = StdRng::seed_from_u64(99);
    let opts = SelectorOptions::default();
    let min_len = opts.typo_limits.min_len_word;

    for _ in 0..500 {
        let set = select_options("Hello", &[], Strategy::LexicalTypo, opts, &mut rng).unwrap();
        for d in set.distractors() {
            assert_ne!(d.to_lowercase(), "hello");
            assert!(d.chars().count() >= min_len, "{} too short", d);
        }
    }
}

#[test]
fn phrase_typos_use_phrase_minimum() {
    let mut rng = StdRng::seed_from_u64(100);
    let opts = SelectorOptions::default();
    for _ in 0..200 {
        let set =
            select_options("Hit The Sack", &[], Strategy::LexicalTypo, opts, &mut rng).unwrap();
        assert!(set.is_complete());
        for d in set.distractors() {
            assert!(d.chars().count() >= opts.typo_limits.min_len_phrase);
            assert!(!d.contains(' '));
        }
    }
}

proptest! {
    #[test]
    fn options_never_repeat(
        correct in "[A-Za-z]{1,8}( [A-Za-z]{1,8}){0,3}",
        pool in prop::collection::vec("[A-Za-z]{1,6}( [A-Za-z]{1,6}){0,2}", 0..12),
        strategy_idx in 0usize..3,
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut pool = pool;
        pool.push(correct.clone());
        pool.push(correct.to_uppercase());

        let set = select_options(
            &correct,
            &pool,
            STRATEGIES[strategy_idx],
            SelectorOptions::default(),
            &mut rng,
        ).unwrap();

        prop_assert!(!set.is_empty() && set.len() <= 4);
        prop_assert_eq!(lowered(&set).len(), set.len());
        prop_assert_eq!(set.correct_answer(), correct.trim());
        let labels: Vec<Label> = set.options.keys().copied().collect();
        prop_assert_eq!(&labels[..], &Label::ALL[..set.len()]);
    }

    #[test]
    fn strict_mode_fails_exactly_when_pool_is_short(
        pool in prop::collection::hash_set("[a-z]{3,6}", 0..6),
        seed in any::<u64>(),
    ) {
        let pool: Vec<String> = pool.into_iter().collect();
        let correct = "zzzzzzz";
        let opts = SelectorOptions { strictness: Strictness::Strict, ..Default::default() };
        let mut rng = StdRng::seed_from_u64(seed);
        let result = select_options(correct, &pool, Strategy::RandomUniform, opts, &mut rng);
        if pool.len() >= 3 {
            prop_assert!(result.unwrap().is_complete());
        } else {
            prop_assert!(result.is_err());
        }
    }
}
