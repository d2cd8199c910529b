//! Batch quiz generation: load, select, key, write, remember

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::QuizConfig;
use crate::error::{QuizError, QuizResult};
use crate::excel::{parse_file, QuizItem};
use crate::output::{QuizDocument, QuizQuestion};
use crate::progress::{filter_unused, UsedSet};
use crate::questions::{select_options, SelectorOptions, Strategy};

/// Which side of an item the options are drawn from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionMode {
    /// Show the idiom, options are meanings.
    #[default]
    AskMeaning,
    /// Show the meaning, options are idioms.
    AskPrompt,
}

impl QuestionMode {
    /// The correct option for `item` under this mode.
    pub fn answer_for(&self, item: &QuizItem) -> String {
        match self {
            QuestionMode::AskMeaning => item.meaning.clone(),
            QuestionMode::AskPrompt => item.display_prompt(),
        }
    }

    /// Every correct answer in the table, the universe distractors come from.
    pub fn candidate_pool(&self, items: &[QuizItem]) -> Vec<String> {
        items.iter().map(|item| self.answer_for(item)).collect()
    }
}

impl FromStr for QuestionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "ask_meaning" | "meaning" => Ok(QuestionMode::AskMeaning),
            "ask_prompt" | "prompt" | "word" | "idiom" => Ok(QuestionMode::AskPrompt),
            other => Err(format!("Unknown question mode: {}", other)),
        }
    }
}

/// Order items are taken in before the batch cap applies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionOrder {
    #[default]
    Table,
    Random,
}

impl FromStr for QuestionOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "table" => Ok(QuestionOrder::Table),
            "random" => Ok(QuestionOrder::Random),
            other => Err(format!("Unknown question order: {}", other)),
        }
    }
}

impl fmt::Display for QuestionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionMode::AskMeaning => f.write_str("ask_meaning"),
            QuestionMode::AskPrompt => f.write_str("ask_prompt"),
        }
    }
}

/// Per-run generation settings, already resolved from config.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenerationSettings {
    pub strategy: Strategy,
    pub mode: QuestionMode,
    pub selector: SelectorOptions,
    /// Only meaningful with strict selection: skip short items instead of aborting.
    pub skip_insufficient: bool,
}

impl GenerationSettings {
    pub fn from_config(config: &QuizConfig) -> Self {
        Self {
            strategy: config.effective_strategy(),
            mode: config.effective_mode(),
            selector: config.selector_options(),
            skip_insufficient: config.effective_skip_insufficient(),
        }
    }
}

/// Questions produced for a batch, plus the items dropped along the way.
#[derive(Debug, Clone, Default)]
pub struct Generated {
    pub questions: Vec<QuizQuestion>,
    pub skipped: Vec<String>,
}

/// Build one question for `item` against `pool`.
pub fn build_question<R: Rng + ?Sized>(
    item: &QuizItem,
    pool: &[String],
    settings: &GenerationSettings,
    rng: &mut R,
) -> QuizResult<QuizQuestion> {
    let answer = settings.mode.answer_for(item);
    let set = select_options(&answer, pool, settings.strategy, settings.selector, rng)?;

    Ok(QuizQuestion {
        prompt: item.display_prompt(),
        meaning: item.meaning.clone(),
        hindi_meaning: item.hindi_meaning.clone(),
        year: item.year.clone(),
        difficulty: item.difficulty.clone(),
        answer: set.correct_answer().to_string(),
        options: set.options,
        correct_label: set.correct_label,
    })
}

/// Generate questions for `batch`, drawing distractors from `pool`.
pub fn generate_questions<R: Rng + ?Sized>(
    batch: &[&QuizItem],
    pool: &[String],
    settings: &GenerationSettings,
    rng: &mut R,
) -> QuizResult<Generated> {
    let mut generated = Generated::default();

    for item in batch {
        match build_question(item, pool, settings, rng) {
            Ok(question) => generated.questions.push(question),
            Err(QuizError::InsufficientCandidates { available, .. }) if settings.skip_insufficient => {
                warn!(prompt = %item.prompt, available, "skipping item without enough distractors");
                generated.skipped.push(item.prompt.clone());
            }
            Err(e) => return Err(e),
        }
    }

    Ok(generated)
}

/// What a completed run did.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub output: PathBuf,
    pub document: QuizDocument,
    pub skipped: Vec<String>,
    /// True when every prompt had been used and the used-set was cleared.
    pub used_set_reset: bool,
}

/// Pick the items for this run: unused ones (resetting when exhausted), ordered, capped.
fn select_batch<'a, R: Rng + ?Sized>(
    items: &'a [QuizItem],
    used: Option<&mut UsedSet>,
    config: &QuizConfig,
    rng: &mut R,
) -> (Vec<&'a QuizItem>, bool) {
    let mut reset = false;
    let mut batch: Vec<&QuizItem> = match used {
        Some(used) => {
            let unused = filter_unused(items, used, |item| item.prompt.as_str());
            if unused.is_empty() {
                info!(used = used.len(), "every prompt has been used, resetting used-set");
                used.reset();
                reset = true;
                items.iter().collect()
            } else {
                unused
            }
        }
        None => items.iter().collect(),
    };

    if config.effective_order() == QuestionOrder::Random {
        batch.shuffle(rng);
    }
    if let Some(cap) = config.max_questions {
        batch.truncate(cap);
    }

    (batch, reset)
}

/// Run a full generation from a resolved configuration.
///
/// Nothing is written unless loading and generation both succeed. The used-set is only
/// persisted after the quiz file is in place.
pub fn run(config: &QuizConfig) -> QuizResult<RunReport> {
    config.validate()?;

    let input = config.input_path()?;
    let items = parse_file(input, config.effective_default_year())?;
    info!(rows = items.len(), input = %input.display(), "loaded quiz source");

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut used = match config.used_set {
        Some(ref path) => Some(UsedSet::load(path)?),
        None => None,
    };

    let (batch, used_set_reset) = select_batch(&items, used.as_mut(), config, &mut rng);
    debug!(batch = batch.len(), "selected items for this run");

    let settings = GenerationSettings::from_config(config);
    let pool = settings.mode.candidate_pool(&items);
    let generated = generate_questions(&batch, &pool, &settings, &mut rng)?;

    let output = config.effective_output();
    let document = QuizDocument::new(settings.strategy, generated.questions);
    document.write(&output)?;
    info!(output = %output.display(), questions = document.total_questions, "wrote quiz");

    if let (Some(path), Some(used)) = (config.used_set.as_ref(), used.as_mut()) {
        for item in &batch {
            if !generated.skipped.contains(&item.prompt) {
                used.mark_used(&item.prompt);
            }
        }
        used.persist(path)?;
        debug!(path = %path.display(), keys = used.len(), "persisted used-set");
    }

    Ok(RunReport {
        output,
        document,
        skipped: generated.skipped,
        used_set_reset,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::questions::Strictness;

    fn item(prompt: &str, meaning: &str) -> QuizItem {
        QuizItem {
            prompt: prompt.to_string(),
            meaning: meaning.to_string(),
            hindi_meaning: None,
            year: "2024".to_string(),
            difficulty: None,
        }
    }

    fn sample() -> Vec<QuizItem> {
        vec![
            item("break the ice", "To initiate conversation"),
            item("spill the beans", "To reveal a secret"),
            item("hit the sack", "To go to sleep"),
            item("under the weather", "Feeling ill"),
        ]
    }

    #[test]
    fn ask_prompt_pool_is_title_cased() {
        let pool = QuestionMode::AskPrompt.candidate_pool(&sample());
        assert_eq!(pool[0], "Break The Ice");
        assert_eq!(pool.len(), 4);
    }

    #[test]
    fn questions_carry_item_fields() {
        let items = sample();
        let batch: Vec<&QuizItem> = items.iter().collect();
        let pool = QuestionMode::AskMeaning.candidate_pool(&items);
        let mut rng = StdRng::seed_from_u64(1);
        let out = generate_questions(&batch, &pool, &GenerationSettings::default(), &mut rng)
            .unwrap();
        assert_eq!(out.questions.len(), 4);
        let q = &out.questions[1];
        assert_eq!(q.prompt, "Spill The Beans");
        assert_eq!(q.answer, "To reveal a secret");
        assert_eq!(q.options[&q.correct_label], "To reveal a secret");
    }

    #[test]
    fn strict_skip_drops_short_items() {
        let items = vec![item("a", "one"), item("b", "two")];
        let batch: Vec<&QuizItem> = items.iter().collect();
        let pool = QuestionMode::AskMeaning.candidate_pool(&items);
        let settings = GenerationSettings {
            selector: SelectorOptions {
                strictness: Strictness::Strict,
                ..Default::default()
            },
            skip_insufficient: true,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(2);
        let out = generate_questions(&batch, &pool, &settings, &mut rng).unwrap();
        assert!(out.questions.is_empty());
        assert_eq!(out.skipped, vec!["a", "b"]);
    }

    #[test]
    fn strict_without_skip_fails() {
        let items = vec![item("a", "one"), item("b", "two")];
        let batch: Vec<&QuizItem> = items.iter().collect();
        let pool = QuestionMode::AskMeaning.candidate_pool(&items);
        let settings = GenerationSettings {
            selector: SelectorOptions {
                strictness: Strictness::Strict,
                ..Default::default()
            },
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(3);
        let err = generate_questions(&batch, &pool, &settings, &mut rng).unwrap_err();
        assert!(matches!(err, QuizError::InsufficientCandidates { .. }));
    }

    #[test]
    fn batch_skips_used_and_resets_when_exhausted() {
        let items = sample();
        let config = QuizConfig::default();
        let mut rng = StdRng::seed_from_u64(4);

        let mut used = UsedSet::new();
        used.mark_used("break the ice");
        let (batch, reset) = select_batch(&items, Some(&mut used), &config, &mut rng);
        assert_eq!(batch.len(), 3);
        assert!(!reset);

        for i in &items {
            used.mark_used(&i.prompt);
        }
        let (batch, reset) = select_batch(&items, Some(&mut used), &config, &mut rng);
        assert_eq!(batch.len(), 4);
        assert!(reset);
        assert!(used.is_empty());
    }

    #[test]
    fn batch_cap_applies_after_ordering() {
        let items = sample();
        let config = QuizConfig {
            max_questions: Some(2),
            order: Some(QuestionOrder::Table),
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(5);
        let (batch, _) = select_batch(&items, None, &config, &mut rng);
        let prompts: Vec<&str> = batch.iter().map(|i| i.prompt.as_str()).collect();
        assert_eq!(prompts, vec!["break the ice", "spill the beans"]);
    }

    #[test]
    fn mode_parses_aliases() {
        assert_eq!("word".parse::<QuestionMode>(), Ok(QuestionMode::AskPrompt));
        assert_eq!("ask-meaning".parse::<QuestionMode>(), Ok(QuestionMode::AskMeaning));
        assert!("sideways".parse::<QuestionOrder>().is_err());
    }
}
