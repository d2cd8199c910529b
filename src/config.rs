//! Run configuration.
//!
//! Resolution order (highest priority first):
//! 1. CLI flags (applied via `apply_cli_overrides`)
//! 2. Config file (`--config <path>`, or `idiom_quiz.toml` in the working directory)
//! 3. Compiled defaults

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{QuizError, QuizResult};
use crate::generate::{QuestionMode, QuestionOrder};
use crate::questions::{SelectorOptions, Strategy, Strictness};
use crate::typo::TypoLimits;

/// Config file picked up from the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "idiom_quiz.toml";

/// Settings for one generation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QuizConfig {
    /// Source table (CSV or Excel). Required.
    pub input: Option<PathBuf>,
    /// Quiz JSON destination. Default: `idioms_data.json`.
    pub output: Option<PathBuf>,
    /// Used-set snapshot. When set, prompts are not repeated across runs.
    pub used_set: Option<PathBuf>,
    /// Distractor strategy. Default: random_uniform.
    pub strategy: Option<Strategy>,
    /// Which column the options come from. Default: ask_meaning.
    pub mode: Option<QuestionMode>,
    /// Default: lenient.
    pub strictness: Option<Strictness>,
    /// In strict mode, skip short items instead of failing the run. Default: false.
    pub skip_insufficient: Option<bool>,
    /// Batch cap. Default: unlimited.
    pub max_questions: Option<usize>,
    /// Default: table.
    pub order: Option<QuestionOrder>,
    /// Year used when a row has none. Default: "2024".
    pub default_year: Option<String>,
    /// Seed for reproducible runs. Default: entropy.
    pub seed: Option<u64>,
    /// Default: 5.
    pub typo_min_len_phrase: Option<usize>,
    /// Default: 3.
    pub typo_min_len_word: Option<usize>,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub used_set: Option<PathBuf>,
    pub strategy: Option<Strategy>,
    pub mode: Option<QuestionMode>,
    pub strict: bool,
    pub skip_insufficient: bool,
    pub max_questions: Option<usize>,
    pub order: Option<QuestionOrder>,
    pub default_year: Option<String>,
    pub seed: Option<u64>,
}

impl QuizConfig {
    /// Load from an explicit file, or from `idiom_quiz.toml` if present, else defaults.
    pub fn load(path: Option<&Path>) -> QuizResult<Self> {
        match path {
            Some(p) => {
                if !p.is_file() {
                    return Err(QuizError::Configuration(format!(
                        "Config file not found: {}",
                        p.display()
                    )));
                }
                Self::from_file(p)
            }
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    Self::from_file(fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> QuizResult<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            QuizError::Configuration(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        let config = Self::from_toml_str(&text).map_err(|e| match e {
            QuizError::Configuration(msg) => {
                QuizError::Configuration(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })?;
        debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> QuizResult<Self> {
        toml::from_str(text)
            .map_err(|e| QuizError::Configuration(format!("invalid TOML: {}", e.message())))
    }

    pub fn apply_cli_overrides(&mut self, overrides: &CliOverrides) {
        if let Some(ref v) = overrides.input {
            self.input = Some(v.clone());
        }
        if let Some(ref v) = overrides.output {
            self.output = Some(v.clone());
        }
        if let Some(ref v) = overrides.used_set {
            self.used_set = Some(v.clone());
        }
        if let Some(v) = overrides.strategy {
            self.strategy = Some(v);
        }
        if let Some(v) = overrides.mode {
            self.mode = Some(v);
        }
        if overrides.strict {
            self.strictness = Some(Strictness::Strict);
        }
        if overrides.skip_insufficient {
            self.skip_insufficient = Some(true);
        }
        if let Some(v) = overrides.max_questions {
            self.max_questions = Some(v);
        }
        if let Some(v) = overrides.order {
            self.order = Some(v);
        }
        if let Some(ref v) = overrides.default_year {
            self.default_year = Some(v.clone());
        }
        if let Some(v) = overrides.seed {
            self.seed = Some(v);
        }
    }

    /// Reject settings that cannot produce a sensible run.
    pub fn validate(&self) -> QuizResult<()> {
        if self.input.is_none() {
            return Err(QuizError::Configuration(
                "No input file given (use --input or set `input` in the config file)".to_string(),
            ));
        }
        if self.max_questions == Some(0) {
            return Err(QuizError::Configuration(
                "max_questions must be at least 1".to_string(),
            ));
        }
        if self.typo_min_len_phrase == Some(0) || self.typo_min_len_word == Some(0) {
            return Err(QuizError::Configuration(
                "typo minimum lengths must be at least 1".to_string(),
            ));
        }
        if self.default_year.as_deref().is_some_and(|y| y.trim().is_empty()) {
            return Err(QuizError::Configuration(
                "default_year must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn input_path(&self) -> QuizResult<&Path> {
        self.input.as_deref().ok_or_else(|| {
            QuizError::Configuration("No input file given".to_string())
        })
    }

    pub fn effective_output(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| PathBuf::from("idioms_data.json"))
    }

    pub fn effective_strategy(&self) -> Strategy {
        self.strategy.unwrap_or_default()
    }

    pub fn effective_mode(&self) -> QuestionMode {
        self.mode.unwrap_or_default()
    }

    pub fn effective_strictness(&self) -> Strictness {
        self.strictness.unwrap_or_default()
    }

    pub fn effective_skip_insufficient(&self) -> bool {
        self.skip_insufficient.unwrap_or(false)
    }

    pub fn effective_order(&self) -> QuestionOrder {
        self.order.unwrap_or_default()
    }

    pub fn effective_default_year(&self) -> &str {
        self.default_year.as_deref().unwrap_or("2024")
    }

    pub fn effective_typo_limits(&self) -> TypoLimits {
        let defaults = TypoLimits::default();
        TypoLimits {
            min_len_phrase: self.typo_min_len_phrase.unwrap_or(defaults.min_len_phrase),
            min_len_word: self.typo_min_len_word.unwrap_or(defaults.min_len_word),
        }
    }

    pub fn selector_options(&self) -> SelectorOptions {
        SelectorOptions {
            strictness: self.effective_strictness(),
            typo_limits: self.effective_typo_limits(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_unset() {
        let config = QuizConfig::default();
        assert_eq!(config.effective_strategy(), Strategy::RandomUniform);
        assert_eq!(config.effective_strictness(), Strictness::Lenient);
        assert_eq!(config.effective_default_year(), "2024");
        assert_eq!(config.effective_output(), PathBuf::from("idioms_data.json"));
        assert_eq!(config.effective_typo_limits(), TypoLimits::default());
        assert!(!config.effective_skip_insufficient());
    }

    #[test]
    fn toml_values_parse() {
        let config = QuizConfig::from_toml_str(
            r#"
            input = "idioms_list.csv"
            strategy = "keyword_similar"
            mode = "ask_prompt"
            strictness = "strict"
            order = "random"
            max_questions = 20
            default_year = "2023"
            typo_min_len_word = 4
            "#,
        )
        .unwrap();
        assert_eq!(config.effective_strategy(), Strategy::KeywordSimilar);
        assert_eq!(config.effective_mode(), QuestionMode::AskPrompt);
        assert_eq!(config.effective_strictness(), Strictness::Strict);
        assert_eq!(config.effective_order(), QuestionOrder::Random);
        assert_eq!(config.max_questions, Some(20));
        assert_eq!(config.effective_typo_limits().min_len_word, 4);
        assert_eq!(config.effective_typo_limits().min_len_phrase, 5);
    }

    #[test]
    fn unknown_strategy_is_a_configuration_error() {
        let err = QuizConfig::from_toml_str(r#"strategy = "nearest""#).unwrap_err();
        assert!(matches!(err, QuizError::Configuration(_)));
    }

    #[test]
    fn unknown_key_is_rejected() {
        assert!(QuizConfig::from_toml_str("colour = 1").is_err());
    }

    #[test]
    fn cli_overrides_win() {
        let mut config = QuizConfig::from_toml_str(
            r#"
            input = "a.csv"
            seed = 1
            "#,
        )
        .unwrap();
        config.apply_cli_overrides(&CliOverrides {
            input: Some(PathBuf::from("b.csv")),
            seed: Some(9),
            strict: true,
            ..Default::default()
        });
        assert_eq!(config.input, Some(PathBuf::from("b.csv")));
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.effective_strictness(), Strictness::Strict);
    }

    #[test]
    fn validate_requires_input_and_positive_cap() {
        assert!(QuizConfig::default().validate().is_err());
        let config = QuizConfig {
            input: Some(PathBuf::from("a.csv")),
            max_questions: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_explicit_config_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = QuizConfig::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, QuizError::Configuration(_)));
    }
}
