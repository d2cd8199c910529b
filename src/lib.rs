//! Idiom Quiz - multiple-choice quiz generation for idiom and vocabulary tables
//!
//! Reads a CSV or Excel table, picks three wrong answers per row, shuffles them with the
//! right one under labels A-D, and writes the quiz as JSON.

pub mod config;
pub mod error;
pub mod excel;
pub mod fuzzy;
pub mod generate;
pub mod output;
pub mod progress;
pub mod questions;
pub mod telemetry;
pub mod typo;

#[cfg(feature = "python")]
mod python;

pub use config::{CliOverrides, QuizConfig};
pub use error::{QuizError, QuizResult};
pub use excel::{parse_file, title_case, QuizItem};
pub use generate::{generate_questions, run, GenerationSettings, QuestionMode, QuestionOrder, RunReport};
pub use output::{QuizDocument, QuizQuestion};
pub use progress::{filter_unused, UsedSet};
pub use questions::{select_options, Label, OptionSet, SelectorOptions, Strategy, Strictness};
pub use typo::TypoLimits;
