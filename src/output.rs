//! Quiz document serialization and console summary

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{QuizError, QuizResult};
use crate::questions::{Label, Strategy};

/// One generated multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    /// Title-cased idiom or word.
    pub prompt: String,
    pub meaning: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hindi_meaning: Option<String>,
    pub year: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    /// Text of the correct option.
    pub answer: String,
    pub options: BTreeMap<Label, String>,
    pub correct_label: Label,
}

/// Top-level output: the questions plus summary metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizDocument {
    /// RFC 3339, UTC.
    pub generated_at: String,
    pub strategy: Strategy,
    pub total_questions: usize,
    /// Distinct years, sorted.
    pub years: Vec<String>,
    pub year_counts: BTreeMap<String, usize>,
    pub questions: Vec<QuizQuestion>,
}

impl QuizDocument {
    pub fn new(strategy: Strategy, questions: Vec<QuizQuestion>) -> Self {
        let year_counts = year_counts(&questions);
        Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
            strategy,
            total_questions: questions.len(),
            years: year_counts.keys().cloned().collect(),
            year_counts,
            questions,
        }
    }

    pub fn to_json(&self) -> QuizResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write(&self, path: &Path) -> QuizResult<()> {
        let mut json = self.to_json()?;
        json.push('\n');
        write_atomic(path, json.as_bytes())
    }
}

pub fn year_counts(questions: &[QuizQuestion]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for q in questions {
        *counts.entry(q.year.clone()).or_insert(0) += 1;
    }
    counts
}

/// Write through a temporary file in the destination directory, then rename into place.
pub fn write_atomic(path: &Path, contents: &[u8]) -> QuizResult<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| QuizError::io(path, e))?;
    tmp.write_all(contents).map_err(|e| QuizError::io(path, e))?;
    tmp.as_file().sync_all().map_err(|e| QuizError::io(path, e))?;
    tmp.persist(path).map_err(|e| QuizError::io(path, e.error))?;
    Ok(())
}

/// Human-readable run summary.
pub fn render_summary(
    output: &Path,
    questions: &[QuizQuestion],
    skipped: usize,
) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "✅ Quiz data written to '{}' with {} questions.",
        output.display(),
        questions.len()
    );
    if skipped > 0 {
        let _ = writeln!(out, "⚠️  {} item(s) skipped for lack of distractors.", skipped);
    }
    let _ = writeln!(out, "\n📊 Question count by year:");
    for (year, count) in year_counts(questions) {
        let _ = writeln!(out, "  {}: {} questions", year, count);
    }
    out
}
