//! Table loading for quiz sources (Excel and CSV)

use std::collections::HashMap;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{QuizError, QuizResult};

/// One row of the source table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizItem {
    /// Idiom or word, with runs of whitespace collapsed to single spaces.
    pub prompt: String,
    pub meaning: String,
    /// Secondary-language meaning, passed through verbatim.
    pub hindi_meaning: Option<String>,
    pub year: String,
    pub difficulty: Option<String>,
}

impl QuizItem {
    /// Prompt with every whitespace-delimited word capitalised.
    pub fn display_prompt(&self) -> String {
        title_case(&self.prompt)
    }
}

/// Join the whitespace-delimited words of `text` with single spaces.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Capitalise the first letter of each word and lowercase the rest.
pub fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Load quiz items from a file, choosing the parser by extension.
pub fn parse_file(file_path: &Path, default_year: &str) -> QuizResult<Vec<QuizItem>> {
    if !file_path.is_file() {
        return Err(QuizError::Configuration(format!(
            "Input file not found: {}",
            file_path.display()
        )));
    }

    let extension = file_path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "xlsx" | "xlsm" | "xls" | "ods" => parse_excel(file_path, default_year),
        "csv" => parse_csv(file_path, default_year),
        _ => Err(QuizError::Configuration(format!(
            "Unsupported file format: .{}",
            extension
        ))),
    }
}

/// Column index mapping
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    pub prompt: usize,
    pub meaning: usize,
    pub hindi_meaning: Option<usize>,
    pub year: Option<usize>,
    pub difficulty: Option<usize>,
}

/// Detect column indices from header names
pub fn detect_columns(headers: &[String]) -> QuizResult<ColumnMapping> {
    let mut prompt = None;
    let mut meaning = None;
    let mut mapping = ColumnMapping::default();

    for (i, header) in headers.iter().enumerate() {
        match header.trim().to_lowercase().as_str() {
            "idioms" | "idiom" | "word" | "words" | "vocabulary" => {
                prompt.get_or_insert(i);
            }
            "meaning" | "meanings" | "definition" => {
                meaning.get_or_insert(i);
            }
            "hindi meaning" | "hindi_meaning" | "hindi" => mapping.hindi_meaning = Some(i),
            "year" => mapping.year = Some(i),
            "difficulty" => mapping.difficulty = Some(i),
            _ => {}
        }
    }

    let mut missing = Vec::new();
    if prompt.is_none() {
        missing.push("'Idioms' or 'Word'");
    }
    if meaning.is_none() {
        missing.push("'Meaning'");
    }
    match (prompt, meaning) {
        (Some(p), Some(m)) => {
            mapping.prompt = p;
            mapping.meaning = m;
            Ok(mapping)
        }
        _ => Err(QuizError::Configuration(format!(
            "Missing required column(s) in header: {}",
            missing.join(", ")
        ))),
    }
}

/// Parse the first sheet of a workbook
pub fn parse_excel(file_path: &Path, default_year: &str) -> QuizResult<Vec<QuizItem>> {
    let mut workbook = open_workbook_auto(file_path).map_err(|e| {
        QuizError::Configuration(format!("Failed to open Excel file: {}", e))
    })?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| QuizError::Configuration("No sheets found in Excel file".to_string()))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| QuizError::Configuration(format!("Failed to read sheet: {}", e)))?;

    let mut rows = range.rows();
    let header_row = rows
        .next()
        .ok_or_else(|| QuizError::Configuration("Empty file - no header row".to_string()))?;
    let headers: Vec<String> = header_row.iter().map(get_cell_string).collect();
    let mapping = detect_columns(&headers)?;
    debug!(sheet = %sheet_name, ?mapping, "detected columns");

    let records = rows.map(|row| row.iter().map(get_cell_string).collect::<Vec<String>>());
    build_items(records, &mapping, default_year)
}

/// Parse a CSV file with a header row
pub fn parse_csv(file_path: &Path, default_year: &str) -> QuizResult<Vec<QuizItem>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(file_path)
        .map_err(|e| QuizError::Configuration(format!("Failed to open CSV file: {}", e)))?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| QuizError::Configuration(format!("Failed to read CSV headers: {}", e)))?
        .iter()
        .map(|s| s.trim_start_matches('\u{feff}').to_string())
        .collect();
    let mapping = detect_columns(&headers)?;
    debug!(?mapping, "detected columns");

    let mut records: Vec<Vec<String>> = Vec::new();
    for result in reader.records() {
        let record = result
            .map_err(|e| QuizError::Configuration(format!("Failed to read CSV row: {}", e)))?;
        records.push(record.iter().map(|s| s.trim().to_string()).collect());
    }

    build_items(records.into_iter(), &mapping, default_year)
}

fn cell(row: &[String], index: usize) -> &str {
    row.get(index).map(|s| s.trim()).unwrap_or("")
}

fn optional_cell(row: &[String], index: Option<usize>) -> Option<String> {
    index
        .map(|i| cell(row, i))
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Turn raw rows into items: drop incomplete rows, reject duplicate prompts.
///
/// Row numbers in messages are 1-based with the header as row 1.
pub fn build_items<I>(
    rows: I,
    mapping: &ColumnMapping,
    default_year: &str,
) -> QuizResult<Vec<QuizItem>>
where
    I: Iterator<Item = Vec<String>>,
{
    let mut items = Vec::new();
    let mut seen: HashMap<String, usize> = HashMap::new();

    for (offset, row) in rows.enumerate() {
        let row_number = offset + 2;
        if row.iter().all(|c| c.trim().is_empty()) {
            continue;
        }

        let prompt = cell(&row, mapping.prompt);
        let meaning = cell(&row, mapping.meaning);
        if prompt.is_empty() || meaning.is_empty() {
            warn!(row = row_number, "dropping incomplete row");
            continue;
        }

        let prompt = collapse_whitespace(prompt);
        if let Some(first) = seen.insert(prompt.to_lowercase(), row_number) {
            return Err(QuizError::Validation(format!(
                "Duplicate entry '{}' on rows {} and {}",
                prompt, first, row_number
            )));
        }

        items.push(QuizItem {
            prompt,
            meaning: meaning.to_string(),
            hindi_meaning: optional_cell(&row, mapping.hindi_meaning),
            year: optional_cell(&row, mapping.year).unwrap_or_else(|| default_year.to_string()),
            difficulty: optional_cell(&row, mapping.difficulty),
        });
    }

    if items.is_empty() {
        return Err(QuizError::Validation(
            "No valid rows remain after dropping incomplete rows".to_string(),
        ));
    }

    Ok(items)
}

/// Helper to extract string from Excel cell
fn get_cell_string(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(_) => String::new(),
        Data::Empty => String::new(),
    }
}
