//! Used-item tracking across runs

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::Path;

use tracing::debug;

use crate::error::{QuizError, QuizResult};
use crate::excel::collapse_whitespace;
use crate::output::write_atomic;

/// Prompts emitted by earlier runs.
///
/// Keys are stored with whitespace collapsed, so every key fits on one snapshot line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsedSet {
    keys: BTreeSet<String>,
}

impl UsedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(&collapse_whitespace(key))
    }

    /// Record a prompt. Returns false if it was already present.
    pub fn mark_used(&mut self, key: &str) -> bool {
        let key = collapse_whitespace(key);
        if key.is_empty() {
            return false;
        }
        self.keys.insert(key)
    }

    /// Forget everything, so the next run draws from the full table again.
    pub fn reset(&mut self) {
        self.keys.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    /// Parse newline-delimited keys, ignoring blank lines.
    pub fn parse(text: &str) -> Self {
        let keys = text
            .lines()
            .map(collapse_whitespace)
            .filter(|l| !l.is_empty())
            .collect();
        Self { keys }
    }

    /// One key per line, sorted, trailing newline.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for key in self.iter() {
            out.push_str(key);
            out.push('\n');
        }
        out
    }

    /// Read a snapshot. A missing file is an empty set.
    pub fn load(path: &Path) -> QuizResult<Self> {
        match fs::read_to_string(path) {
            Ok(text) => {
                let set = Self::parse(&text);
                debug!(path = %path.display(), keys = set.len(), "loaded used-set");
                Ok(set)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no used-set file yet");
                Ok(Self::new())
            }
            Err(e) => Err(QuizError::io(path, e)),
        }
    }

    /// Rewrite the snapshot in full.
    pub fn persist(&self, path: &Path) -> QuizResult<()> {
        write_atomic(path, self.to_text().as_bytes())
    }
}

/// Items whose key has not been used yet, in input order.
pub fn filter_unused<'a, T, F>(items: &'a [T], used: &UsedSet, key: F) -> Vec<&'a T>
where
    F: Fn(&T) -> &str,
{
    items.iter().filter(|item| !used.contains(key(*item))).collect()
}
