//! Error taxonomy for quiz generation

use std::path::Path;

/// Errors raised while loading, generating, or writing a quiz.
#[derive(Debug, thiserror::Error)]
pub enum QuizError {
    /// Missing input, unreadable file, unsupported format, missing columns, bad config.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Duplicate prompts, or nothing usable left after dropping incomplete rows.
    #[error("validation error: {0}")]
    Validation(String),

    #[error("insufficient candidates for '{answer}': need {needed} distractors, found {available}")]
    InsufficientCandidates {
        answer: String,
        needed: usize,
        available: usize,
    },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type QuizResult<T> = Result<T, QuizError>;

impl QuizError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Configuration(_) => 2,
            Self::Validation(_) => 3,
            Self::InsufficientCandidates { .. } => 4,
            Self::Io { .. } | Self::Json(_) => 1,
        }
    }
}
