//! Error types for lesson parsing, configuration and question generation.

use std::path::PathBuf;

use thiserror::Error;

/// Failures of the section pipeline and its configuration layer.
///
/// Soft outcomes (no headings, unknown heading id, nothing worth quizzing on)
/// are ordinary return values and never show up here.
#[derive(Debug, Error)]
pub enum QuizError {
    #[error("invalid lesson input: {0}")]
    InvalidInput(String),

    #[error("invalid configuration in {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl QuizError {
    /// Returns a user-facing error message without exposing filesystem paths.
    pub fn user_message(&self) -> &'static str {
        match self {
            QuizError::InvalidInput(_) => "Lesson content could not be read",
            QuizError::Config { .. } => "Quiz configuration is invalid",
            QuizError::Io { .. } => "Failed to read lesson content",
            QuizError::Serialize(_) => "Failed to render the quiz report",
        }
    }
}

/// Failures reported by a question generator backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("model {model} is rate limited")]
    RateLimited { model: String },

    #[error("model {model} is unavailable: {message}")]
    Unavailable { model: String, message: String },

    #[error("model {model} returned an invalid question: {message}")]
    InvalidResponse { model: String, message: String },

    #[error("all question generators failed")]
    Exhausted,
}

impl GenerationError {
    /// Whether a fallback chain should move on to the next generator.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GenerationError::RateLimited { .. } | GenerationError::Unavailable { .. }
        )
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            GenerationError::RateLimited { .. } | GenerationError::Exhausted => {
                "The quiz service is busy, please try again shortly"
            }
            GenerationError::Unavailable { .. } => "The quiz service is unavailable",
            GenerationError::InvalidResponse { .. } => "Could not generate a valid question",
        }
    }
}
