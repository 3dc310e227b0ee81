//! Quiz selection configuration.
//!
//! Every threshold the scorer and selector use lives here. Defaults are the
//! exported constants; a `[quiz]` table in `config.toml` or a handful of
//! environment variables can override them.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::QuizError;
use crate::quiz::SelectionStrategy;

// ==================== Scoring Configuration ====================

/// Stripped prose shorter than this disqualifies a section
pub const MIN_PROSE_CHARS: usize = 150;

/// Upper bound on the length-based part of the score
pub const MAX_LENGTH_SCORE: u32 = 1000;

/// Points added per distinct explanatory keyword
pub const KEYWORD_BONUS: u32 = 50;

/// Below this prose/content ratio a section counts as code-heavy and is halved
pub const CODE_HEAVY_RATIO: f64 = 0.3;

// ==================== Selection Configuration ====================

/// Sections scoring above this form the preferred selection pool
pub const HIGH_QUALITY_SCORE: u32 = 300;

// ==================== Question Configuration ====================

/// Number of wrong choices in a generated multiple choice question
pub const DISTRACTOR_COUNT: usize = 3;

// ==================== Input Limits ====================

/// Characters kept in the "General Content" section of a heading-less lesson
pub const FALLBACK_PREFIX_CHARS: usize = 2000;

/// Characters of raw lesson handed to the generator when no section qualifies
pub const CONTENT_SLICE_CHARS: usize = 3000;

// ==================== Config Sources ====================

/// Default config file, relative to the working directory
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Env var naming an alternative config file
pub const CONFIG_PATH_ENV: &str = "LESSON_QUIZ_CONFIG";

/// Tunables for the section pipeline.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct QuizConfig {
    pub min_prose_chars: usize,
    pub max_length_score: u32,
    pub keyword_bonus: u32,
    pub code_heavy_ratio: f64,
    pub high_quality_score: u32,
    pub fallback_prefix_chars: usize,
    pub content_slice_chars: usize,
    /// Optional size limit; lessons of any length are accepted when unset
    pub max_document_bytes: Option<usize>,
    /// Title markers appended to the built-in blocklist
    pub extra_blocklist: Vec<String>,
    /// Explanatory markers appended to the built-in keyword list
    pub extra_keywords: Vec<String>,
    pub selection: SelectionStrategy,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            min_prose_chars: MIN_PROSE_CHARS,
            max_length_score: MAX_LENGTH_SCORE,
            keyword_bonus: KEYWORD_BONUS,
            code_heavy_ratio: CODE_HEAVY_RATIO,
            high_quality_score: HIGH_QUALITY_SCORE,
            fallback_prefix_chars: FALLBACK_PREFIX_CHARS,
            content_slice_chars: CONTENT_SLICE_CHARS,
            max_document_bytes: None,
            extra_blocklist: Vec::new(),
            extra_keywords: Vec::new(),
            selection: SelectionStrategy::default(),
        }
    }
}

/// Configuration file structure for config.toml
#[derive(Debug, Deserialize)]
struct ConfigFile {
    quiz: Option<QuizConfig>,
}

impl QuizConfig {
    /// Parse the `[quiz]` table of a TOML document. A document without the
    /// table yields the defaults.
    pub fn from_toml_str(contents: &str, path: &Path) -> Result<Self, QuizError> {
        let file: ConfigFile = toml::from_str(contents).map_err(|e| QuizError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config = file.quiz.unwrap_or_default();
        config.validate(path)?;
        Ok(config)
    }

    /// Load an explicit config file. Unlike [`load_config`], a missing file is an error.
    pub fn from_file(path: &Path) -> Result<Self, QuizError> {
        let contents = std::fs::read_to_string(path).map_err(|source| QuizError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents, path)
    }

    /// Apply `QUIZ_*` overrides. Unparseable values are logged and ignored.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup("QUIZ_MIN_PROSE_CHARS") {
            match raw.trim().parse() {
                Ok(value) => {
                    tracing::info!("Using QUIZ_MIN_PROSE_CHARS from env: {}", value);
                    self.min_prose_chars = value;
                }
                Err(_) => tracing::warn!("Ignoring invalid QUIZ_MIN_PROSE_CHARS: {}", raw),
            }
        }

        if let Some(raw) = lookup("QUIZ_HIGH_QUALITY_SCORE") {
            match raw.trim().parse() {
                Ok(value) => {
                    tracing::info!("Using QUIZ_HIGH_QUALITY_SCORE from env: {}", value);
                    self.high_quality_score = value;
                }
                Err(_) => tracing::warn!("Ignoring invalid QUIZ_HIGH_QUALITY_SCORE: {}", raw),
            }
        }

        if let Some(raw) = lookup("QUIZ_SELECTION") {
            match raw.parse() {
                Ok(strategy) => self.selection = strategy,
                Err(e) => tracing::warn!("Ignoring QUIZ_SELECTION: {}", e),
            }
        }
    }

    fn validate(&self, path: &Path) -> Result<(), QuizError> {
        let invalid = |message: &str| QuizError::Config {
            path: path.to_path_buf(),
            message: message.to_string(),
        };

        if !(0.0..=1.0).contains(&self.code_heavy_ratio) {
            return Err(invalid("code_heavy_ratio must be between 0 and 1"));
        }
        if self.content_slice_chars == 0 || self.fallback_prefix_chars == 0 {
            return Err(invalid("slice lengths must be positive"));
        }
        if self.max_document_bytes == Some(0) {
            return Err(invalid("max_document_bytes must be positive"));
        }
        Ok(())
    }
}

/// Load quiz config with priority: config file > env overrides > defaults
pub fn load_config() -> Result<QuizConfig, QuizError> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let path = std::env::var(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));

    let mut config = if path.exists() {
        tracing::info!("Using quiz config from {}", path.display());
        QuizConfig::from_file(&path)?
    } else {
        tracing::info!("No config file at {}, using defaults", path.display());
        QuizConfig::default()
    };

    config.apply_env_overrides(|key| std::env::var(key).ok());
    Ok(config)
}
