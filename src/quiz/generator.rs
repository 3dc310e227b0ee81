//! Question generation seam.
//!
//! The language-model call lives outside this crate. Callers implement
//! [`QuestionGenerator`] per model and stack them in a [`FallbackChain`], which
//! moves on to the next model when one is rate limited or unavailable.

use serde::{Deserialize, Serialize};

use crate::config::DISTRACTOR_COUNT;
use crate::error::GenerationError;

use super::pipeline::QuizSource;

/// Choices per question: one correct answer plus distractors
pub const OPTION_COUNT: usize = DISTRACTOR_COUNT + 1;

/// A generated multiple choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub question: String,
    pub options: Vec<String>,
    pub correct_index: usize,
    #[serde(default)]
    pub explanation: String,
}

impl Question {
    pub fn validate(&self) -> Result<(), String> {
        if self.question.trim().is_empty() {
            return Err("question text is empty".into());
        }
        if self.options.len() != OPTION_COUNT {
            return Err(format!("expected {} options, got {}", OPTION_COUNT, self.options.len()));
        }
        if self.options.iter().any(|o| o.trim().is_empty()) {
            return Err("an option is empty".into());
        }
        if self.correct_index >= self.options.len() {
            return Err(format!("correct_index {} out of range", self.correct_index));
        }
        Ok(())
    }

    pub fn correct_option(&self) -> Option<&str> {
        self.options.get(self.correct_index).map(String::as_str)
    }
}

/// Parse a model's JSON reply, tolerating a surrounding ```json fence.
pub fn parse_question(model: &str, raw: &str) -> Result<Question, GenerationError> {
    let invalid = |message: String| GenerationError::InvalidResponse {
        model: model.to_string(),
        message,
    };

    let trimmed = raw.trim();
    let json = match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if start < end => &trimmed[start..=end],
        _ => return Err(invalid("no JSON object in response".into())),
    };

    let question: Question = serde_json::from_str(json).map_err(|e| invalid(e.to_string()))?;
    question.validate().map_err(invalid)?;
    Ok(question)
}

/// Prompt asking for one question about the given material.
pub fn build_prompt(source: &QuizSource) -> String {
    let mut prompt = String::new();
    prompt.push_str(&format!(
        "Write one multiple choice question that checks understanding of the lesson material below.\n\
         Give exactly {} options with exactly one correct answer, and a one-sentence explanation.\n\
         Only ask about what the material says. Do not quote code verbatim.\n\
         Reply with JSON: {{\"question\": string, \"options\": [string], \"correct_index\": number, \"explanation\": string}}\n\n",
        OPTION_COUNT
    ));

    match source.title() {
        Some(title) => prompt.push_str(&format!("Section: {}\n\n", title)),
        None => prompt.push_str("Lesson excerpt:\n\n"),
    }
    prompt.push_str(source.content());
    prompt.push('\n');
    prompt
}

/// One model able to turn a prompt into a question.
pub trait QuestionGenerator: Send + Sync {
    /// Model name, for logging and error reports
    fn model(&self) -> &str;

    fn generate(&self, prompt: &str) -> Result<Question, GenerationError>;
}

/// Tries generators in order until one produces a valid question.
#[derive(Default)]
pub struct FallbackChain {
    generators: Vec<Box<dyn QuestionGenerator>>,
}

impl FallbackChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<G: QuestionGenerator + 'static>(mut self, generator: G) -> Self {
        self.generators.push(Box::new(generator));
        self
    }

    pub fn push(&mut self, generator: Box<dyn QuestionGenerator>) {
        self.generators.push(generator);
    }

    pub fn len(&self) -> usize {
        self.generators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }

    /// Generate a question for `source`.
    ///
    /// Retryable failures advance to the next generator; any other failure is
    /// returned immediately. If every generator is retryably down the result
    /// is [`GenerationError::Exhausted`].
    pub fn generate(&self, source: &QuizSource) -> Result<Question, GenerationError> {
        let prompt = build_prompt(source);

        for generator in &self.generators {
            let model = generator.model();
            let outcome = generator.generate(&prompt).and_then(|question| {
                question
                    .validate()
                    .map(|_| question)
                    .map_err(|message| GenerationError::InvalidResponse {
                        model: model.to_string(),
                        message,
                    })
            });

            match outcome {
                Ok(question) => {
                    tracing::info!("Question generated by {}", model);
                    return Ok(question);
                }
                Err(e) if e.is_retryable() => {
                    tracing::warn!("Generator {} failed, trying next: {}", model, e);
                }
                Err(e) => {
                    tracing::warn!("Generator {} failed: {}", model, e);
                    return Err(e);
                }
            }
        }

        Err(GenerationError::Exhausted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn sample_question() -> Question {
        Question {
            question: "Why do variables need clear names?".into(),
            options: vec![
                "Readers rely on them".into(),
                "They run faster".into(),
                "The compiler requires it".into(),
                "They use less memory".into(),
            ],
            correct_index: 0,
            explanation: "Names explain intent.".into(),
        }
    }

    fn section_source() -> QuizSource {
        QuizSource::Section {
            id: "variables".into(),
            title: "Variables".into(),
            content: "Variables store values.".into(),
            score: 420,
        }
    }

    struct Scripted {
        model: &'static str,
        result: Result<Question, GenerationError>,
        calls: Arc<AtomicUsize>,
    }

    impl Scripted {
        fn new(model: &'static str, result: Result<Question, GenerationError>) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    model,
                    result,
                    calls: Arc::clone(&calls),
                },
                calls,
            )
        }
    }

    impl QuestionGenerator for Scripted {
        fn model(&self) -> &str {
            self.model
        }

        fn generate(&self, prompt: &str) -> Result<Question, GenerationError> {
            assert!(prompt.contains("Variables store values."));
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }
    }

    fn rate_limited(model: &str) -> GenerationError {
        GenerationError::RateLimited { model: model.into() }
    }

    // Question validation

    #[test]
    fn test_valid_question() {
        let q = sample_question();
        assert!(q.validate().is_ok());
        assert_eq!(q.correct_option(), Some("Readers rely on them"));
    }

    #[test]
    fn test_wrong_option_count() {
        let mut q = sample_question();
        q.options.pop();
        assert!(q.validate().unwrap_err().contains("expected 4 options"));
    }

    #[test]
    fn test_correct_index_out_of_range() {
        let mut q = sample_question();
        q.correct_index = 4;
        assert!(q.validate().is_err());
    }

    #[test]
    fn test_empty_option_rejected() {
        let mut q = sample_question();
        q.options[2] = "  ".into();
        assert!(q.validate().is_err());
    }

    // Response parsing

    #[test]
    fn test_parse_fenced_json() {
        let raw = "```json\n{\"question\": \"Q?\", \"options\": [\"a\", \"b\", \"c\", \"d\"], \"correct_index\": 2}\n```";
        let q = parse_question("m1", raw).unwrap();
        assert_eq!(q.correct_option(), Some("c"));
        assert_eq!(q.explanation, "");
    }

    #[test]
    fn test_parse_rejects_non_json() {
        let err = parse_question("m1", "I cannot help with that").unwrap_err();
        assert_eq!(
            err,
            GenerationError::InvalidResponse {
                model: "m1".into(),
                message: "no JSON object in response".into()
            }
        );
    }

    #[test]
    fn test_parse_rejects_invalid_question() {
        let raw = r#"{"question": "Q?", "options": ["a", "b"], "correct_index": 0}"#;
        assert!(matches!(
            parse_question("m1", raw),
            Err(GenerationError::InvalidResponse { .. })
        ));
    }

    // Prompt

    #[test]
    fn test_prompt_for_section() {
        let prompt = build_prompt(&section_source());
        assert!(prompt.contains("Section: Variables"));
        assert!(prompt.contains("exactly 4 options"));
        assert!(prompt.ends_with("Variables store values.\n"));
    }

    #[test]
    fn test_prompt_for_content_slice() {
        let prompt = build_prompt(&QuizSource::ContentSlice { content: "Raw lesson".into() });
        assert!(prompt.contains("Lesson excerpt:"));
        assert!(!prompt.contains("Section:"));
    }

    // Fallback chain

    #[test]
    fn test_first_generator_succeeds() {
        let (first, first_calls) = Scripted::new("primary", Ok(sample_question()));
        let (second, second_calls) = Scripted::new("backup", Ok(sample_question()));
        let chain = FallbackChain::new().with(first).with(second);

        assert_eq!(chain.generate(&section_source()).unwrap(), sample_question());
        assert_eq!(first_calls.load(Ordering::SeqCst), 1);
        assert_eq!(second_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_rate_limit_falls_through() {
        let (first, _) = Scripted::new("primary", Err(rate_limited("primary")));
        let (second, second_calls) = Scripted::new("backup", Ok(sample_question()));
        let chain = FallbackChain::new().with(first).with(second);

        assert!(chain.generate(&section_source()).is_ok());
        assert_eq!(second_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_non_retryable_error_stops_chain() {
        let bad = GenerationError::InvalidResponse {
            model: "primary".into(),
            message: "garbage".into(),
        };
        let (first, _) = Scripted::new("primary", Err(bad.clone()));
        let (second, second_calls) = Scripted::new("backup", Ok(sample_question()));
        let chain = FallbackChain::new().with(first).with(second);

        assert_eq!(chain.generate(&section_source()).unwrap_err(), bad);
        assert_eq!(second_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_invalid_question_from_generator_rejected() {
        let mut broken = sample_question();
        broken.options.truncate(2);
        let (first, _) = Scripted::new("primary", Ok(broken));
        let chain = FallbackChain::new().with(first);

        assert!(matches!(
            chain.generate(&section_source()),
            Err(GenerationError::InvalidResponse { model, .. }) if model == "primary"
        ));
    }

    #[test]
    fn test_all_rate_limited_exhausts() {
        let (first, _) = Scripted::new("a", Err(rate_limited("a")));
        let (second, _) = Scripted::new("b", Err(rate_limited("b")));
        let chain = FallbackChain::new().with(first).with(second);

        assert_eq!(chain.generate(&section_source()).unwrap_err(), GenerationError::Exhausted);
    }

    #[test]
    fn test_empty_chain() {
        let chain = FallbackChain::new();
        assert!(chain.is_empty());
        assert_eq!(chain.generate(&section_source()).unwrap_err(), GenerationError::Exhausted);
    }
}
