//! End-to-end section selection for a lesson.
//!
//! `QuizPipeline` runs parse → scope → score → select over a lesson body and
//! keeps every intermediate result in a [`PipelineReport`] so quiz quality
//! can be inspected after the fact.

use rand::Rng;
use serde::Serialize;

use crate::config::QuizConfig;
use crate::content::{char_prefix, lesson_text, parse_sections_with, scope_sections, validate_lesson};
use crate::domain::{ScoredSection, Section};
use crate::error::QuizError;

use super::scorer::SectionScorer;
use super::selector::SectionSelector;

/// Intermediate and final results of one pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub current_heading_id: Option<String>,
    pub sections: Vec<Section>,
    pub scoped_sections: Vec<Section>,
    pub scored_sections: Vec<ScoredSection>,
    /// Index into `scored_sections`
    pub selected: Option<usize>,
}

impl PipelineReport {
    pub fn selected_section(&self) -> Option<&ScoredSection> {
        self.selected.and_then(|idx| self.scored_sections.get(idx))
    }

    /// Plain-text diagnostic report.
    pub fn to_text(&self) -> String {
        let mut report = String::new();
        report.push_str("=== Quiz Section Report ===\n");
        match &self.current_heading_id {
            Some(id) => report.push_str(&format!("Current heading: {}\n", id)),
            None => report.push_str("Current heading: (none, full lesson)\n"),
        }
        report.push_str(&format!("Sections parsed: {}\n", self.sections.len()));
        report.push_str(&format!("Sections in scope: {}\n", self.scoped_sections.len()));

        report.push_str("\n--- Scored Sections ---\n");
        for (idx, scored) in self.scored_sections.iter().enumerate() {
            let marker = if self.selected == Some(idx) { '*' } else { ' ' };
            report.push_str(&format!(
                "{} [{:>4}] {} (#{})\n",
                marker,
                scored.score,
                scored.title(),
                scored.id()
            ));
            for reason in &scored.reasons {
                report.push_str(&format!("         - {}\n", reason));
            }
        }

        report.push_str("\n--- Selection ---\n");
        match self.selected_section() {
            Some(s) => report.push_str(&format!("Selected: {} (#{}), score {}\n", s.title(), s.id(), s.score)),
            None => report.push_str("Selected: none (no qualifying section)\n"),
        }
        report
    }
}

/// Material handed to the question generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuizSource {
    /// A selected section
    Section {
        id: String,
        title: String,
        content: String,
        score: u32,
    },
    /// Leading slice of the lesson, used when no section qualifies
    ContentSlice { content: String },
}

impl QuizSource {
    pub fn title(&self) -> Option<&str> {
        match self {
            QuizSource::Section { title, .. } => Some(title.as_str()),
            QuizSource::ContentSlice { .. } => None,
        }
    }

    pub fn content(&self) -> &str {
        match self {
            QuizSource::Section { content, .. } | QuizSource::ContentSlice { content } => content.as_str(),
        }
    }
}

impl From<&ScoredSection> for QuizSource {
    fn from(scored: &ScoredSection) -> Self {
        QuizSource::Section {
            id: scored.section.id.clone(),
            title: scored.section.title.clone(),
            content: scored.section.content.clone(),
            score: scored.score,
        }
    }
}

/// Section selection configured once and reused across lessons.
#[derive(Debug, Clone)]
pub struct QuizPipeline {
    config: QuizConfig,
    scorer: SectionScorer,
    selector: SectionSelector,
}

impl Default for QuizPipeline {
    fn default() -> Self {
        Self::new(QuizConfig::default())
    }
}

impl QuizPipeline {
    pub fn new(config: QuizConfig) -> Self {
        let scorer = SectionScorer::new(&config);
        let selector = SectionSelector::new(config.high_quality_score, config.selection);
        Self {
            config,
            scorer,
            selector,
        }
    }

    pub fn config(&self) -> &QuizConfig {
        &self.config
    }

    pub fn inspect(&self, markdown: &str, current_heading_id: Option<&str>) -> Result<PipelineReport, QuizError> {
        self.inspect_with(markdown, current_heading_id, &mut rand::rng())
    }

    /// Run every stage with an injected random source.
    pub fn inspect_with<R: Rng + ?Sized>(
        &self,
        markdown: &str,
        current_heading_id: Option<&str>,
        rng: &mut R,
    ) -> Result<PipelineReport, QuizError> {
        validate_lesson(markdown, self.config.max_document_bytes)?;

        let sections = parse_sections_with(markdown, self.config.fallback_prefix_chars);
        let scoped_sections = scope_sections(&sections, current_heading_id).to_vec();
        let scored_sections = self.scorer.score_sections(&scoped_sections);

        let selected = self
            .selector
            .select(&scored_sections, rng)
            .and_then(|picked| scored_sections.iter().position(|s| std::ptr::eq(s, picked)));

        let qualified = scored_sections.iter().filter(|s| s.is_qualified()).count();
        tracing::debug!(
            "Parsed {} sections, {} in scope, {} qualified",
            sections.len(),
            scoped_sections.len(),
            qualified
        );
        match selected.and_then(|idx| scored_sections.get(idx)) {
            Some(s) => tracing::info!("Selected section '{}' (score {})", s.id(), s.score),
            None => tracing::info!("No qualifying section among {} in scope", scoped_sections.len()),
        }

        Ok(PipelineReport {
            current_heading_id: current_heading_id.map(str::to_string),
            sections,
            scoped_sections,
            scored_sections,
            selected,
        })
    }

    /// Run the pipeline over raw bytes, rejecting non-UTF-8 input.
    pub fn inspect_bytes(&self, bytes: &[u8], current_heading_id: Option<&str>) -> Result<PipelineReport, QuizError> {
        self.inspect(lesson_text(bytes)?, current_heading_id)
    }

    /// The selected section, or `None` when nothing in scope qualifies.
    pub fn select(&self, markdown: &str, current_heading_id: Option<&str>) -> Result<Option<ScoredSection>, QuizError> {
        let report = self.inspect(markdown, current_heading_id)?;
        Ok(report.selected_section().cloned())
    }

    pub fn quiz_source(&self, markdown: &str, current_heading_id: Option<&str>) -> Result<QuizSource, QuizError> {
        self.quiz_source_with(markdown, current_heading_id, &mut rand::rng())
    }

    /// A section to quiz on, falling back to a leading slice of the lesson.
    ///
    /// The slice never extends past the learner's scoped position. A blank
    /// lesson is invalid input.
    pub fn quiz_source_with<R: Rng + ?Sized>(
        &self,
        markdown: &str,
        current_heading_id: Option<&str>,
        rng: &mut R,
    ) -> Result<QuizSource, QuizError> {
        if markdown.trim().is_empty() {
            return Err(QuizError::InvalidInput("lesson has no content".into()));
        }

        let report = self.inspect_with(markdown, current_heading_id, rng)?;
        if let Some(selected) = report.selected_section() {
            return Ok(QuizSource::from(selected));
        }

        let seen_end = match report.scoped_sections.last() {
            Some(last) if report.scoped_sections.len() < report.sections.len() => last.end,
            _ => markdown.len(),
        };
        let seen = markdown.get(..seen_end).unwrap_or(markdown).trim();
        tracing::info!("Falling back to content slice of {} chars", self.config.content_slice_chars);

        Ok(QuizSource::ContentSlice {
            content: char_prefix(seen, self.config.content_slice_chars),
        })
    }
}
